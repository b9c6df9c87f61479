//! Bearer-token extractors used by protected handlers.
//!
//! Handlers declare what they need in their signature: [`AuthenticatedUser`]
//! for any signed-in caller, [`AdminUser`] for administrator routes. Both
//! resolve the token through [`crate::domain::AccountService::authenticate`],
//! so a deleted account is rejected even while its token is unexpired.

use std::ops::Deref;

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Error, User};
use crate::inbound::http::state::HttpState;

const BEARER: &str = "Bearer ";

/// Pull the token out of `Authorization: Bearer <token>`.
fn bearer_token(req: &HttpRequest) -> Result<String, Error> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("missing bearer token"))?;
    let value = header
        .to_str()
        .map_err(|_| Error::unauthorized("malformed authorization header"))?;
    value
        .strip_prefix(BEARER)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| Error::unauthorized("missing bearer token"))
}

fn resolve(req: &HttpRequest) -> LocalBoxFuture<'static, Result<User, Error>> {
    let state = req.app_data::<web::Data<HttpState>>().cloned();
    let token = bearer_token(req);
    Box::pin(async move {
        let token = token?;
        let state =
            state.ok_or_else(|| Error::internal("HTTP state is not registered with the app"))?;
        state.accounts.authenticate(&token).await
    })
}

/// Any caller presenting a valid bearer token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl Deref for AuthenticatedUser {
    type Target = User;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let user = resolve(req);
        Box::pin(async move { Ok(Self(user.await?)) })
    }
}

/// A caller whose account has the `ADMIN` role.
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

impl Deref for AdminUser {
    type Target = User;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for AdminUser {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let user = resolve(req);
        Box::pin(async move {
            let user = user.await?;
            if !user.is_admin() {
                return Err(Error::forbidden("admin access required").into());
            }
            Ok(Self(user))
        })
    }
}
