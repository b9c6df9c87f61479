//! Account handlers under `/auth`.
//!
//! ```text
//! POST /auth/register      {"email","password","fullName","allergyIds"}
//! POST /auth/login         {"email","password"}
//! POST /auth/verifyCode    {"email"}   code for an unused address
//! POST /auth/verifyEmail   {"email"}   code for a registered address
//! POST /auth/resetPassword {"email","password"}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    AllergyId, AuthSession, Error, LoginCredentials, PasswordReset, Registration,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{MessageResponse, UserDto};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation;

/// `POST /auth/register` body.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[schema(example = "a@b.com")]
    pub email: Option<String>,
    #[schema(example = "Aa1!aaaa")]
    pub password: Option<String>,
    #[schema(example = "Jane Doe")]
    pub full_name: Option<String>,
    #[serde(default)]
    pub allergy_ids: Vec<i32>,
}

/// `POST /auth/login` and `POST /auth/resetPassword` body.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Body naming the address a verification code goes to.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmailRequest {
    pub email: Option<String>,
}

/// A signed-in account.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserDto,
    pub token: String,
}

impl From<AuthSession> for AuthResponse {
    fn from(value: AuthSession) -> Self {
        Self {
            user: value.user.into(),
            token: value.token,
        }
    }
}

/// The code that was mailed, echoed for the client-side comparison.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CodeResponse {
    #[schema(example = "042917")]
    pub code: String,
}

impl TryFrom<RegisterRequest> for Registration {
    type Error = Error;

    fn try_from(value: RegisterRequest) -> Result<Self, Self::Error> {
        Self::parse(
            value.email.as_deref(),
            value.full_name.as_deref(),
            value.password.as_deref(),
            value.allergy_ids.into_iter().map(AllergyId::new).collect(),
        )
    }
}

/// Create an account and return it with a bearer token.
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration = Registration::try_from(payload.into_inner())?;
    let session = state.accounts.register(registration).await?;
    Ok(HttpResponse::Created().json(AuthResponse::from(session)))
}

/// Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Signed in", body = AuthResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unknown email or wrong password", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<web::Json<AuthResponse>> {
    let credentials =
        LoginCredentials::parse(payload.email.as_deref(), payload.password.as_deref())?;
    let session = state.accounts.login(credentials).await?;
    Ok(web::Json(session.into()))
}

/// Mail a sign-up code to an address that has no account yet.
#[utoipa::path(
    post,
    path = "/auth/verifyCode",
    request_body = EmailRequest,
    responses(
        (status = 200, description = "Code sent", body = CodeResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema),
        (status = 503, description = "Email delivery is not configured", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "sendSignupCode",
    security([])
)]
#[post("/verifyCode")]
pub async fn send_signup_code(
    state: web::Data<HttpState>,
    payload: web::Json<EmailRequest>,
) -> ApiResult<web::Json<CodeResponse>> {
    let email = validation::email(payload.email.as_deref())?;
    let code = state.accounts.request_signup_code(&email).await?;
    Ok(web::Json(CodeResponse {
        code: code.as_str().to_owned(),
    }))
}

/// Mail a password-reset code to a registered address.
#[utoipa::path(
    post,
    path = "/auth/verifyEmail",
    request_body = EmailRequest,
    responses(
        (status = 200, description = "Code sent", body = CodeResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "No account for this email", body = ErrorSchema),
        (status = 503, description = "Email delivery is not configured", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "sendResetCode",
    security([])
)]
#[post("/verifyEmail")]
pub async fn send_reset_code(
    state: web::Data<HttpState>,
    payload: web::Json<EmailRequest>,
) -> ApiResult<web::Json<CodeResponse>> {
    let email = validation::email(payload.email.as_deref())?;
    let code = state.accounts.request_reset_code(&email).await?;
    Ok(web::Json(CodeResponse {
        code: code.as_str().to_owned(),
    }))
}

/// Replace the password of a registered account.
#[utoipa::path(
    post,
    path = "/auth/resetPassword",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "No account for this email", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "resetPassword",
    security([])
)]
#[post("/resetPassword")]
pub async fn reset_password(
    state: web::Data<HttpState>,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<web::Json<MessageResponse>> {
    let reset = PasswordReset::parse(payload.email.as_deref(), payload.password.as_deref())?;
    state.accounts.reset_password(reset).await?;
    Ok(web::Json(MessageResponse::new("password changed")))
}

/// Mount the account handlers.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(register)
            .service(login)
            .service(send_signup_code)
            .service(send_reset_code)
            .service(reset_password),
    );
}

#[cfg(test)]
#[path = "accounts_tests.rs"]
mod tests;
