//! Registration, login, verification codes, and password resets.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::blocking::run_blocking;
use crate::domain::ports::{
    NewUser, PasswordHasher, PersistenceError, TokenIssuer, TokenSubject, UserRepository,
    VerificationMailer,
};
use crate::domain::{
    EmailAddress, Error, LoginCredentials, PasswordReset, Registration, User, VerificationCode,
};

/// An authenticated user and the bearer token issued for them.
#[derive(Debug, Clone)]
pub struct AuthSession {
    /// The account.
    pub user: User,
    /// Signed bearer token.
    pub token: String,
}

/// Account use-cases behind the `/auth` endpoints and the bearer extractor.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenIssuer>,
    mailer: Arc<dyn VerificationMailer>,
}

impl AccountService {
    /// Create the service from its driven ports.
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenIssuer>,
        mailer: Arc<dyn VerificationMailer>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
            mailer,
        }
    }

    /// Create an account and sign the caller in.
    pub async fn register(&self, registration: Registration) -> Result<AuthSession, Error> {
        if self.users.email_exists(&registration.email).await? {
            return Err(Error::conflict("user exists"));
        }

        let hasher = Arc::clone(&self.hasher);
        let password = registration.password;
        let digest = run_blocking(move || hasher.hash(&password).map_err(Error::from)).await?;
        let new_user = NewUser {
            email: registration.email,
            full_name: registration.full_name,
            password: digest,
            allergy_ids: registration.allergy_ids,
        };
        let user = self
            .users
            .create(&new_user)
            .await
            .map_err(|err| match err {
                PersistenceError::UniqueViolation { .. } => Error::conflict("user exists"),
                PersistenceError::ForeignKeyViolation { .. } => {
                    Error::invalid_request("unknown allergy")
                }
                other => Error::from(other),
            })?;
        info!(user_id = %user.id, "user registered");
        self.open_session(user)
    }

    /// Check credentials and sign the caller in.
    pub async fn login(&self, credentials: LoginCredentials) -> Result<AuthSession, Error> {
        let Some(stored) = self.users.find_credentials(credentials.email()).await? else {
            return Err(Error::unauthorized("invalid credentials"));
        };

        let hasher = Arc::clone(&self.hasher);
        let secret = zeroize::Zeroizing::new(credentials.password().to_owned());
        let digest = stored.password;
        let matches =
            run_blocking(move || hasher.verify(&secret, &digest).map_err(Error::from)).await?;
        if !matches {
            return Err(Error::unauthorized("wrong password"));
        }
        self.open_session(stored.user)
    }

    /// Mail a code proving ownership of an address that is not registered yet.
    pub async fn request_signup_code(
        &self,
        email: &EmailAddress,
    ) -> Result<VerificationCode, Error> {
        if self.users.email_exists(email).await? {
            return Err(Error::conflict("user exists"));
        }
        self.send_code(email).await
    }

    /// Mail a code proving ownership of a registered address.
    pub async fn request_reset_code(
        &self,
        email: &EmailAddress,
    ) -> Result<VerificationCode, Error> {
        if !self.users.email_exists(email).await? {
            return Err(Error::not_found("user not found"));
        }
        self.send_code(email).await
    }

    /// Replace the password of a registered account.
    pub async fn reset_password(&self, reset: PasswordReset) -> Result<(), Error> {
        let hasher = Arc::clone(&self.hasher);
        let password = reset.password;
        let digest = run_blocking(move || hasher.hash(&password).map_err(Error::from)).await?;
        if !self.users.set_password(&reset.email, &digest).await? {
            return Err(Error::not_found("user not found"));
        }
        info!("password reset");
        Ok(())
    }

    /// Resolve a bearer token to the current state of its user.
    pub async fn authenticate(&self, token: &str) -> Result<User, Error> {
        let claims = self.tokens.verify(token)?;
        self.users
            .find_by_id(claims.id)
            .await?
            .ok_or_else(|| Error::unauthorized("user no longer exists"))
    }

    fn open_session(&self, user: User) -> Result<AuthSession, Error> {
        let token = self.tokens.issue(&TokenSubject {
            id: user.id,
            full_name: user.full_name.clone(),
        })?;
        Ok(AuthSession { user, token })
    }

    async fn send_code(&self, email: &EmailAddress) -> Result<VerificationCode, Error> {
        let code = VerificationCode::generate();
        if let Err(err) = self.mailer.send_code(email, &code).await {
            warn!(error = %err, "verification code delivery failed");
            return Err(err.into());
        }
        Ok(code)
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
