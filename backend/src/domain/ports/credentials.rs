//! Ports for password hashing and bearer token handling.

use crate::domain::{Error, FullName, Password, PasswordDigest, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashers.
    pub enum CredentialError {
        /// The secret could not be hashed.
        Hash { message: String } => "password hashing failed: {message}",
        /// The stored digest is not a valid hash string.
        MalformedDigest { message: String } => "stored password hash is malformed: {message}",
    }
}

define_port_error! {
    /// Errors raised by token issuers.
    pub enum TokenError {
        /// The token is missing parts, forged, or fails signature checks.
        Invalid { message: String } => "token is invalid: {message}",
        /// The token was valid once but its lifetime has passed.
        Expired => "token has expired",
        /// The token could not be signed.
        Signing { message: String } => "token signing failed: {message}",
    }
}

impl From<CredentialError> for Error {
    fn from(error: CredentialError) -> Self {
        Self::internal(error.to_string())
    }
}

impl From<TokenError> for Error {
    fn from(error: TokenError) -> Self {
        match error {
            TokenError::Signing { .. } => Self::internal(error.to_string()),
            TokenError::Invalid { .. } | TokenError::Expired => {
                Self::unauthorized("invalid or expired token")
            }
        }
    }
}

/// Hashes and verifies account passwords.
///
/// Implementations are CPU bound; async callers run them on the blocking
/// thread pool.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Hash a new password.
    fn hash(&self, password: &Password) -> Result<PasswordDigest, CredentialError>;

    /// Whether `secret` matches `digest`.
    fn verify(&self, secret: &str, digest: &PasswordDigest) -> Result<bool, CredentialError>;
}

/// Identity embedded in an issued token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSubject {
    /// Authenticated user.
    pub id: UserId,
    /// Display name at issue time.
    pub full_name: FullName,
}

/// Verified token contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    /// Authenticated user.
    pub id: UserId,
    /// Display name at issue time.
    pub full_name: String,
    /// Issue time, seconds since the Unix epoch.
    pub issued_at: i64,
    /// Expiry time, seconds since the Unix epoch.
    pub expires_at: i64,
}

/// Issues and verifies signed bearer tokens.
#[cfg_attr(test, mockall::automock)]
pub trait TokenIssuer: Send + Sync {
    /// Sign a token for `subject`.
    fn issue(&self, subject: &TokenSubject) -> Result<String, TokenError>;

    /// Check the signature and expiry of `token`.
    fn verify(&self, token: &str) -> Result<TokenClaims, TokenError>;
}
