//! Port for delivering one-time verification codes.

use async_trait::async_trait;

use crate::domain::{EmailAddress, Error, VerificationCode};

use super::define_port_error;

define_port_error! {
    /// Errors raised by verification mailers.
    pub enum MailerError {
        /// No mail transport is configured.
        NotConfigured => "email delivery is not configured",
        /// The message could not be built or delivered.
        Delivery { message: String } => "email delivery failed: {message}",
    }
}

impl From<MailerError> for Error {
    fn from(error: MailerError) -> Self {
        match error {
            MailerError::NotConfigured => Self::service_unavailable(error.to_string()),
            MailerError::Delivery { .. } => Self::internal(error.to_string()),
        }
    }
}

/// Sends verification codes by email.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VerificationMailer: Send + Sync {
    /// Deliver `code` to `recipient`.
    async fn send_code(
        &self,
        recipient: &EmailAddress,
        code: &VerificationCode,
    ) -> Result<(), MailerError>;
}

/// Mailer used when no transport is configured; every send fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredMailer;

#[async_trait]
impl VerificationMailer for UnconfiguredMailer {
    async fn send_code(
        &self,
        _recipient: &EmailAddress,
        _code: &VerificationCode,
    ) -> Result<(), MailerError> {
        Err(MailerError::not_configured())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;

    #[tokio::test]
    async fn unconfigured_mailer_reports_unavailable() {
        let err = UnconfiguredMailer
            .send_code(
                &EmailAddress::from_trusted("a@b.com"),
                &VerificationCode::generate(),
            )
            .await
            .expect_err("no transport");
        assert_eq!(Error::from(err).code(), ErrorCode::ServiceUnavailable);
    }
}
