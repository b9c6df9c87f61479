//! SMTP implementation of the `VerificationMailer` port using `lettre`.

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

use crate::domain::ports::{MailerError, VerificationMailer};
use crate::domain::{EmailAddress, VerificationCode};

const SUBJECT: &str = "Email Verification";
const SENDER_NAME: &str = "NoReply";

/// Connection settings for the SMTP relay.
#[derive(Clone)]
pub struct SmtpSettings {
    /// Relay host name.
    pub host: String,
    /// Relay port; STARTTLS is negotiated after connecting.
    pub port: u16,
    /// Optional login name.
    pub username: Option<String>,
    /// Optional login secret.
    pub password: Option<String>,
    /// Sender address.
    pub from: String,
}

/// Delivers verification codes through an SMTP relay.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Build a mailer for `settings`. No connection is opened until the first
    /// message is sent.
    pub fn new(settings: SmtpSettings) -> Result<Self, MailerError> {
        let from = sender(&settings.from)?;
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
            .map_err(|err| MailerError::delivery(err.to_string()))?
            .port(settings.port);
        if let (Some(username), Some(password)) = (settings.username, settings.password) {
            builder = builder.credentials(Credentials::new(username, password));
        }
        Ok(Self {
            transport: builder.build(),
            from,
        })
    }

    fn compose(
        &self,
        recipient: &EmailAddress,
        code: &VerificationCode,
    ) -> Result<Message, MailerError> {
        let to: Mailbox = recipient
            .as_str()
            .parse()
            .map_err(|err: lettre::address::AddressError| MailerError::delivery(err.to_string()))?;
        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(SUBJECT)
            .multipart(MultiPart::alternative_plain_html(
                plain_body(code),
                html_body(code),
            ))
            .map_err(|err| MailerError::delivery(err.to_string()))
    }
}

fn sender(address: &str) -> Result<Mailbox, MailerError> {
    let address = address
        .parse()
        .map_err(|err: lettre::address::AddressError| MailerError::delivery(err.to_string()))?;
    Ok(Mailbox::new(Some(SENDER_NAME.to_owned()), address))
}

fn plain_body(code: &VerificationCode) -> String {
    format!("Your verification code is {}.", code.as_str())
}

fn html_body(code: &VerificationCode) -> String {
    format!(
        "<p>Your verification code is:</p><h2 style=\"letter-spacing:4px\">{}</h2>",
        code.as_str()
    )
}

#[async_trait]
impl VerificationMailer for SmtpMailer {
    async fn send_code(
        &self,
        recipient: &EmailAddress,
        code: &VerificationCode,
    ) -> Result<(), MailerError> {
        let message = self.compose(recipient, code)?;
        self.transport
            .send(message)
            .await
            .map_err(|err| MailerError::delivery(err.to_string()))?;
        info!("verification email sent");
        Ok(())
    }
}
