//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::path::PathBuf;

use safeplate::inbound::http::cors::AllowedOrigins;
use safeplate::outbound::mail::SmtpSettings;
use safeplate::outbound::media::S3Settings;
use safeplate::outbound::persistence::DbPool;
use zeroize::Zeroizing;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) token_secret: Zeroizing<Vec<u8>>,
    pub(crate) smtp: Option<SmtpSettings>,
    pub(crate) s3: Option<S3Settings>,
    pub(crate) upload_dir: PathBuf,
    pub(crate) cors: AllowedOrigins,
}

impl ServerConfig {
    /// Construct a configuration with email delivery and image storage
    /// disabled, uploads spooled to the system temp directory, and browser
    /// calls admitted from any origin.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, db_pool: DbPool, token_secret: &[u8]) -> Self {
        Self {
            bind_addr,
            db_pool,
            token_secret: Zeroizing::new(token_secret.to_vec()),
            smtp: None,
            s3: None,
            upload_dir: std::env::temp_dir(),
            cors: AllowedOrigins::default(),
        }
    }

    /// Deliver verification codes through `smtp` when present.
    #[must_use]
    pub fn with_smtp(mut self, smtp: Option<SmtpSettings>) -> Self {
        self.smtp = smtp;
        self
    }

    /// Publish uploads to `s3` when present.
    #[must_use]
    pub fn with_s3(mut self, s3: Option<S3Settings>) -> Self {
        self.s3 = s3;
        self
    }

    #[must_use]
    pub fn with_upload_dir(mut self, upload_dir: PathBuf) -> Self {
        self.upload_dir = upload_dir;
        self
    }

    /// Restrict browser calls to `origins`.
    #[must_use]
    pub fn with_cors(mut self, origins: AllowedOrigins) -> Self {
        self.cors = origins;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
