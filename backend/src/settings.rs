//! Process configuration loaded via OrthoConfig.
//!
//! Values come from `SAFEPLATE_*` environment variables, matching CLI flags,
//! or a configuration file. Every field is optional at load time; accessors
//! apply defaults and report settings the server cannot start without.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::inbound::http::cors::AllowedOrigins;
use crate::outbound::mail::SmtpSettings;
use crate::outbound::media::S3Settings;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_S3_REGION: &str = "us-east-1";
const UPLOAD_DIR_NAME: &str = "safeplate-uploads";

/// A setting the server requires is absent or malformed.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("missing required setting {env}")]
    Missing { env: &'static str },
    #[error("invalid value for {env}: {reason}")]
    Invalid { env: &'static str, reason: String },
}

/// Server settings.
#[derive(Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SAFEPLATE")]
pub struct AppSettings {
    /// PostgreSQL connection URL.
    pub database_url: Option<String>,
    /// HS256 signing secret for bearer tokens.
    pub token_secret: Option<String>,
    /// Listen address.
    pub host: Option<String>,
    /// Listen port.
    pub port: Option<u16>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Apply embedded migrations at startup.
    pub run_migrations: Option<bool>,
    pub smtp_host: Option<String>,
    pub smtp_port: Option<u16>,
    pub smtp_user: Option<String>,
    pub smtp_pass: Option<String>,
    /// Sender address; defaults to `smtp_user`.
    pub smtp_from: Option<String>,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    /// Custom endpoint for S3-compatible stores.
    pub s3_endpoint: Option<String>,
    pub s3_access_key: Option<String>,
    pub s3_secret_key: Option<String>,
    /// Base URL published objects are served from.
    pub s3_public_base_url: Option<String>,
    /// Directory transcoded uploads are spooled to before publishing.
    pub upload_temp_dir: Option<PathBuf>,
    /// Comma-separated browser origins; unset or `*` admits any origin.
    pub cors_allowed_origins: Option<String>,
}

impl fmt::Debug for AppSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppSettings")
            .field("database_url", &self.database_url.as_ref().map(|_| "<set>"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("db_max_connections", &self.db_max_connections)
            .field("run_migrations", &self.run_migrations)
            .field("smtp_host", &self.smtp_host)
            .field("s3_bucket", &self.s3_bucket)
            .field("upload_temp_dir", &self.upload_temp_dir)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .finish_non_exhaustive()
    }
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|raw| raw.trim()).filter(|raw| !raw.is_empty())
}

impl AppSettings {
    /// Database URL; the server refuses to start without one.
    pub fn database_url(&self) -> Result<&str, SettingsError> {
        non_blank(self.database_url.as_ref()).ok_or(SettingsError::Missing {
            env: "SAFEPLATE_DATABASE_URL",
        })
    }

    /// Token signing secret.
    pub fn token_secret(&self) -> Result<&[u8], SettingsError> {
        non_blank(self.token_secret.as_ref())
            .map(str::as_bytes)
            .ok_or(SettingsError::Missing {
                env: "SAFEPLATE_TOKEN_SECRET",
            })
    }

    /// Listen address, `0.0.0.0:5000` by default.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let ip = match non_blank(self.host.as_ref()) {
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            Some(host) => host.parse().map_err(|err: std::net::AddrParseError| {
                SettingsError::Invalid {
                    env: "SAFEPLATE_HOST",
                    reason: err.to_string(),
                }
            })?,
        };
        Ok(SocketAddr::new(ip, self.port.unwrap_or(DEFAULT_PORT)))
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    pub fn run_migrations(&self) -> bool {
        self.run_migrations.unwrap_or(true)
    }

    /// SMTP relay settings, or `None` when no host is configured.
    pub fn smtp(&self) -> Result<Option<SmtpSettings>, SettingsError> {
        let Some(host) = non_blank(self.smtp_host.as_ref()) else {
            return Ok(None);
        };
        let from = non_blank(self.smtp_from.as_ref())
            .or_else(|| non_blank(self.smtp_user.as_ref()))
            .ok_or(SettingsError::Missing {
                env: "SAFEPLATE_SMTP_FROM",
            })?;
        Ok(Some(SmtpSettings {
            host: host.to_owned(),
            port: self.smtp_port.unwrap_or(DEFAULT_SMTP_PORT),
            username: self.smtp_user.clone(),
            password: self.smtp_pass.clone(),
            from: from.to_owned(),
        }))
    }

    /// Object storage settings, or `None` when no bucket is configured.
    pub fn s3(&self) -> Option<S3Settings> {
        let bucket = non_blank(self.s3_bucket.as_ref())?;
        Some(S3Settings {
            bucket: bucket.to_owned(),
            region: non_blank(self.s3_region.as_ref())
                .unwrap_or(DEFAULT_S3_REGION)
                .to_owned(),
            endpoint: non_blank(self.s3_endpoint.as_ref()).map(str::to_owned),
            access_key: self.s3_access_key.clone(),
            secret_key: self.s3_secret_key.clone(),
            public_base_url: non_blank(self.s3_public_base_url.as_ref()).map(str::to_owned),
        })
    }

    /// Upload spool directory.
    pub fn upload_temp_dir(&self) -> PathBuf {
        self.upload_temp_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(UPLOAD_DIR_NAME))
    }

    /// Browser origins permitted by the CORS policy.
    ///
    /// Each entry must be an `http` or `https` origin without a path; it is
    /// normalised to its serialised form (`https://app.example.com`).
    pub fn cors_allowed_origins(&self) -> Result<AllowedOrigins, SettingsError> {
        let Some(raw) = non_blank(self.cors_allowed_origins.as_ref()) else {
            return Ok(AllowedOrigins::Any);
        };
        if raw == "*" {
            return Ok(AllowedOrigins::Any);
        }
        raw.split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(parse_origin)
            .collect::<Result<Vec<_>, _>>()
            .map(AllowedOrigins::List)
    }
}

fn parse_origin(entry: &str) -> Result<String, SettingsError> {
    let invalid = |reason: String| SettingsError::Invalid {
        env: "SAFEPLATE_CORS_ALLOWED_ORIGINS",
        reason,
    };
    let url = Url::parse(entry).map_err(|err| invalid(format!("{entry}: {err}")))?;
    if !matches!(url.scheme(), "http" | "https") || url.host().is_none() {
        return Err(invalid(format!("{entry}: expected an http(s) origin")));
    }
    if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
        return Err(invalid(format!("{entry}: origins carry no path")));
    }
    Ok(url.origin().ascii_serialization())
}
