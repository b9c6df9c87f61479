//! Wiring of outbound adapters into the HTTP state.

use std::io;
use std::sync::Arc;

use mockable::DefaultClock;
use tracing::{info, warn};

use safeplate::domain::ports::{
    ObjectStorage, UnconfiguredMailer, UnconfiguredStorage, VerificationMailer,
};
use safeplate::inbound::http::state::{HttpState, HttpStatePorts};
use safeplate::outbound::mail::SmtpMailer;
use safeplate::outbound::media::{CapStdUploadSpool, S3ObjectStorage, WebpTranscoder};
use safeplate::outbound::persistence::{
    DieselAllergyRepository, DieselDishRepository, DieselIngredientRepository,
    DieselPendingIngredientRepository, DieselRestaurantRepository, DieselUserRepository,
};
use safeplate::outbound::security::{Argon2PasswordHasher, JwtTokenIssuer};

use super::ServerConfig;

fn build_mailer(config: &ServerConfig) -> io::Result<Arc<dyn VerificationMailer>> {
    match &config.smtp {
        Some(settings) => {
            let mailer = SmtpMailer::new(settings.clone()).map_err(io::Error::other)?;
            info!(host = %settings.host, port = settings.port, "SMTP delivery enabled");
            Ok(Arc::new(mailer))
        }
        None => {
            warn!("SMTP is not configured; verification codes cannot be sent");
            Ok(Arc::new(UnconfiguredMailer))
        }
    }
}

fn build_storage(config: &ServerConfig) -> io::Result<Arc<dyn ObjectStorage>> {
    match &config.s3 {
        Some(settings) => {
            let storage = S3ObjectStorage::new(settings.clone()).map_err(io::Error::other)?;
            info!(bucket = %settings.bucket, "object storage enabled");
            Ok(Arc::new(storage))
        }
        None => {
            warn!("object storage is not configured; image uploads are disabled");
            Ok(Arc::new(UnconfiguredStorage))
        }
    }
}

/// Build the HTTP state from Diesel repositories and the configured adapters.
///
/// # Errors
/// Returns [`io::Error`] when the spool directory cannot be opened or an
/// SMTP/S3 client cannot be constructed from its settings.
pub fn build_http_state(config: &ServerConfig) -> io::Result<HttpState> {
    let pool = &config.db_pool;
    let spool = CapStdUploadSpool::open(&config.upload_dir)?;
    Ok(HttpState::new(HttpStatePorts {
        users: Arc::new(DieselUserRepository::new(pool.clone())),
        allergies: Arc::new(DieselAllergyRepository::new(pool.clone())),
        ingredients: Arc::new(DieselIngredientRepository::new(pool.clone())),
        pending: Arc::new(DieselPendingIngredientRepository::new(pool.clone())),
        restaurants: Arc::new(DieselRestaurantRepository::new(pool.clone())),
        dishes: Arc::new(DieselDishRepository::new(pool.clone())),
        hasher: Arc::new(Argon2PasswordHasher::default()),
        tokens: Arc::new(JwtTokenIssuer::new(
            &config.token_secret,
            Arc::new(DefaultClock),
        )),
        mailer: build_mailer(config)?,
        transcoder: Arc::new(WebpTranscoder),
        spool: Arc::new(spool),
        storage: build_storage(config)?,
    }))
}
