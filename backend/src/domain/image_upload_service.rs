//! Image uploads: transcode to WebP, spool to disk, publish to object storage.

use std::sync::Arc;

use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::domain::Error;
use crate::domain::blocking::run_blocking;
use crate::domain::ports::{ImageTranscoder, ObjectStorage, SpooledFile, UploadSpool};

/// Key prefix for published dish images.
pub const IMAGE_KEY_PREFIX: &str = "weekly/";

/// Image upload use-case behind `POST /upload/image`.
#[derive(Clone)]
pub struct ImageUploadService {
    transcoder: Arc<dyn ImageTranscoder>,
    spool: Arc<dyn UploadSpool>,
    storage: Arc<dyn ObjectStorage>,
}

impl ImageUploadService {
    /// Create the service from its driven ports.
    pub fn new(
        transcoder: Arc<dyn ImageTranscoder>,
        spool: Arc<dyn UploadSpool>,
        storage: Arc<dyn ObjectStorage>,
    ) -> Self {
        Self {
            transcoder,
            spool,
            storage,
        }
    }

    /// Publish an uploaded image and return its public URL.
    ///
    /// The object key is derived from the WebP content, so re-uploading the
    /// same picture yields the same URL.
    pub async fn upload(&self, bytes: Vec<u8>) -> Result<String, Error> {
        if bytes.is_empty() {
            return Err(Error::invalid_request("no image provided"));
        }

        let transcoder = Arc::clone(&self.transcoder);
        let webp = run_blocking(move || transcoder.to_webp(&bytes).map_err(Error::from)).await?;
        let name = format!("{}.webp", hex::encode(Sha256::digest(&webp)));

        let spooled = self.spool.write(&name, &webp).await?;
        let published = match self.spool.read(&spooled).await {
            Ok(content) => {
                self.storage
                    .put(&format!("{IMAGE_KEY_PREFIX}{name}"), "image/webp", content)
                    .await
            }
            Err(err) => {
                self.discard(&spooled).await;
                return Err(err.into());
            }
        };
        self.discard(&spooled).await;

        let url = published?;
        info!(bytes = spooled.len, url = %url, "image published");
        Ok(url)
    }

    async fn discard(&self, spooled: &SpooledFile) {
        if let Err(err) = self.spool.remove(spooled).await {
            warn!(error = %err, file = %spooled.name, "failed to remove spooled upload");
        }
    }
}
