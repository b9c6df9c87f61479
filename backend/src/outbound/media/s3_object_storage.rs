//! `ObjectStorage` backed by an S3-compatible bucket via `rust-s3`.

use async_trait::async_trait;
use s3::creds::Credentials;
use s3::{Bucket, Region};
use tracing::debug;

use crate::domain::ports::{ObjectStorage, StorageError};

/// Bucket location and credentials.
#[derive(Clone, Default)]
pub struct S3Settings {
    /// Bucket name.
    pub bucket: String,
    /// AWS region name, or the signing region of a custom endpoint.
    pub region: String,
    /// Custom endpoint for S3-compatible services; enables path-style URLs.
    pub endpoint: Option<String>,
    /// Access key id; falls back to the standard AWS credential chain.
    pub access_key: Option<String>,
    /// Secret access key.
    pub secret_key: Option<String>,
    /// Base URL objects are served from; derived from the bucket when absent.
    pub public_base_url: Option<String>,
}

/// Publishes objects to an S3 bucket.
#[derive(Clone)]
pub struct S3ObjectStorage {
    bucket: Box<Bucket>,
    public_base_url: String,
}

impl S3ObjectStorage {
    /// Build a client for `settings`. No request is made until the first
    /// upload.
    pub fn new(settings: S3Settings) -> Result<Self, StorageError> {
        let region = match &settings.endpoint {
            Some(endpoint) => Region::Custom {
                region: settings.region.clone(),
                endpoint: endpoint.clone(),
            },
            None => settings
                .region
                .parse::<Region>()
                .map_err(|err| StorageError::upload(err.to_string()))?,
        };
        let credentials = Credentials::new(
            settings.access_key.as_deref(),
            settings.secret_key.as_deref(),
            None,
            None,
            None,
        )
        .map_err(|err| StorageError::upload(err.to_string()))?;
        let mut bucket = Bucket::new(&settings.bucket, region, credentials)
            .map_err(|err| StorageError::upload(err.to_string()))?;
        if settings.endpoint.is_some() {
            bucket = bucket.with_path_style();
        }
        let public_base_url = settings
            .public_base_url
            .clone()
            .unwrap_or_else(|| default_base_url(&settings));
        Ok(Self {
            bucket,
            public_base_url,
        })
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/{key}", self.public_base_url.trim_end_matches('/'))
    }
}

fn default_base_url(settings: &S3Settings) -> String {
    match &settings.endpoint {
        Some(endpoint) => format!("{}/{}", endpoint.trim_end_matches('/'), settings.bucket),
        None => format!(
            "https://{}.s3.{}.amazonaws.com",
            settings.bucket, settings.region
        ),
    }
}

#[async_trait]
impl ObjectStorage for S3ObjectStorage {
    async fn put(
        &self,
        key: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StorageError> {
        let response = self
            .bucket
            .put_object_with_content_type(key, &bytes, content_type)
            .await
            .map_err(|err| StorageError::upload(err.to_string()))?;
        let status = response.status_code();
        if !(200..300).contains(&status) {
            return Err(StorageError::upload(format!(
                "bucket answered with status {status}"
            )));
        }
        debug!(key, status, "object stored");
        Ok(self.object_url(key))
    }
}
