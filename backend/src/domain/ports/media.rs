//! Ports for image upload: transcoding, temporary spooling, and object
//! storage.

use async_trait::async_trait;

use crate::domain::Error;

use super::define_port_error;

define_port_error! {
    /// Errors raised by image transcoders.
    pub enum ImageError {
        /// The upload is not a decodable image.
        Decode { message: String } => "image could not be decoded: {message}",
        /// The decoded image could not be re-encoded.
        Encode { message: String } => "image could not be encoded: {message}",
    }
}

define_port_error! {
    /// Errors raised by upload spools.
    pub enum SpoolError {
        /// Reading, writing, or removing a spooled file failed.
        Io { message: String } => "upload spool failed: {message}",
    }
}

define_port_error! {
    /// Errors raised by object stores.
    pub enum StorageError {
        /// No bucket is configured.
        NotConfigured => "image storage is not configured",
        /// The object could not be stored.
        Upload { message: String } => "image upload failed: {message}",
    }
}

impl From<ImageError> for Error {
    fn from(error: ImageError) -> Self {
        match error {
            ImageError::Decode { .. } => Self::invalid_request("upload is not a valid image"),
            ImageError::Encode { .. } => Self::internal(error.to_string()),
        }
    }
}

impl From<SpoolError> for Error {
    fn from(error: SpoolError) -> Self {
        Self::internal(error.to_string())
    }
}

impl From<StorageError> for Error {
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::NotConfigured => Self::service_unavailable(error.to_string()),
            StorageError::Upload { .. } => Self::internal(error.to_string()),
        }
    }
}

/// Converts uploaded images to WebP.
#[cfg_attr(test, mockall::automock)]
pub trait ImageTranscoder: Send + Sync {
    /// Decode `bytes` in any supported format and encode them as WebP.
    fn to_webp(&self, bytes: &[u8]) -> Result<Vec<u8>, ImageError>;
}

/// Handle to a file held in the upload spool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpooledFile {
    /// File name inside the spool directory.
    pub name: String,
    /// Size in bytes.
    pub len: u64,
}

/// Temporary on-disk storage for uploads on their way to object storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UploadSpool: Send + Sync {
    /// Write `bytes` under `name`.
    async fn write(&self, name: &str, bytes: &[u8]) -> Result<SpooledFile, SpoolError>;

    /// Read a spooled file back.
    async fn read(&self, file: &SpooledFile) -> Result<Vec<u8>, SpoolError>;

    /// Remove a spooled file.
    async fn remove(&self, file: &SpooledFile) -> Result<(), SpoolError>;
}

/// Public object storage for images.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `bytes` under `key` and return the object's public URL.
    async fn put(
        &self,
        key: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StorageError>;
}

/// Store used when no bucket is configured; every upload fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredStorage;

#[async_trait]
impl ObjectStorage for UnconfiguredStorage {
    async fn put(
        &self,
        _key: &str,
        _content_type: &str,
        _bytes: Vec<u8>,
    ) -> Result<String, StorageError> {
        Err(StorageError::not_configured())
    }
}
