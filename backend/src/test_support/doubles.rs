//! Lightweight stand-ins for the credential, mail, and media ports.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::ports::{
    CredentialError, ImageError, ImageTranscoder, MailerError, ObjectStorage, PasswordHasher,
    SpoolError, SpooledFile, StorageError, UploadSpool, VerificationMailer,
};
use crate::domain::{EmailAddress, Password, PasswordDigest, VerificationCode};

fn guard<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Reversible "hash" that keeps handler tests fast.
///
/// # Examples
/// ```
/// use safeplate::domain::ports::PasswordHasher;
/// use safeplate::test_support::PlainTextHasher;
///
/// let digest = PlainTextHasher.digest("Aa1!aaaa");
/// assert!(PlainTextHasher.verify("Aa1!aaaa", &digest).unwrap());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextHasher;

impl PlainTextHasher {
    const PREFIX: &'static str = "plain$";

    /// Digest for a raw secret, for seeding users directly.
    pub fn digest(&self, secret: &str) -> PasswordDigest {
        PasswordDigest::new(format!("{}{secret}", Self::PREFIX))
    }
}

impl PasswordHasher for PlainTextHasher {
    fn hash(&self, password: &Password) -> Result<PasswordDigest, CredentialError> {
        Ok(self.digest(password.expose()))
    }

    fn verify(&self, secret: &str, digest: &PasswordDigest) -> Result<bool, CredentialError> {
        let stored = digest
            .as_str()
            .strip_prefix(Self::PREFIX)
            .ok_or_else(|| CredentialError::malformed_digest("missing plain$ prefix"))?;
        Ok(stored == secret)
    }
}

/// Mailer that remembers every code instead of sending it.
#[derive(Clone, Default)]
pub struct RecordingMailer {
    sent: Arc<Mutex<Vec<(String, String)>>>,
}

impl RecordingMailer {
    /// `(recipient, code)` pairs in send order.
    pub fn sent(&self) -> Vec<(String, String)> {
        guard(&self.sent).clone()
    }
}

#[async_trait]
impl VerificationMailer for RecordingMailer {
    async fn send_code(
        &self,
        recipient: &EmailAddress,
        code: &VerificationCode,
    ) -> Result<(), MailerError> {
        guard(&self.sent).push((recipient.as_str().to_owned(), code.as_str().to_owned()));
        Ok(())
    }
}

/// Transcoder that accepts anything starting with a PNG signature.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThroughTranscoder;

impl ImageTranscoder for PassThroughTranscoder {
    fn to_webp(&self, bytes: &[u8]) -> Result<Vec<u8>, ImageError> {
        const PNG: &[u8] = b"\x89PNG";
        if bytes.starts_with(PNG) {
            Ok(bytes.to_vec())
        } else {
            Err(ImageError::decode("not a PNG"))
        }
    }
}

/// Spool backed by a map.
#[derive(Clone, Default)]
pub struct MemorySpool {
    files: Arc<Mutex<BTreeMap<String, Vec<u8>>>>,
}

impl MemorySpool {
    /// Names of files still spooled.
    pub fn remaining(&self) -> Vec<String> {
        guard(&self.files).keys().cloned().collect()
    }
}

#[async_trait]
impl UploadSpool for MemorySpool {
    async fn write(&self, name: &str, bytes: &[u8]) -> Result<SpooledFile, SpoolError> {
        guard(&self.files).insert(name.to_owned(), bytes.to_vec());
        Ok(SpooledFile {
            name: name.to_owned(),
            len: bytes.len() as u64,
        })
    }

    async fn read(&self, file: &SpooledFile) -> Result<Vec<u8>, SpoolError> {
        guard(&self.files)
            .get(&file.name)
            .cloned()
            .ok_or_else(|| SpoolError::io(format!("{} is not spooled", file.name)))
    }

    async fn remove(&self, file: &SpooledFile) -> Result<(), SpoolError> {
        guard(&self.files).remove(&file.name);
        Ok(())
    }
}

/// Object store that records keys and answers with a fixed CDN URL.
#[derive(Clone, Default)]
pub struct RecordingStorage {
    keys: Arc<Mutex<Vec<String>>>,
}

impl RecordingStorage {
    /// Base of every URL this store returns.
    pub const BASE_URL: &'static str = "https://cdn.test";

    /// Keys uploaded so far.
    pub fn keys(&self) -> Vec<String> {
        guard(&self.keys).clone()
    }
}

#[async_trait]
impl ObjectStorage for RecordingStorage {
    async fn put(
        &self,
        key: &str,
        _content_type: &str,
        _bytes: Vec<u8>,
    ) -> Result<String, StorageError> {
        guard(&self.keys).push(key.to_owned());
        Ok(format!("{}/{key}", Self::BASE_URL))
    }
}
