//! Test utilities for the backend crate.
//!
//! This module provides shared helpers for both unit tests (in `src/`) and
//! integration tests (in `tests/`). It is compiled for `cfg(test)` and when
//! the `test-support` feature is enabled.

mod doubles;
mod memory_database;

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;

pub use doubles::{
    MemorySpool, PassThroughTranscoder, PlainTextHasher, RecordingMailer, RecordingStorage,
};
pub use memory_database::MemoryDatabase;

use crate::domain::ports::{TokenIssuer, TokenSubject};
use crate::domain::{Role, User};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::security::JwtTokenIssuer;

/// Password every seeded user signs in with.
pub const SEED_PASSWORD: &str = "Aa1!aaaa";

const TOKEN_SECRET: &[u8] = b"test-support-token-secret";

/// In-memory wiring of the whole HTTP state.
///
/// Tokens are real HS256 tokens so the bearer extractor is exercised end to
/// end; every other adapter is an in-memory double.
///
/// # Examples
/// ```
/// use safeplate::domain::Role;
/// use safeplate::test_support::TestHarness;
///
/// let harness = TestHarness::new();
/// let (user, token) = harness.seed_user("admin@example.com", Role::Admin);
/// assert!(user.is_admin());
/// assert!(!token.is_empty());
/// ```
#[derive(Clone)]
pub struct TestHarness {
    /// Shared tables behind every repository port.
    pub db: MemoryDatabase,
    /// Captures verification codes.
    pub mailer: RecordingMailer,
    /// Upload spool contents.
    pub spool: MemorySpool,
    /// Published object keys.
    pub storage: RecordingStorage,
    tokens: Arc<JwtTokenIssuer>,
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

impl TestHarness {
    /// Fresh, empty harness.
    pub fn new() -> Self {
        Self {
            db: MemoryDatabase::default(),
            mailer: RecordingMailer::default(),
            spool: MemorySpool::default(),
            storage: RecordingStorage::default(),
            tokens: Arc::new(JwtTokenIssuer::new(
                TOKEN_SECRET,
                Arc::new(DefaultClock),
            )),
        }
    }

    /// Services wired to the in-memory adapters.
    pub fn state(&self) -> HttpState {
        let db = Arc::new(self.db.clone());
        HttpState::new(HttpStatePorts {
            users: db.clone(),
            allergies: db.clone(),
            ingredients: db.clone(),
            pending: db.clone(),
            restaurants: db.clone(),
            dishes: db,
            hasher: Arc::new(PlainTextHasher),
            tokens: self.tokens.clone(),
            mailer: Arc::new(self.mailer.clone()),
            transcoder: Arc::new(PassThroughTranscoder),
            spool: Arc::new(self.spool.clone()),
            storage: Arc::new(self.storage.clone()),
        })
    }

    /// [`Self::state`] ready for `App::app_data`.
    pub fn data(&self) -> web::Data<HttpState> {
        web::Data::new(self.state())
    }

    /// Store a user with [`SEED_PASSWORD`] and return it with a bearer token.
    pub fn seed_user(&self, email: &str, role: Role) -> (User, String) {
        let user = self.db.insert_user(
            email,
            "Test User",
            &PlainTextHasher.digest(SEED_PASSWORD),
            role,
        );
        let token = self.token_for(&user);
        (user, token)
    }

    /// Sign a token for an existing user.
    pub fn token_for(&self, user: &User) -> String {
        self.tokens
            .issue(&TokenSubject {
                id: user.id,
                full_name: user.full_name.clone(),
            })
            .unwrap_or_else(|err| panic!("test token signing failed: {err}"))
    }
}

const MULTIPART_BOUNDARY: &str = "safeplate-test-boundary";

/// `multipart/form-data` body with one file part named `field`.
///
/// Returns the `content-type` header value and the encoded body.
pub fn multipart_file(field: &str, filename: &str, bytes: &[u8]) -> (String, Vec<u8>) {
    let mut body = Vec::with_capacity(bytes.len() + 256);
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    (
        format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
        body,
    )
}
