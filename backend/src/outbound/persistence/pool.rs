//! Shared PostgreSQL connection pool.
//!
//! `main` builds one [`DbPool`] and every Diesel repository holds a clone of
//! it. A repository method checks out exactly one connection through
//! [`DbPool::checkout`] and keeps it for the whole call, so the multi-row
//! writes (tag replacement, unlink-then-delete, pending approval) run their
//! `transaction` on that single connection. A checkout that times out
//! surfaces as [`PersistenceError::Connection`], which the API reports as
//! 503.

use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};
use tracing::warn;

use crate::domain::ports::PersistenceError;

/// Connection borrowed from the pool for the duration of one repository call.
pub type PgConn<'a> = PooledConnection<'a, AsyncPgConnection>;

/// The pool could not be built at startup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to build connection pool: {message}")]
pub struct PoolError {
    message: String,
}

/// Pool sizing and checkout timeout.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use safeplate::outbound::persistence::PoolConfig;
///
/// let config = PoolConfig::new("postgres://safeplate@localhost/safeplate")
///     .with_max_size(20)
///     .with_checkout_timeout(Duration::from_secs(5));
/// assert_eq!(config.max_size(), 20);
/// ```
#[derive(Debug, Clone)]
pub struct PoolConfig {
    database_url: String,
    max_size: u32,
    checkout_timeout: Duration,
}

impl PoolConfig {
    /// Ten connections and a ten second checkout timeout.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_size: 10,
            checkout_timeout: Duration::from_secs(10),
        }
    }

    /// Cap the pool size; zero is raised to one.
    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size.max(1);
        self
    }

    /// How long a repository call waits for a free connection.
    pub fn with_checkout_timeout(mut self, timeout: Duration) -> Self {
        self.checkout_timeout = timeout;
        self
    }

    pub fn max_size(&self) -> u32 {
        self.max_size
    }
}

/// Cloneable handle to the bb8 pool of async Diesel connections.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
}

impl DbPool {
    /// Build the pool. Connections are opened lazily on first checkout.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError`] when bb8 rejects the configuration.
    pub async fn new(config: PoolConfig) -> Result<Self, PoolError> {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(config.database_url);
        let inner = Pool::builder()
            .max_size(config.max_size)
            .connection_timeout(config.checkout_timeout)
            .build(manager)
            .await
            .map_err(|err| PoolError {
                message: err.to_string(),
            })?;
        Ok(Self { inner })
    }

    /// Borrow one connection for a repository call.
    ///
    /// # Errors
    ///
    /// [`PersistenceError::Connection`] when no connection frees up in time or
    /// the database refuses new connections.
    pub async fn checkout(&self) -> Result<PgConn<'_>, PersistenceError> {
        self.inner.get().await.map_err(|err| {
            warn!(error = %err, "database connection checkout failed");
            PersistenceError::connection(err.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Error, ErrorCode};
    use rstest::rstest;

    #[rstest]
    #[case(0, 1)]
    #[case(25, 25)]
    fn max_size_is_at_least_one(#[case] requested: u32, #[case] expected: u32) {
        let config = PoolConfig::new("postgres://localhost/safeplate").with_max_size(requested);
        assert_eq!(config.max_size(), expected);
        assert_eq!(config.checkout_timeout, Duration::from_secs(10));
    }

    #[tokio::test]
    async fn unreachable_databases_fail_checkout_as_unavailable() {
        // Nothing listens on port 1; bb8 gives up after the checkout timeout.
        let pool = DbPool::new(
            PoolConfig::new("postgres://safeplate@127.0.0.1:1/safeplate")
                .with_max_size(1)
                .with_checkout_timeout(Duration::from_millis(200)),
        )
        .await
        .expect("lazy pool builds without connecting");

        let Err(err) = pool.checkout().await else {
            panic!("checkout should fail without a server");
        };
        assert!(matches!(err, PersistenceError::Connection { .. }));
        assert_eq!(Error::from(err).code(), ErrorCode::ServiceUnavailable);
    }
}
