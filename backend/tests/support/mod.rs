//! Embedded PostgreSQL for the Diesel adapter suites.
//!
//! Every test gets its own database cloned from a template that already has
//! the embedded migrations applied, so suites never observe each other's
//! rows. The template name carries a hash of `migrations/`, which rebuilds
//! it whenever the schema changes.
//!
//! Tests run synchronously and drive async repository calls through the
//! runtime owned by [`PgWorld`]: the cluster bootstrap blocks on its own
//! runtime and must not be entered from inside a Tokio task.

#![allow(dead_code, reason = "each suite uses a different subset of helpers")]

pub mod catalogue;

use std::future::Future;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::MigrationHarness;
use pg_embedded_setup_unpriv::test_support::{hash_directory, shared_cluster_handle};
use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};
use tokio::runtime::Runtime;
use uuid::Uuid;

use safeplate::outbound::persistence::{DbPool, MIGRATIONS, PoolConfig};

static TEMPLATE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

/// A migrated, empty database plus the runtime that talks to it.
pub struct PgWorld {
    runtime: Runtime,
    pub pool: DbPool,
    _database: TemporaryDatabase,
}

impl PgWorld {
    /// Run an async block against the database.
    pub fn run<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}

/// Provision a fresh database, or `None` when the cluster is unavailable and
/// `SKIP_TEST_CLUSTER` allows skipping.
pub fn pg_world() -> Option<PgWorld> {
    match provision() {
        Ok(world) => Some(world),
        Err(reason) => skip_or_fail(reason),
    }
}

fn provision() -> Result<PgWorld, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = shared_cluster_handle().map_err(|err| format!("start cluster: {err:?}"))?;
    let template = ensure_template(cluster)?;
    let database = cluster
        .temporary_database_from_template(format!("test_{}", Uuid::new_v4()).as_str(), template.as_str())
        .map_err(|err| format!("clone template: {err:?}"))?;
    let pool = runtime
        .block_on(DbPool::new(
            PoolConfig::new(database.url()).with_max_size(2),
        ))
        .map_err(|err| err.to_string())?;
    Ok(PgWorld {
        runtime,
        pool,
        _database: database,
    })
}

fn ensure_template(cluster: &ClusterHandle) -> Result<String, String> {
    let migrations = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("migrations");
    let hash = hash_directory(migrations).map_err(|err| format!("hash migrations: {err:?}"))?;
    let name = format!("safeplate_template_{}", hash.get(..8).unwrap_or(&hash));

    let _guard = TEMPLATE_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|err| err.into_inner());
    let exists = cluster
        .database_exists(name.as_str())
        .map_err(|err| format!("template check: {err:?}"))?;
    if !exists {
        cluster
            .create_database(name.as_str())
            .map_err(|err| format!("create template: {err:?}"))?;
        let url = cluster.connection().database_url(&name);
        let mut conn = PgConnection::establish(&url).map_err(|err| err.to_string())?;
        conn.run_pending_migrations(MIGRATIONS)
            .map_err(|err| format!("migrate template: {err}"))?;
    }
    Ok(name)
}

/// Whether `SKIP_TEST_CLUSTER` is `1`, `true` or `yes`.
fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

fn skip_or_fail<T>(reason: String) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}
