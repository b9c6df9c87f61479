//! Offloading CPU-bound work from the async reactor.

use super::Error;

/// Run `work` on Tokio's blocking pool and flatten join failures into
/// internal errors.
pub(crate) async fn run_blocking<T, F>(work: F) -> Result<T, Error>
where
    F: FnOnce() -> Result<T, Error> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|err| Error::internal(format!("blocking task failed: {err}")))?
}
