//! `UploadSpool` backed by a capability-scoped directory.

use std::io;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use uuid::Uuid;

use crate::domain::ports::{SpoolError, SpooledFile, UploadSpool};

/// Holds uploads in a single directory between transcoding and publishing.
///
/// Spooled names are prefixed with a random UUID so concurrent uploads of the
/// same picture never share a file.
#[derive(Clone)]
pub struct CapStdUploadSpool {
    dir: Arc<Dir>,
}

impl CapStdUploadSpool {
    /// Open `path`, creating it when missing.
    pub fn open(path: &Path) -> io::Result<Self> {
        Dir::create_ambient_dir_all(path, ambient_authority())?;
        let dir = Dir::open_ambient_dir(path, ambient_authority())?;
        Ok(Self { dir: Arc::new(dir) })
    }

    async fn blocking<T, F>(&self, work: F) -> Result<T, SpoolError>
    where
        T: Send + 'static,
        F: FnOnce(&Dir) -> io::Result<T> + Send + 'static,
    {
        let dir = Arc::clone(&self.dir);
        tokio::task::spawn_blocking(move || work(&dir))
            .await
            .map_err(|err| SpoolError::io(err.to_string()))?
            .map_err(|err| SpoolError::io(err.to_string()))
    }
}

#[async_trait]
impl UploadSpool for CapStdUploadSpool {
    async fn write(&self, name: &str, bytes: &[u8]) -> Result<SpooledFile, SpoolError> {
        let file = SpooledFile {
            name: format!("{}-{name}", Uuid::new_v4().simple()),
            len: bytes.len() as u64,
        };
        let target = file.name.clone();
        let bytes = bytes.to_vec();
        self.blocking(move |dir| dir.write(&target, bytes)).await?;
        Ok(file)
    }

    async fn read(&self, file: &SpooledFile) -> Result<Vec<u8>, SpoolError> {
        let target = file.name.clone();
        self.blocking(move |dir| dir.read(&target)).await
    }

    async fn remove(&self, file: &SpooledFile) -> Result<(), SpoolError> {
        let target = file.name.clone();
        self.blocking(move |dir| match dir.remove_file(&target) {
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn workdir() -> TempDir {
        tempfile::tempdir().expect("temp dir")
    }

    #[rstest]
    #[tokio::test]
    async fn writes_reads_and_removes_files(workdir: TempDir) {
        let spool = CapStdUploadSpool::open(&workdir.path().join("uploads")).expect("spool");
        let file = spool.write("abc.webp", b"RIFF....").await.expect("written");
        assert!(file.name.ends_with("-abc.webp"));
        assert_eq!(file.len, 8);
        assert_eq!(spool.read(&file).await.expect("read back"), b"RIFF....");

        spool.remove(&file).await.expect("removed");
        assert!(spool.read(&file).await.is_err());
        spool.remove(&file).await.expect("missing files are already gone");
    }

    #[rstest]
    #[tokio::test]
    async fn same_name_gets_distinct_files(workdir: TempDir) {
        let spool = CapStdUploadSpool::open(workdir.path()).expect("spool");
        let first = spool.write("same.webp", b"a").await.expect("written");
        let second = spool.write("same.webp", b"b").await.expect("written");
        assert_ne!(first.name, second.name);
        assert_eq!(spool.read(&first).await.expect("read"), b"a");
    }
}
