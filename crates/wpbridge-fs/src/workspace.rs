use std::io;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Scratch directory owned by one import attempt.
///
/// The directory is removed by [`ExtractionDir::remove`] or, failing that,
/// when the value is dropped.
#[derive(Debug)]
pub struct ExtractionDir {
    inner: tempfile::TempDir,
}

impl ExtractionDir {
    /// Create a fresh, uniquely named directory under `parent` (the OS temp dir when `None`).
    pub fn create(parent: Option<&Path>, prefix: &str) -> Result<Self> {
        let parent = parent.map(Path::to_path_buf).unwrap_or_else(std::env::temp_dir);
        std::fs::create_dir_all(&parent).map_err(|e| Error::CreateDir {
            path: parent.clone(),
            source: e,
        })?;

        let inner = tempfile::Builder::new()
            .prefix(prefix)
            .tempdir_in(&parent)
            .map_err(|e| Error::CreateDir {
                path: parent,
                source: e,
            })?;

        Ok(Self { inner })
    }

    pub fn path(&self) -> &Path {
        self.inner.path()
    }

    /// Delete the directory and everything extracted into it.
    pub async fn remove(self) -> Result<()> {
        let path: PathBuf = self.inner.path().to_path_buf();
        let inner = self.inner;
        tokio::task::spawn_blocking(move || inner.close())
            .await
            .map_err(io::Error::other)
            .and_then(|r| r)
            .map_err(|e| Error::Remove { path, source: e })
    }
}
