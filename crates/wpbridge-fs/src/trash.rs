//! Recoverable removal of site state.
//!
//! Importers never hard-delete what a site already holds. Everything they
//! clear goes through a [`Trash`] so a user can get it back.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use crate::{Error, Result, primitives};

/// Destination for files and directories that must not be permanently deleted.
#[async_trait]
pub trait Trash: Send + Sync {
    /// Move `path` out of the way. A missing `path` is not an error.
    async fn trash(&self, path: &Path) -> Result<()>;
}

/// Trash backed by a plain directory.
///
/// Each trashed item lands at `<root>/<unix-millis>-<file name>`, with a
/// numeric suffix when two items collide within the same millisecond.
#[derive(Clone, Debug)]
pub struct DirectoryTrash {
    root: PathBuf,
}

impl DirectoryTrash {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `<home>/.wpbridge/trash`, or a directory under the OS temp dir when no home is known.
    pub fn default_root() -> PathBuf {
        home::home_dir()
            .map(|h| h.join(".wpbridge").join("trash"))
            .unwrap_or_else(|| std::env::temp_dir().join("wpbridge-trash"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn free_slot(&self, name: &str) -> PathBuf {
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let base = format!("{stamp}-{name}");
        let mut candidate = self.root.join(&base);
        let mut n = 1u32;
        while fs::try_exists(&candidate).await.unwrap_or(false) {
            candidate = self.root.join(format!("{base}.{n}"));
            n += 1;
        }
        candidate
    }
}

impl Default for DirectoryTrash {
    fn default() -> Self {
        Self::new(Self::default_root())
    }
}

#[async_trait]
impl Trash for DirectoryTrash {
    async fn trash(&self, path: &Path) -> Result<()> {
        if !fs::try_exists(path).await.unwrap_or(false) {
            return Ok(());
        }

        fs::create_dir_all(&self.root)
            .await
            .map_err(|e| Error::CreateDir {
                path: self.root.clone(),
                source: e,
            })?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "item".to_owned());
        let target = self.free_slot(&name).await;

        debug!(from = %path.display(), to = %target.display(), "moving to trash");
        primitives::move_path(path, &target)
            .await
            .map_err(|e| match e {
                Error::Move { source, .. } => Error::Trash {
                    path: path.to_path_buf(),
                    source,
                },
                other => other,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_trashed_file_is_recoverable() {
        let dir = tempdir().unwrap();
        let trash = DirectoryTrash::new(dir.path().join("trash"));
        let victim = dir.path().join("site.ht.sqlite");
        std::fs::write(&victim, "db").unwrap();

        trash.trash(&victim).await.unwrap();

        assert!(!victim.exists());
        let kept: Vec<_> = std::fs::read_dir(trash.root()).unwrap().collect();
        assert_eq!(kept.len(), 1);
        let kept = kept[0].as_ref().unwrap().path();
        assert!(kept.to_string_lossy().ends_with("-site.ht.sqlite"));
        assert_eq!(std::fs::read_to_string(kept).unwrap(), "db");
    }

    #[tokio::test]
    async fn test_same_name_twice_does_not_collide() {
        let dir = tempdir().unwrap();
        let trash = DirectoryTrash::new(dir.path().join("trash"));
        for _ in 0..2 {
            let victim = dir.path().join("plugins");
            std::fs::create_dir_all(victim.join("akismet")).unwrap();
            trash.trash(&victim).await.unwrap();
        }
        assert_eq!(std::fs::read_dir(trash.root()).unwrap().count(), 2);
    }

    #[tokio::test]
    async fn test_missing_path_is_ignored() {
        let dir = tempdir().unwrap();
        let trash = DirectoryTrash::new(dir.path().join("trash"));
        trash.trash(&dir.path().join("absent")).await.unwrap();
        assert!(!trash.root().exists());
    }
}
