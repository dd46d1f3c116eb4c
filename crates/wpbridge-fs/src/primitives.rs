use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;

use crate::{Error, Result};

/// Create the parent directory of `path` if it is missing.
pub async fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| Error::CreateDir {
                path: parent.to_path_buf(),
                source: e,
            })?;
    }
    Ok(())
}

/// Copy a regular file, creating the destination's parent directories.
pub async fn copy_file(src: &Path, dest: &Path) -> Result<u64> {
    ensure_parent(dest).await?;
    fs::copy(src, dest).await.map_err(|e| Error::Write {
        path: dest.to_path_buf(),
        source: e,
    })
}

/// Move a file or directory, overwriting an existing destination file.
///
/// Falls back to copy + remove when `src` and `dest` live on different devices.
pub async fn move_path(src: &Path, dest: &Path) -> Result<()> {
    ensure_parent(dest).await?;

    #[cfg(windows)]
    if fs::metadata(dest).await.is_ok_and(|m| m.is_file()) {
        fs::remove_file(dest).await.map_err(|e| Error::Remove {
            path: dest.to_path_buf(),
            source: e,
        })?;
    }

    match fs::rename(src, dest).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => copy_then_remove(src, dest).await,
        Err(e) => Err(Error::Move {
            from: src.to_path_buf(),
            to: dest.to_path_buf(),
            source: e,
        }),
    }
}

async fn copy_then_remove(src: &Path, dest: &Path) -> Result<()> {
    let move_err = |source: io::Error| Error::Move {
        from: src.to_path_buf(),
        to: dest.to_path_buf(),
        source,
    };

    let meta = fs::metadata(src).await.map_err(move_err)?;
    if meta.is_dir() {
        let (from, to) = (src.to_path_buf(), dest.to_path_buf());
        tokio::task::spawn_blocking(move || copy_dir_all(&from, &to))
            .await
            .map_err(|e| move_err(io::Error::other(e)))??;
        fs::remove_dir_all(src).await.map_err(move_err)
    } else {
        fs::copy(src, dest).await.map_err(move_err)?;
        fs::remove_file(src).await.map_err(move_err)
    }
}

/// Recursively copy a directory tree. Symlinks are copied as the files they point to.
pub fn copy_dir_all(src: &Path, dest: &Path) -> Result<()> {
    std::fs::create_dir_all(dest).map_err(|e| Error::CreateDir {
        path: dest.to_path_buf(),
        source: e,
    })?;

    let read_err = |path: PathBuf| move |e: io::Error| Error::Read { path, source: e };

    for entry in std::fs::read_dir(src).map_err(read_err(src.to_path_buf()))? {
        let entry = entry.map_err(read_err(src.to_path_buf()))?;
        let src_path = entry.path();
        let dest_path = dest.join(entry.file_name());
        let file_type = entry.file_type().map_err(read_err(src_path.clone()))?;

        if file_type.is_dir() {
            copy_dir_all(&src_path, &dest_path)?;
        } else {
            std::fs::copy(&src_path, &dest_path).map_err(|e| Error::Write {
                path: dest_path,
                source: e,
            })?;
        }
    }
    Ok(())
}

/// Remove a file, treating "already gone" as success.
pub async fn remove_file_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::Remove {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}
