use std::path::Path;

use async_trait::async_trait;
use tokio::fs;

use crate::error::{Error, Result};
use crate::events::{HandlerEvent, Reporter};
use crate::format::{ArchiveRef, BackupFormat};
use crate::handler::{BackupHandler, report_phase};

/// A bare SQL dump: the "archive" is a single entry named after the file.
pub struct SqlHandler;

fn entry_name(archive: &ArchiveRef) -> Result<String> {
    archive
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| Error::NotFound {
            path: archive.path.clone(),
        })
}

async fn ensure_exists(path: &Path) -> Result<()> {
    match fs::try_exists(path).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(Error::NotFound {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(Error::Read {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

#[async_trait]
impl BackupHandler for SqlHandler {
    fn format(&self) -> BackupFormat {
        BackupFormat::Sql
    }

    async fn list_files(&self, archive: &ArchiveRef) -> Result<Vec<String>> {
        ensure_exists(&archive.path).await?;
        Ok(vec![entry_name(archive)?])
    }

    async fn extract_files(
        &self,
        archive: &ArchiveRef,
        dest: &Path,
        events: &Reporter<HandlerEvent>,
    ) -> Result<()> {
        report_phase(events, async {
            ensure_exists(&archive.path).await?;
            let target = dest.join(entry_name(archive)?);
            wpbridge_fs::copy_file(&archive.path, &target).await?;
            Ok(())
        })
        .await
    }
}
