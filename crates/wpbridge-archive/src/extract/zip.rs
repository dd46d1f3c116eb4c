use std::path::Path;

use async_trait::async_trait;
use tracing::debug;
use zip::ZipArchive;

use super::{create_dir, open_archive, write_entry};
use crate::error::{Error, Result};
use crate::events::{HandlerEvent, Reporter};
use crate::format::{ArchiveRef, BackupFormat};
use crate::handler::{BackupHandler, blocking, report_phase};
use crate::sanitize::{is_hidden_entry, normalize_entry_name, resolve_entry, visible_entries};

/// Zip backups, read through the central directory.
///
/// Extraction has no byte-level progress: consumers see only start and completion.
pub struct ZipHandler;

#[async_trait]
impl BackupHandler for ZipHandler {
    fn format(&self) -> BackupFormat {
        BackupFormat::Zip
    }

    async fn list_files(&self, archive: &ArchiveRef) -> Result<Vec<String>> {
        let path = archive.path.clone();
        blocking(&archive.path, move || list(&path)).await
    }

    async fn extract_files(
        &self,
        archive: &ArchiveRef,
        dest: &Path,
        events: &Reporter<HandlerEvent>,
    ) -> Result<()> {
        let path = archive.path.clone();
        let dest = dest.to_path_buf();
        report_phase(events, blocking(&archive.path, move || extract(&path, &dest))).await
    }
}

fn open(path: &Path) -> Result<ZipArchive<std::io::BufReader<std::fs::File>>> {
    ZipArchive::new(open_archive(path)?).map_err(|e| Error::corrupted(path, e.to_string()))
}

fn list(path: &Path) -> Result<Vec<String>> {
    let mut archive = open(path)?;
    let mut names = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let file = archive
            .by_index_raw(i)
            .map_err(|e| Error::corrupted(path, e.to_string()))?;
        names.push(file.name().to_owned());
    }
    Ok(visible_entries(names))
}

fn extract(path: &Path, dest: &Path) -> Result<()> {
    let mut archive = open(path)?;
    for i in 0..archive.len() {
        let mut file = archive
            .by_index(i)
            .map_err(|e| Error::corrupted(path, e.to_string()))?;
        let name = normalize_entry_name(file.name());
        if name.is_empty() || is_hidden_entry(&name) {
            continue;
        }

        let target = resolve_entry(dest, &name)?;
        if file.is_dir() {
            create_dir(&target)?;
        } else {
            let written = write_entry(&mut file, &target)?;
            debug!(entry = %name, bytes = written, "extracted zip entry");
        }
    }
    Ok(())
}
