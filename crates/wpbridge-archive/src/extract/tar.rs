use std::io::{self, Read};
use std::path::Path;

use async_trait::async_trait;
use flate2::read::GzDecoder;
use tracing::debug;

use super::{create_dir, open_archive, write_entry};
use crate::error::{Error, Result};
use crate::events::{HandlerEvent, Reporter};
use crate::format::{ArchiveRef, BackupFormat};
use crate::handler::{BackupHandler, blocking, report_phase};
use crate::sanitize::{is_hidden_entry, normalize_entry_name, resolve_entry, visible_entries};

/// Gzip-compressed tarballs, streamed in a single pass.
pub struct TarGzHandler;

#[async_trait]
impl BackupHandler for TarGzHandler {
    fn format(&self) -> BackupFormat {
        BackupFormat::TarGz
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
        let progress = events.clone();
        report_phase(
            events,
            blocking(&archive.path, move || extract(&path, &dest, progress)),
        )
        .await
    }
}

/// Reports `bytes read / total size` of the compressed file on every chunk.
struct ProgressReader<R> {
    inner: R,
    read: u64,
    total: u64,
    events: Reporter<HandlerEvent>,
}

impl<R: Read> Read for ProgressReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        if n > 0 && self.total > 0 {
            self.read += n as u64;
            let progress = (self.read as f64 / self.total as f64).min(1.0);
            self.events.emit(HandlerEvent::Progress { progress });
        }
        Ok(n)
    }
}

fn list(path: &Path) -> Result<Vec<String>> {
    let mut archive = tar::Archive::new(GzDecoder::new(open_archive(path)?));
    let corrupted = |e: io::Error| Error::corrupted(path, e.to_string());

    let mut names = Vec::new();
    for entry in archive.entries().map_err(corrupted)? {
        let entry = entry.map_err(corrupted)?;
        let kind = entry.header().entry_type();
        let name = entry.path().map_err(corrupted)?.to_string_lossy().into_owned();
        // Links and special files are never extracted, so they are not listed either.
        if !kind.is_dir() && !kind.is_file() {
            debug!(entry = %name, ?kind, "not listing non-regular tar entry");
            continue;
        }
        names.push(name);
    }
    Ok(visible_entries(names))
}

fn extract(path: &Path, dest: &Path, events: Reporter<HandlerEvent>) -> Result<()> {
    let total = std::fs::metadata(path)
        .map_err(|e| Error::Read {
            path: path.to_path_buf(),
            source: e,
        })?
        .len();
    let reader = ProgressReader {
        inner: open_archive(path)?,
        read: 0,
        total,
        events,
    };
    let mut archive = tar::Archive::new(GzDecoder::new(reader));
    let corrupted = |e: io::Error| Error::corrupted(path, e.to_string());

    for entry in archive.entries().map_err(corrupted)? {
        let mut entry = entry.map_err(corrupted)?;
        let raw = entry.path().map_err(corrupted)?.to_string_lossy().into_owned();
        let name = normalize_entry_name(&raw);
        if name.is_empty() || is_hidden_entry(&name) {
            continue;
        }

        let target = resolve_entry(dest, &name)?;
        let kind = entry.header().entry_type();
        if kind.is_dir() {
            create_dir(&target)?;
        } else if kind.is_file() {
            write_entry(&mut entry, &target)?;
        } else {
            debug!(entry = %name, ?kind, "skipping non-regular tar entry");
        }
    }
    Ok(())
}
