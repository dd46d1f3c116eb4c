//! Reader for the sequential `.wpress` container.

mod header;

pub use header::{CHUNK_SIZE, HEADER_SIZE, HeaderError, WpressHeader};

use std::io::{self, SeekFrom};
use std::path::Path;

use async_trait::async_trait;
use tokio::fs::{self, File};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tracing::debug;

use crate::error::{Error, Result};
use crate::events::{HandlerEvent, Reporter};
use crate::format::{ArchiveRef, BackupFormat};
use crate::handler::{BackupHandler, report_phase};
use crate::sanitize::resolve_entry;

pub struct WpressHandler;

impl WpressHandler {
    /// Check that the file ends with an all-zero header block.
    ///
    /// Only the final `HEADER_SIZE` bytes are inspected, so an archive with
    /// anything appended after its end-of-archive block is reported invalid.
    pub async fn is_valid(path: &Path) -> Result<bool> {
        let mut file = open(path).await?;
        let read_err = |e| Error::Read {
            path: path.to_path_buf(),
            source: e,
        };
        let len = file.metadata().await.map_err(read_err)?.len();
        if len < HEADER_SIZE as u64 {
            return Ok(false);
        }
        file.seek(SeekFrom::End(-(HEADER_SIZE as i64)))
            .await
            .map_err(read_err)?;
        let mut block = [0u8; HEADER_SIZE];
        file.read_exact(&mut block).await.map_err(read_err)?;
        Ok(WpressHeader::is_eof_block(&block))
    }
}

#[async_trait]
impl BackupHandler for WpressHandler {
    fn format(&self) -> BackupFormat {
        BackupFormat::Wpress
    }

    async fn list_files(&self, archive: &ArchiveRef) -> Result<Vec<String>> {
        let path = archive.path.as_path();
        let mut file = open(path).await?;
        let read_err = |e| Error::Read {
            path: path.to_path_buf(),
            source: e,
        };
        let len = file.metadata().await.map_err(read_err)?.len();
        let mut entries = Vec::new();

        while let Some(header) = read_header(&mut file, path).await? {
            let relative = header.relative_path();
            let end = file
                .seek(SeekFrom::Current(payload_offset(&header, path)?))
                .await
                .map_err(read_err)?;
            // Seeking past the end succeeds, so a short payload shows up only here.
            if end > len {
                return Err(Error::corrupted(
                    path,
                    format!("payload of '{relative}' ends early"),
                ));
            }
            entries.push(relative);
        }
        Ok(entries)
    }

    async fn extract_files(
        &self,
        archive: &ArchiveRef,
        dest: &Path,
        events: &Reporter<HandlerEvent>,
    ) -> Result<()> {
        report_phase(events, extract(&archive.path, dest)).await
    }
}

async fn open(path: &Path) -> Result<File> {
    if !fs::try_exists(path).await.unwrap_or(false) {
        return Err(Error::NotFound {
            path: path.to_path_buf(),
        });
    }
    File::open(path).await.map_err(|e| Error::Read {
        path: path.to_path_buf(),
        source: e,
    })
}

fn payload_offset(header: &WpressHeader, path: &Path) -> Result<i64> {
    i64::try_from(header.size)
        .map_err(|_| Error::corrupted(path, format!("entry '{}' is too large", header.name)))
}

/// Read the next header. `None` at the end-of-archive block.
async fn read_header(file: &mut File, path: &Path) -> Result<Option<WpressHeader>> {
    let mut block = [0u8; HEADER_SIZE];
    let mut filled = 0;
    while filled < HEADER_SIZE {
        let n = file
            .read(&mut block[filled..])
            .await
            .map_err(|e| Error::Read {
                path: path.to_path_buf(),
                source: e,
            })?;
        if n == 0 {
            break;
        }
        filled += n;
    }

    match filled {
        0 => {
            debug!(path = %path.display(), "wpress archive ends without end-of-archive block");
            Ok(None)
        }
        HEADER_SIZE => {
            WpressHeader::parse(&block).map_err(|e| Error::corrupted(path, e.to_string()))
        }
        short => Err(Error::corrupted(
            path,
            format!("truncated header ({short} of {HEADER_SIZE} bytes)"),
        )),
    }
}

async fn extract(path: &Path, dest: &Path) -> Result<()> {
    let mut file = open(path).await?;
    let mut chunk = [0u8; CHUNK_SIZE];

    while let Some(header) = read_header(&mut file, path).await? {
        let relative = header.relative_path();
        let target = resolve_entry(dest, &relative)?;
        wpbridge_fs::ensure_parent(&target).await?;

        let write_err = |e| Error::ExtractionFailed {
            path: target.clone(),
            source: e,
        };
        let mut out = File::create(&target).await.map_err(write_err)?;

        let mut remaining = header.size;
        while remaining > 0 {
            let want = remaining.min(CHUNK_SIZE as u64) as usize;
            file.read_exact(&mut chunk[..want])
                .await
                .map_err(|e| match e.kind() {
                    io::ErrorKind::UnexpectedEof => Error::corrupted(
                        path,
                        format!("payload of '{relative}' ends early"),
                    ),
                    _ => Error::Read {
                        path: path.to_path_buf(),
                        source: e,
                    },
                })?;
            out.write_all(&chunk[..want]).await.map_err(write_err)?;
            remaining -= want as u64;
        }
        out.flush().await.map_err(write_err)?;
        debug!(entry = %relative, bytes = header.size, "extracted wpress entry");
    }
    Ok(())
}
