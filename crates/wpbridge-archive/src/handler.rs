use std::future::Future;
use std::path::Path;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{Error, Result};
use crate::events::{HandlerEvent, Reporter};
use crate::extract::{SqlHandler, TarGzHandler, ZipHandler};
use crate::format::{ArchiveRef, BackupFormat};
use crate::wpress::WpressHandler;

/// Knows how to enumerate and unpack one container format.
#[async_trait]
pub trait BackupHandler: Send + Sync {
    fn format(&self) -> BackupFormat;

    /// Relative paths of the archive's entries, in archive order, without extracting.
    async fn list_files(&self, archive: &ArchiveRef) -> Result<Vec<String>>;

    /// Unpack every entry beneath `dest`.
    ///
    /// Emits `Start`, then exactly one of `Complete` or `Error`.
    async fn extract_files(
        &self,
        archive: &ArchiveRef,
        dest: &Path,
        events: &Reporter<HandlerEvent>,
    ) -> Result<()>;
}

/// Pick the handler for `archive` from its media type and file extension.
///
/// Fails immediately, naming the supported formats, when nothing matches.
pub fn create(archive: &ArchiveRef) -> Result<Box<dyn BackupHandler>> {
    let format = BackupFormat::detect(archive).ok_or_else(|| Error::UnsupportedFormat {
        path: archive.path.clone(),
        media_type: archive.media_type.clone(),
        supported: BackupFormat::supported_list(),
    })?;
    debug!(path = %archive.path.display(), %format, "selected backup handler");
    Ok(handler_for(format))
}

pub fn handler_for(format: BackupFormat) -> Box<dyn BackupHandler> {
    match format {
        BackupFormat::Zip => Box::new(ZipHandler),
        BackupFormat::TarGz => Box::new(TarGzHandler),
        BackupFormat::Sql => Box::new(SqlHandler),
        BackupFormat::Wpress => Box::new(WpressHandler),
    }
}

/// Wrap one extraction in its start/terminal event pair.
pub(crate) async fn report_phase<F>(events: &Reporter<HandlerEvent>, work: F) -> Result<()>
where
    F: Future<Output = Result<()>>,
{
    events.emit(HandlerEvent::Start);
    match work.await {
        Ok(()) => {
            events.emit(HandlerEvent::Complete);
            Ok(())
        }
        Err(e) => {
            events.emit(HandlerEvent::Error {
                error: e.to_string(),
            });
            Err(e)
        }
    }
}

/// Run blocking archive work off the async runtime.
pub(crate) async fn blocking<T, F>(path: &Path, work: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| Error::Read {
            path: path.to_path_buf(),
            source: std::io::Error::other(e),
        })?
}
