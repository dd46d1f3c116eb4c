use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};
use wpbridge_archive::{ArchiveRef, BackupFormat, BackupHandler};
use wpbridge_fs::{ExtractionDir, Trash};
use wpbridge_platform::SiteRuntime;

use crate::config::ImportConfig;
use crate::content::ImporterResult;
use crate::error::{Error, Result};
use crate::events::{EventSink, ImportEvent, ValidatorEvent};
use crate::flavor::Flavor;
use crate::import::ImportContext;

/// What a backup holds, without extracting it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Inspection {
    pub format: BackupFormat,
    pub files: Vec<String>,
    pub flavor: Option<Flavor>,
}

/// Drives one backup from archive to imported site.
pub struct ImportManager {
    config: ImportConfig,
    trash: Arc<dyn Trash>,
}

impl ImportManager {
    pub fn new(config: ImportConfig, trash: Arc<dyn Trash>) -> Self {
        Self { config, trash }
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Extract `archive` into a fresh directory and import it into `runtime`'s site.
    ///
    /// The handler is chosen before any directory exists, so an unsupported
    /// archive fails without touching the disk. The extraction directory is
    /// removed on every path out of this call.
    pub async fn import_backup(
        &self,
        archive: &ArchiveRef,
        runtime: &dyn SiteRuntime,
        events: &EventSink,
    ) -> Result<ImporterResult> {
        let handler = wpbridge_archive::create(archive)?;
        let workspace =
            ExtractionDir::create(self.config.temp_dir.as_deref(), &self.config.extraction_prefix)?;
        info!(
            archive = %archive.path.display(),
            workspace = %workspace.path().display(),
            "starting import"
        );

        let result = self
            .run(handler.as_ref(), archive, workspace.path(), runtime, events)
            .await;

        let path = workspace.path().to_path_buf();
        if let Err(e) = workspace.remove().await {
            warn!(path = %path.display(), error = %e, "failed to remove extraction directory");
        }
        result
    }

    async fn run(
        &self,
        handler: &dyn BackupHandler,
        archive: &ArchiveRef,
        workspace: &Path,
        runtime: &dyn SiteRuntime,
        events: &EventSink,
    ) -> Result<ImporterResult> {
        // Listing belongs to validation, so a listing failure is a validation error.
        let validation = events.map(ImportEvent::Validator);
        validation.emit(ValidatorEvent::Start);
        let (flavor, files) = match recognize(handler, archive).await {
            Ok(found) => found,
            Err(err) => {
                validation.emit(ValidatorEvent::Error {
                    error: err.to_string(),
                });
                return Err(err);
            }
        };
        let contents = flavor.validator().parse_backup_contents(&files, workspace);
        validation.emit(ValidatorEvent::Complete);
        info!(%flavor, entries = files.len(), "recognized backup");

        handler
            .extract_files(archive, workspace, &events.map(ImportEvent::Handler))
            .await?;

        let ctx = ImportContext {
            runtime,
            trash: self.trash.as_ref(),
            config: &self.config,
            events: events.map(ImportEvent::Importer),
        };
        flavor.importer().import(&ctx, contents).await
    }

    /// List `archive` and name the flavor that would import it.
    pub async fn inspect(&self, archive: &ArchiveRef) -> Result<Inspection> {
        let handler = wpbridge_archive::create(archive)?;
        let files = handler.list_files(archive).await?;
        let flavor = Flavor::detect(&files);
        Ok(Inspection {
            format: handler.format(),
            files,
            flavor,
        })
    }
}

async fn recognize(
    handler: &dyn BackupHandler,
    archive: &ArchiveRef,
) -> Result<(Flavor, Vec<String>)> {
    let files = handler.list_files(archive).await?;
    let flavor = Flavor::detect(&files).ok_or(Error::NoSuitableImporter)?;
    Ok((flavor, files))
}
