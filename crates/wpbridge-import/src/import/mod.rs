//! Per-flavor import of extracted backup content into a site.
//!
//! [`Importer`]'s provided methods are the shared flow. Flavors override
//! only the steps where they differ.

use std::path::Path;

use async_trait::async_trait;
use wpbridge_archive::Reporter;
use wpbridge_fs::Trash;
use wpbridge_platform::SiteRuntime;

use crate::config::ImportConfig;
use crate::content::{BackupContents, ImporterResult, MetaFileData};
use crate::error::Result;
use crate::events::ImporterEvent;
use crate::flavor::Flavor;
use crate::meta::MetaFormat;

mod base;
mod playground;
mod sql;
mod standard;
mod wpress;

pub use base::{SiteLayout, import_sql_files, rewrite_site_url, staged_sql_name};
pub use playground::PlaygroundImporter;
pub use sql::SqlImporter;
pub use standard::{JetpackImporter, LocalImporter};
pub use wpress::WpressImporter;

/// Everything an importer needs from outside the backup.
pub struct ImportContext<'a> {
    pub runtime: &'a dyn SiteRuntime,
    pub trash: &'a dyn Trash,
    pub config: &'a ImportConfig,
    pub events: Reporter<ImporterEvent>,
}

impl ImportContext<'_> {
    pub fn site(&self) -> SiteLayout {
        SiteLayout::new(self.runtime.site_path())
    }
}

#[async_trait]
pub trait Importer: Send + Sync {
    fn flavor(&self) -> Flavor;

    /// Shape of this flavor's meta file, if it ships one.
    fn meta_format(&self) -> Option<MetaFormat> {
        None
    }

    /// Replace the site's content and database with the backup's.
    ///
    /// Emits `Start`, the per-phase pairs, then exactly one of `Complete` or `Error`.
    async fn import(
        &self,
        ctx: &ImportContext<'_>,
        contents: BackupContents,
    ) -> Result<ImporterResult> {
        let meta = base::report(ctx, base::run(self, ctx, &contents)).await?;
        Ok(ImporterResult::new(contents, meta))
    }

    /// Import every SQL file in order, then point the site at its local URL.
    async fn import_database(
        &self,
        ctx: &ImportContext<'_>,
        contents: &BackupContents,
        _meta: Option<&MetaFileData>,
    ) -> Result<()> {
        import_sql_files(self, ctx, &contents.sql_files).await?;
        rewrite_site_url(ctx).await
    }

    /// Adjust a staged copy of an SQL file before it is imported.
    async fn prepare_sql_file(&self, _ctx: &ImportContext<'_>, _staged: &Path) -> Result<()> {
        Ok(())
    }
}
