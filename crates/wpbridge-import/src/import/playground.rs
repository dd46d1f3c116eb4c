use async_trait::async_trait;
use tracing::{info, warn};
use wpbridge_fs::move_path;

use super::{ImportContext, Importer, rewrite_site_url};
use crate::content::{BackupContents, MetaFileData};
use crate::error::Result;
use crate::flavor::Flavor;

/// Playground ships a ready SQLite database; it replaces the placeholder instead of being imported.
pub struct PlaygroundImporter;

#[async_trait]
impl Importer for PlaygroundImporter {
    fn flavor(&self) -> Flavor {
        Flavor::Playground
    }

    async fn import_database(
        &self,
        ctx: &ImportContext<'_>,
        contents: &BackupContents,
        _meta: Option<&MetaFileData>,
    ) -> Result<()> {
        let target = ctx.site().database_file();
        match contents.sql_files.first() {
            Some(database) => {
                move_path(database, &target).await?;
                info!(database = %target.display(), "installed playground database");
            }
            None => warn!("playground backup has no database file"),
        }
        rewrite_site_url(ctx).await
    }
}
