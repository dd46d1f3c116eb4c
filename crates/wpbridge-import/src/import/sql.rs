use async_trait::async_trait;

use super::{ImportContext, Importer, base};
use crate::content::{BackupContents, ImporterResult};
use crate::error::Result;
use crate::events::ImporterEvent;
use crate::flavor::Flavor;

/// A bare dump: only the database step runs. Site files are left alone.
pub struct SqlImporter;

#[async_trait]
impl Importer for SqlImporter {
    fn flavor(&self) -> Flavor {
        Flavor::Sql
    }

    async fn import(
        &self,
        ctx: &ImportContext<'_>,
        contents: BackupContents,
    ) -> Result<ImporterResult> {
        base::report(ctx, async {
            ctx.events.emit(ImporterEvent::DatabaseStart);
            self.import_database(ctx, &contents, None).await?;
            ctx.events.emit(ImporterEvent::DatabaseComplete);
            Ok(())
        })
        .await?;
        Ok(ImporterResult::new(contents, None))
    }
}
