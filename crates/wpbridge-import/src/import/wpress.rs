use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use super::{ImportContext, Importer, import_sql_files, rewrite_site_url};
use crate::content::{BackupContents, MetaFileData};
use crate::error::{Error, Result};
use crate::flavor::Flavor;
use crate::meta::MetaFormat;
use crate::sql_rewrite::{plugins_sql, rewrite_table_prefix, theme_sql};

/// Wpress dumps carry a placeholder table prefix, and the active theme and
/// plugins live in `package.json` rather than the dump.
pub struct WpressImporter;

#[async_trait]
impl Importer for WpressImporter {
    fn flavor(&self) -> Flavor {
        Flavor::Wpress
    }

    fn meta_format(&self) -> Option<MetaFormat> {
        Some(MetaFormat::WpressPackage)
    }

    async fn import_database(
        &self,
        ctx: &ImportContext<'_>,
        contents: &BackupContents,
        meta: Option<&MetaFileData>,
    ) -> Result<()> {
        let mut files = contents.sql_files.clone();
        if let Some(meta) = meta {
            files.extend(write_options_sql(ctx, &contents.extraction_directory, meta).await?);
        }
        import_sql_files(self, ctx, &files).await?;
        rewrite_site_url(ctx).await
    }

    async fn prepare_sql_file(&self, ctx: &ImportContext<'_>, staged: &Path) -> Result<()> {
        rewrite_table_prefix(staged, &ctx.config.table_prefix).await
    }
}

/// Write the theme and plugin activation statements next to the extracted dump.
async fn write_options_sql(
    ctx: &ImportContext<'_>,
    dir: &Path,
    meta: &MetaFileData,
) -> Result<Vec<PathBuf>> {
    let prefix = &ctx.config.table_prefix;
    let generated = [
        (
            "wpbridge-theme.sql",
            theme_sql(prefix, meta.template.as_deref(), meta.stylesheet.as_deref()),
        ),
        ("wpbridge-plugins.sql", plugins_sql(prefix, &meta.plugins)),
    ];

    let mut files = Vec::new();
    for (name, sql) in generated {
        let Some(sql) = sql else { continue };
        let path = dir.join(name);
        tokio::fs::write(&path, sql)
            .await
            .map_err(|e| Error::io(&path, e))?;
        debug!(path = %path.display(), "generated options SQL");
        files.push(path);
    }
    Ok(files)
}
