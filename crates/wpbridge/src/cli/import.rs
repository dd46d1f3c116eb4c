use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use wpbridge_archive::ArchiveRef;
use wpbridge_fs::DirectoryTrash;
use wpbridge_import::{ImportManager, ImporterResult};
use wpbridge_platform::WpCliRuntime;

use crate::config::Config;
use crate::progress::ImportProgress;

#[derive(Clone, Debug, clap::Args)]
pub struct ImportArg {
    /// Backup file: .zip, .tar.gz, .sql or .wpress
    pub archive: PathBuf,

    /// Root directory of the target site
    #[arg(short, long)]
    pub site: PathBuf,

    /// Port the local site is served on
    #[arg(short, long, default_value_t = 8881)]
    pub port: u16,

    /// Media type of the archive; guessed from the extension when omitted
    #[arg(short, long)]
    pub media_type: Option<String>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

impl ImportArg {
    pub async fn run(self, config: Config) -> anyhow::Result<()> {
        let archive = archive_ref(self.archive, self.media_type);
        let runtime = WpCliRuntime::new(&self.site, self.port, config.wp_cli.clone());
        let trash = Arc::new(DirectoryTrash::new(config.trash_dir()));
        let manager = ImportManager::new(config.import, trash);

        let progress = ImportProgress::new();
        let result = manager
            .import_backup(&archive, &runtime, &progress.sink())
            .await;
        progress.finish(result.is_ok());

        let result = result.with_context(|| {
            format!(
                "failed to import {} into {}",
                archive.path.display(),
                self.site.display()
            )
        })?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            print_summary(&result);
        }
        Ok(())
    }
}

pub(crate) fn archive_ref(path: PathBuf, media_type: Option<String>) -> ArchiveRef {
    match media_type {
        Some(media_type) => ArchiveRef::new(path, media_type),
        None => ArchiveRef::guess(path),
    }
}

fn print_summary(result: &ImporterResult) {
    println!("Imported backup");
    println!("  database files: {}", result.sql_files.len());
    println!("  uploads:        {}", result.wp_content.uploads.len());
    println!("  plugins:        {}", result.wp_content.plugins.len());
    println!("  themes:         {}", result.wp_content.themes.len());
    if result.wp_config.is_some() {
        println!("  wp-config.php:  replaced");
    }
    if let Some(meta) = &result.meta {
        if let Some(php) = &meta.php_version {
            println!("  php version:    {php}");
        }
        if let Some(wp) = &meta.wordpress_version {
            println!("  wordpress:      {wp}");
        }
        if let Some(theme) = meta.stylesheet.as_ref().or(meta.template.as_ref()) {
            println!("  theme:          {theme}");
        }
        if !meta.plugins.is_empty() {
            println!("  active plugins: {}", meta.plugins.join(", "));
        }
    }
}
