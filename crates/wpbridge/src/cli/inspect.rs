use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use wpbridge_fs::DirectoryTrash;
use wpbridge_import::ImportManager;

use super::import::archive_ref;
use crate::config::Config;

#[derive(Clone, Debug, clap::Args)]
pub struct InspectArg {
    /// Backup file to list
    pub archive: PathBuf,

    /// Media type of the archive; guessed from the extension when omitted
    #[arg(short, long)]
    pub media_type: Option<String>,
}

impl InspectArg {
    pub async fn run(self, config: Config) -> anyhow::Result<()> {
        let archive = archive_ref(self.archive, self.media_type);
        let manager = ImportManager::new(
            config.import.clone(),
            Arc::new(DirectoryTrash::new(config.trash_dir())),
        );

        let inspection = manager
            .inspect(&archive)
            .await
            .with_context(|| format!("failed to read {}", archive.path.display()))?;

        for file in &inspection.files {
            println!("{file}");
        }
        println!();
        println!("format: {}", inspection.format);
        match inspection.flavor {
            Some(flavor) => println!("flavor: {flavor}"),
            None => println!("flavor: not recognized"),
        }
        Ok(())
    }
}
