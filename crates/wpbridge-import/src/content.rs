use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::Serialize;

/// Absolute paths of extracted `wp-content` files, bucketed by kind.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct WpContent {
    pub uploads: BTreeSet<PathBuf>,
    pub plugins: BTreeSet<PathBuf>,
    pub themes: BTreeSet<PathBuf>,
}

impl WpContent {
    pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        self.uploads
            .iter()
            .chain(self.plugins.iter())
            .chain(self.themes.iter())
    }

    pub fn len(&self) -> usize {
        self.uploads.len() + self.plugins.len() + self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Canonical view of one backup, produced by a validator from the entry listing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BackupContents {
    pub extraction_directory: PathBuf,
    /// Sorted ascending by file name.
    pub sql_files: Vec<PathBuf>,
    pub wp_config: Option<PathBuf>,
    pub wp_content: WpContent,
    /// Directory, relative to the extraction directory, that bucket paths are rooted at.
    pub wp_content_directory: String,
    pub meta_file: Option<PathBuf>,
}

/// Sidecar description of the exported site.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MetaFileData {
    pub php_version: Option<String>,
    pub wordpress_version: Option<String>,
    pub template: Option<String>,
    pub stylesheet: Option<String>,
    pub plugins: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ImporterResult {
    pub extraction_directory: PathBuf,
    pub sql_files: Vec<PathBuf>,
    pub wp_config: Option<PathBuf>,
    pub wp_content: WpContent,
    pub wp_content_directory: String,
    pub meta: Option<MetaFileData>,
}

impl ImporterResult {
    pub fn new(contents: BackupContents, meta: Option<MetaFileData>) -> Self {
        Self {
            extraction_directory: contents.extraction_directory,
            sql_files: contents.sql_files,
            wp_config: contents.wp_config,
            wp_content: contents.wp_content,
            wp_content_directory: contents.wp_content_directory,
            meta,
        }
    }
}
