use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Knobs for one import. Every field has a default, so a partial TOML table is enough.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Parent of extraction directories. `None` means the OS temp dir.
    pub temp_dir: Option<PathBuf>,
    pub extraction_prefix: String,
    /// PHP version the database import runs under, independent of the site's own.
    pub db_import_php_version: String,
    /// wp-cli package providing `sqlite import`.
    pub sqlite_command: PathBuf,
    /// Replaces `SERVMASK_PREFIX` in wpress dumps.
    pub table_prefix: String,
    pub site_host: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            temp_dir: None,
            extraction_prefix: "wpbridge_backup".to_owned(),
            db_import_php_version: "8.3".to_owned(),
            sqlite_command: PathBuf::from("/tmp/sqlite-command/command.php"),
            table_prefix: "wp".to_owned(),
            site_host: "localhost".to_owned(),
        }
    }
}

impl ImportConfig {
    /// URL the imported site is served from.
    pub fn site_url(&self, port: u16) -> String {
        format!("http://{}:{port}", self.site_host)
    }
}
