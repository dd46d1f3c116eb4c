use std::path::Path;

use super::{BackupValidator, DumpLayout};
use crate::content::BackupContents;

const LAYOUT: DumpLayout = DumpLayout {
    sql_dir: "sql/",
    wp_content_dir: "wp-content",
    meta_file: "studio.json",
};

/// Jetpack backups: `sql/*.sql` beside `wp-content/`. The bundled `wp-config.php` is ignored.
pub struct JetpackValidator;

impl BackupValidator for JetpackValidator {
    fn can_handle(&self, files: &[String]) -> bool {
        LAYOUT.can_handle(files)
    }

    fn parse_backup_contents(&self, files: &[String], extraction_dir: &Path) -> BackupContents {
        LAYOUT.parse(files, extraction_dir)
    }
}
