use std::path::Path;

use super::{BackupValidator, DumpLayout};
use crate::content::BackupContents;

const LAYOUT: DumpLayout = DumpLayout {
    sql_dir: "app/sql/",
    wp_content_dir: "app/public/wp-content",
    meta_file: "local-site.json",
};

/// Local (Flywheel) exports, rooted under `app/`.
pub struct LocalValidator;

impl BackupValidator for LocalValidator {
    fn can_handle(&self, files: &[String]) -> bool {
        LAYOUT.can_handle(files)
    }

    fn parse_backup_contents(&self, files: &[String], extraction_dir: &Path) -> BackupContents {
        LAYOUT.parse(files, extraction_dir)
    }
}
