use std::path::Path;

use super::BackupValidator;
use crate::content::BackupContents;

/// A bare SQL dump with no wrapper.
pub struct SqlValidator;

impl BackupValidator for SqlValidator {
    fn can_handle(&self, files: &[String]) -> bool {
        matches!(files, [only] if only.to_ascii_lowercase().ends_with(".sql"))
    }

    fn parse_backup_contents(&self, files: &[String], extraction_dir: &Path) -> BackupContents {
        BackupContents {
            extraction_directory: extraction_dir.to_path_buf(),
            sql_files: files.iter().map(|f| extraction_dir.join(f)).collect(),
            ..Default::default()
        }
    }
}
