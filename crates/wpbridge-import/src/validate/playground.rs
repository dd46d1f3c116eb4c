use std::path::Path;

use super::{BackupValidator, add_content, has_any_bucket, sort_sql_files};
use crate::content::BackupContents;

const DATABASE_DIR: &str = "wp-content/database/";
const DATABASE_EXT: &str = ".ht.sqlite";

/// WordPress Playground exports: a SQLite database file instead of a dump.
///
/// Exports name it `.ht.sqlite`; a named `<site>.ht.sqlite` is accepted too.
pub struct PlaygroundValidator;

fn is_database(file: &str) -> bool {
    file.strip_prefix(DATABASE_DIR)
        .is_some_and(|name| !name.contains('/') && name.ends_with(DATABASE_EXT))
}

impl BackupValidator for PlaygroundValidator {
    fn can_handle(&self, files: &[String]) -> bool {
        files
            .iter()
            .any(|f| is_database(f))
            && has_any_bucket(files, "wp-content/")
    }

    fn parse_backup_contents(&self, files: &[String], extraction_dir: &Path) -> BackupContents {
        let mut contents = BackupContents {
            extraction_directory: extraction_dir.to_path_buf(),
            wp_content_directory: "wp-content".to_owned(),
            ..Default::default()
        };

        for file in files {
            let path = extraction_dir.join(file);
            if file == "wp-config.php" {
                contents.wp_config = Some(path);
            } else if is_database(file) {
                contents.sql_files.push(path);
            } else if let Some(rel) = file.strip_prefix("wp-content/") {
                add_content(&mut contents.wp_content, rel, path);
            }
        }

        sort_sql_files(&mut contents.sql_files);
        contents
    }
}
