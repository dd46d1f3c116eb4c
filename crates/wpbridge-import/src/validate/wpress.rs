use std::path::Path;

use super::{BackupValidator, add_content, has_any_bucket, sort_sql_files};
use crate::content::BackupContents;

/// All-in-One WP Migration archives, unpacked: `wp-content` children sit at the root.
pub struct WpressValidator;

impl BackupValidator for WpressValidator {
    fn can_handle(&self, files: &[String]) -> bool {
        files.iter().any(|f| f == "database.sql")
            && files.iter().any(|f| f == "package.json")
            && has_any_bucket(files, "")
    }

    fn parse_backup_contents(&self, files: &[String], extraction_dir: &Path) -> BackupContents {
        let mut contents = BackupContents {
            extraction_directory: extraction_dir.to_path_buf(),
            ..Default::default()
        };

        for file in files {
            let path = extraction_dir.join(file);
            match file.as_str() {
                "database.sql" => contents.sql_files.push(path),
                "package.json" => contents.meta_file = Some(path),
                _ => {
                    add_content(&mut contents.wp_content, file, path);
                }
            }
        }

        sort_sql_files(&mut contents.sql_files);
        contents
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_can_handle() {
        assert!(WpressValidator.can_handle(&files(&[
            "package.json",
            "database.sql",
            "uploads/2024/a.jpg"
        ])));
        assert!(!WpressValidator.can_handle(&files(&["package.json", "database.sql"])));
        assert!(!WpressValidator.can_handle(&files(&["database.sql", "themes/t/style.css"])));
    }

    #[test]
    fn test_parse_backup_contents() {
        let dir = Path::new("/e");
        let contents = WpressValidator.parse_backup_contents(
            &files(&[
                "package.json",
                "database.sql",
                "uploads/a.jpg",
                "plugins/hello/hello.php",
                "themes/t/style.css",
                "multisite.json",
            ]),
            dir,
        );
        assert_eq!(contents.sql_files, [dir.join("database.sql")]);
        assert_eq!(contents.meta_file, Some(dir.join("package.json")));
        assert_eq!(contents.wp_content_directory, "");
        assert_eq!(contents.wp_content.len(), 3);
    }
}
