//! Flavor recognition over an archive's entry listing.
//!
//! Validators look only at entry names. They never touch the filesystem, so
//! the same listing and extraction directory always map to the same
//! [`BackupContents`].

use std::path::{Path, PathBuf};

use crate::content::{BackupContents, WpContent};

mod jetpack;
mod local;
mod playground;
mod sql;
mod wpress;

pub use jetpack::JetpackValidator;
pub use local::LocalValidator;
pub use playground::PlaygroundValidator;
pub use sql::SqlValidator;
pub use wpress::WpressValidator;

pub trait BackupValidator: Send + Sync {
    /// Whether `files` looks like a backup this validator's flavor produced.
    fn can_handle(&self, files: &[String]) -> bool;

    /// Map entry names into absolute paths under `extraction_dir`.
    fn parse_backup_contents(&self, files: &[String], extraction_dir: &Path) -> BackupContents;
}

/// Order SQL files by file name so multi-file dumps import deterministically.
///
/// Plain byte comparison: `sql10.sql` sorts before `sql2.sql`.
pub fn sort_sql_files(files: &mut [PathBuf]) {
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
}

/// `dir/<name><ext>` with nothing nested below `dir`.
pub(crate) fn is_direct_child(file: &str, dir: &str, ext: &str) -> bool {
    file.strip_prefix(dir)
        .is_some_and(|name| !name.contains('/') && name.len() > ext.len() && name.ends_with(ext))
}

pub(crate) fn has_entry_under(files: &[String], dir: &str) -> bool {
    files.iter().any(|f| f.starts_with(dir) && f.len() > dir.len())
}

/// Any of `uploads/`, `plugins/`, `themes/` beneath `root`.
pub(crate) fn has_any_bucket(files: &[String], root: &str) -> bool {
    ["uploads/", "plugins/", "themes/"]
        .iter()
        .any(|bucket| has_entry_under(files, &format!("{root}{bucket}")))
}

/// File `path` under its bucket when `rel`, relative to wp-content, lies in
/// `uploads/`, `plugins/` or `themes/`.
pub(crate) fn add_content(content: &mut WpContent, rel: &str, path: PathBuf) -> bool {
    if rel.ends_with('/') {
        return false;
    }
    let bucket = match rel.split_once('/') {
        Some(("uploads", rest)) if !rest.is_empty() => &mut content.uploads,
        Some(("plugins", rest)) if !rest.is_empty() => &mut content.plugins,
        Some(("themes", rest)) if !rest.is_empty() => &mut content.themes,
        _ => return false,
    };
    bucket.insert(path);
    true
}

/// Shared shape of dump-based exports: an SQL directory beside a `wp-content` tree.
pub(crate) struct DumpLayout {
    pub sql_dir: &'static str,
    /// No trailing slash.
    pub wp_content_dir: &'static str,
    pub meta_file: &'static str,
}

impl DumpLayout {
    fn content_root(&self) -> String {
        format!("{}/", self.wp_content_dir)
    }

    pub(crate) fn can_handle(&self, files: &[String]) -> bool {
        let root = self.content_root();
        files.iter().any(|f| is_direct_child(f, self.sql_dir, ".sql"))
            && ["uploads/", "plugins/", "themes/"]
                .iter()
                .all(|bucket| has_entry_under(files, &format!("{root}{bucket}")))
    }

    pub(crate) fn parse(&self, files: &[String], extraction_dir: &Path) -> BackupContents {
        let root = self.content_root();
        let mut contents = BackupContents {
            extraction_directory: extraction_dir.to_path_buf(),
            wp_content_directory: self.wp_content_dir.to_owned(),
            ..Default::default()
        };

        for file in files {
            let path = extraction_dir.join(file);
            if is_direct_child(file, self.sql_dir, ".sql") {
                contents.sql_files.push(path);
            } else if file == self.meta_file {
                contents.meta_file = Some(path);
            } else if let Some(rel) = file.strip_prefix(&root) {
                add_content(&mut contents.wp_content, rel, path);
            }
            // wp-config.php and bundled core files stay behind.
        }

        sort_sql_files(&mut contents.sql_files);
        contents
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_sql_files_by_basename() {
        let mut files = vec![PathBuf::from("/x/b/02.sql"), PathBuf::from("/x/a/01.sql")];
        sort_sql_files(&mut files);
        assert_eq!(files, [PathBuf::from("/x/a/01.sql"), PathBuf::from("/x/b/02.sql")]);
    }

    #[test]
    fn test_sort_is_not_numeric() {
        let mut files = vec![PathBuf::from("sql2.sql"), PathBuf::from("sql10.sql")];
        sort_sql_files(&mut files);
        assert_eq!(files, [PathBuf::from("sql10.sql"), PathBuf::from("sql2.sql")]);
    }

    #[test]
    fn test_is_direct_child() {
        assert!(is_direct_child("sql/wp_posts.sql", "sql/", ".sql"));
        assert!(!is_direct_child("sql/nested/wp_posts.sql", "sql/", ".sql"));
        assert!(!is_direct_child("sql/.sql", "sql/", ".sql"));
        assert!(!is_direct_child("other/wp_posts.sql", "sql/", ".sql"));
    }

    #[test]
    fn test_add_content_skips_directories_and_unknown_dirs() {
        let mut content = WpContent::default();
        assert!(add_content(&mut content, "uploads/a.jpg", "/e/uploads/a.jpg".into()));
        assert!(!add_content(&mut content, "uploads/", "/e/uploads/".into()));
        assert!(!add_content(&mut content, "uploads/2024/", "/e/uploads/2024/".into()));
        assert!(!add_content(&mut content, "mu-plugins/x.php", "/e/mu-plugins/x.php".into()));
        assert!(!add_content(&mut content, "index.php", "/e/index.php".into()));
        assert_eq!(content.len(), 1);
    }
}
