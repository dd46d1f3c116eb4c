use std::fmt;
use std::path::{Path, PathBuf};

/// Reference to a backup file supplied by the caller.
///
/// `media_type` comes from whatever produced the file (a browser, a file
/// picker, the OS) and may be empty or a generic `application/octet-stream`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveRef {
    pub path: PathBuf,
    pub media_type: String,
}

impl ArchiveRef {
    pub fn new(path: impl Into<PathBuf>, media_type: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            media_type: media_type.into(),
        }
    }

    /// Build a reference whose media type is guessed from the file name.
    pub fn guess(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let media_type = guess_media_type(&path).to_owned();
        Self { path, media_type }
    }

    fn normalized_media_type(&self) -> String {
        self.media_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase()
    }

    fn lowercase_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default()
    }
}

/// Container formats a backup can arrive in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BackupFormat {
    Zip,
    TarGz,
    Sql,
    Wpress,
}

impl BackupFormat {
    pub const ALL: [BackupFormat; 4] = [Self::Zip, Self::TarGz, Self::Sql, Self::Wpress];

    /// Media types different producers use for this container.
    pub fn media_types(self) -> &'static [&'static str] {
        match self {
            Self::Zip => &[
                "application/zip",
                "application/x-zip",
                "application/x-zip-compressed",
                "multipart/x-zip",
                "application/octet-stream",
            ],
            Self::TarGz => &[
                "application/gzip",
                "application/x-gzip",
                "application/x-gtar",
                "application/x-tgz",
                "application/x-tar",
                "application/x-compressed",
                "application/x-compressed-tar",
                "application/octet-stream",
            ],
            Self::Sql => &[
                "application/sql",
                "application/x-sql",
                "text/sql",
                "text/x-sql",
                "text/plain",
                "application/octet-stream",
                "",
            ],
            Self::Wpress => &["application/octet-stream", "application/x-wpress"],
        }
    }

    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Zip => &[".zip"],
            Self::TarGz => &[".tar.gz", ".tgz"],
            Self::Sql => &[".sql"],
            Self::Wpress => &[".wpress"],
        }
    }

    /// Match a reference on media type and extension together.
    pub fn detect(archive: &ArchiveRef) -> Option<Self> {
        let media_type = archive.normalized_media_type();
        let name = archive.lowercase_name();
        Self::ALL.into_iter().find(|format| {
            format.media_types().contains(&media_type.as_str())
                && format.extensions().iter().any(|ext| name.ends_with(ext))
        })
    }

    /// Human-readable list used in "unsupported format" errors.
    pub fn supported_list() -> String {
        Self::ALL
            .iter()
            .map(|f| f.extensions().join("/"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for BackupFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Zip => "zip",
            Self::TarGz => "tar.gz",
            Self::Sql => "sql",
            Self::Wpress => "wpress",
        })
    }
}

fn guess_media_type(path: &Path) -> &'static str {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    if name.ends_with(".zip") {
        "application/zip"
    } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
        "application/gzip"
    } else if name.ends_with(".sql") {
        "application/sql"
    } else {
        "application/octet-stream"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_requires_extension_and_media_type() {
        let zip = ArchiveRef::new("/tmp/site.zip", "application/zip");
        assert_eq!(BackupFormat::detect(&zip), Some(BackupFormat::Zip));

        let mislabeled = ArchiveRef::new("/tmp/site.zip", "application/gzip");
        assert_eq!(BackupFormat::detect(&mislabeled), None);
    }

    #[test]
    fn test_detect_tar_gz_variants() {
        for (path, ty) in [
            ("a.tar.gz", "application/gzip"),
            ("a.tgz", "application/x-gzip"),
            ("A.TAR.GZ", "application/x-compressed"),
        ] {
            assert_eq!(
                BackupFormat::detect(&ArchiveRef::new(path, ty)),
                Some(BackupFormat::TarGz),
                "{path} {ty}"
            );
        }
    }

    #[test]
    fn test_sql_accepts_empty_media_type() {
        let sql = ArchiveRef::new("dump.sql", "");
        assert_eq!(BackupFormat::detect(&sql), Some(BackupFormat::Sql));
    }

    #[test]
    fn test_only_sql_accepts_empty_media_type() {
        for path in ["site.zip", "site.tar.gz", "site.wpress"] {
            assert_eq!(BackupFormat::detect(&ArchiveRef::new(path, "")), None, "{path}");
        }
    }

    #[test]
    fn test_media_type_parameters_are_ignored() {
        let sql = ArchiveRef::new("dump.sql", "text/plain; charset=utf-8");
        assert_eq!(BackupFormat::detect(&sql), Some(BackupFormat::Sql));
    }

    #[test]
    fn test_wpress_with_generic_type() {
        let w = ArchiveRef::new("site.wpress", "application/octet-stream");
        assert_eq!(BackupFormat::detect(&w), Some(BackupFormat::Wpress));
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let x = ArchiveRef::new("x.xyz", "application/unknown");
        assert_eq!(BackupFormat::detect(&x), None);
        let x = ArchiveRef::new("x.xyz", "application/octet-stream");
        assert_eq!(BackupFormat::detect(&x), None);
    }

    #[test]
    fn test_guess_fills_media_type() {
        assert_eq!(ArchiveRef::guess("a/b.tgz").media_type, "application/gzip");
        assert_eq!(
            ArchiveRef::guess("a/b.wpress").media_type,
            "application/octet-stream"
        );
    }

    #[test]
    fn test_supported_list_names_every_format() {
        let list = BackupFormat::supported_list();
        for ext in [".zip", ".tar.gz", ".sql", ".wpress"] {
            assert!(list.contains(ext));
        }
    }
}
