use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no suitable importer found for the given backup file")]
    NoSuitableImporter,

    #[error("database import of '{file}' failed with exit code {exit_code}: {stderr}")]
    DatabaseImport {
        file: PathBuf,
        exit_code: i32,
        stderr: String,
    },

    #[error("failed to update the site URL: {reason}")]
    SiteUrl { reason: String },

    #[error("I/O error on '{path}': {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Archive(#[from] wpbridge_archive::Error),

    #[error(transparent)]
    Fs(#[from] wpbridge_fs::Error),

    #[error(transparent)]
    Platform(#[from] wpbridge_platform::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
