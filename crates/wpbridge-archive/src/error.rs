use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(
        "unsupported backup file '{path}' (type '{media_type}'); supported formats: {supported}"
    )]
    UnsupportedFormat {
        path: PathBuf,
        media_type: String,
        supported: String,
    },

    #[error("backup file not found: '{path}'")]
    NotFound { path: PathBuf },

    #[error("archive '{path}' is corrupted: {reason}")]
    Corrupted { path: PathBuf, reason: String },

    #[error("entry '{entry}' resolves outside the extraction directory")]
    ZipSlip { entry: String },

    #[error("failed to read '{path}': {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to extract '{path}': {source}")]
    ExtractionFailed { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Fs(#[from] wpbridge_fs::Error),
}

impl Error {
    pub(crate) fn corrupted(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Corrupted {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
