//! Handlers for the standard containers. The wpress codec lives in `crate::wpress`.

mod sql;
mod tar;
mod zip;

pub use sql::SqlHandler;
pub use tar::TarGzHandler;
pub use zip::ZipHandler;

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use crate::error::{Error, Result};

pub(crate) fn open_archive(path: &Path) -> Result<BufReader<File>> {
    match File::open(path) {
        Ok(file) => Ok(BufReader::new(file)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(Error::NotFound {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(Error::Read {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Write one entry's bytes to `target`, creating parent directories.
pub(crate) fn write_entry(reader: &mut impl io::Read, target: &Path) -> Result<u64> {
    let fail = |e| Error::ExtractionFailed {
        path: target.to_path_buf(),
        source: e,
    };
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent).map_err(fail)?;
    }
    let mut out = File::create(target).map_err(fail)?;
    io::copy(reader, &mut out).map_err(fail)
}

pub(crate) fn create_dir(target: &Path) -> Result<()> {
    std::fs::create_dir_all(target).map_err(|e| Error::ExtractionFailed {
        path: target.to_path_buf(),
        source: e,
    })
}
