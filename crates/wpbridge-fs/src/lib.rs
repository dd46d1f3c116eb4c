//! Filesystem primitives used while importing a site backup.
//!
//! - `primitives` - copy/move helpers with cross-device fallback
//! - `trash` - recoverable removal
//! - `workspace` - per-attempt extraction directory

mod error;
mod primitives;
mod trash;
mod workspace;

pub use error::{Error, Result};
pub use primitives::{copy_dir_all, copy_file, ensure_parent, move_path, remove_file_if_exists};
pub use trash::{DirectoryTrash, Trash};
pub use workspace::ExtractionDir;
