//! Import of WordPress site backups into a local site.
//!
//! # Architecture
//!
//! - `validate/` - Flavor recognition over a flat entry listing
//! - `import/` - Per-flavor import into the target site
//! - `flavor.rs` - The closed set of flavors, in detection priority order
//! - `manager.rs` - Extraction directory lifecycle and orchestration
//! - `meta.rs` - Sidecar meta file formats
//! - `sql_rewrite.rs` - Table prefix rewriting and options SQL synthesis

pub use config::ImportConfig;
pub use content::{BackupContents, ImporterResult, MetaFileData, WpContent};
pub use error::{Error, Result};
pub use events::{EventSink, ImportEvent, ImporterEvent, ValidatorEvent};
pub use flavor::Flavor;
pub use import::{ImportContext, Importer};
pub use manager::{ImportManager, Inspection};
pub use validate::BackupValidator;

mod config;
mod content;
mod error;
mod events;
mod flavor;
pub mod import;
mod manager;
pub mod meta;
pub mod sql_rewrite;
pub mod validate;
