//! Listing and extraction of site backup containers.
//!
//! # Architecture
//!
//! - `format.rs` - Container detection from media type + extension
//! - `handler.rs` - `BackupHandler` trait and the handler factory
//! - `extract/` - zip, tar.gz and raw SQL handlers
//! - `wpress/` - the sequential wpress container
//! - `sanitize.rs` - Hidden-entry filtering and zip-slip prevention
//! - `events.rs` - Extraction events and the explicit `Reporter` channel

pub use error::{Error, Result};
pub use events::{HandlerEvent, Reporter};
pub use extract::{SqlHandler, TarGzHandler, ZipHandler};
pub use format::{ArchiveRef, BackupFormat};
pub use handler::{BackupHandler, create, handler_for};
pub use sanitize::{PLAYGROUND_DATABASE, is_hidden_entry, resolve_entry, visible_entries};
pub use wpress::{WpressHandler, WpressHeader};

mod error;
mod events;
mod extract;
mod format;
mod handler;
mod sanitize;
pub mod wpress;
