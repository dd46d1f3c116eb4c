pub use error::{Error, Result};
pub use runtime::{CommandOptions, CommandOutput, SiteRuntime};
pub use wp_cli::{WpCliConfig, WpCliRuntime};

pub mod command;
mod error;
pub mod runtime;
pub mod wp_cli;
