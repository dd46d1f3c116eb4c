use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::debug;

use super::import::ImportArg;
use super::inspect::InspectArg;
use crate::config::Config;
use crate::logging;

#[derive(Clone, Debug, Parser)]
#[command(name = "wpbridge", version = env!("CARGO_PKG_VERSION"), about, long_about = None, propagate_version = true)]
pub struct App {
    /// Configuration file (default: ~/.wpbridge/config.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    #[command(alias = "i", name = "import", about = "Import a backup into a local site")]
    Import(ImportArg),
    #[command(alias = "ls", name = "inspect", about = "List a backup and detect its flavor")]
    Inspect(InspectArg),
}

impl App {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load(self.config.as_deref())?;
        logging::init(self.verbose, &config.logging);
        debug!(?config, "loaded configuration");

        match self.cmd {
            Commands::Import(arg) => arg.run(config).await,
            Commands::Inspect(arg) => arg.run(config).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        App::command().debug_assert();
    }

    #[test]
    fn test_parse_import() {
        let app = App::try_parse_from([
            "wpbridge", "-vv", "import", "backup.zip", "--site", "/sites/blog", "--port", "9000",
        ])
        .unwrap();
        assert_eq!(app.verbose, 2);
        match app.cmd {
            Commands::Import(arg) => {
                assert_eq!(arg.archive, PathBuf::from("backup.zip"));
                assert_eq!(arg.site, PathBuf::from("/sites/blog"));
                assert_eq!(arg.port, 9000);
                assert_eq!(arg.media_type, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_import_requires_site() {
        assert!(App::try_parse_from(["wpbridge", "import", "backup.zip"]).is_err());
    }
}
