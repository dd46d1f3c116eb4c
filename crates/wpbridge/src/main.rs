use clap::Parser;

use crate::cli::App;

mod cli;
mod config;
mod logging;
mod progress;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    App::parse().run().await
}
