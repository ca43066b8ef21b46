mod cli;
mod commands;
mod details;
mod error;
mod load;

use clap::Parser;
use tracing::Level;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();

    if let Err(error) = run().await {
        eprintln!("error: {error}");
        std::process::exit(error.exit_code() as i32);
    }
}

async fn run() -> Result<(), CliError> {
    let cli = Cli::parse();
    let zone = commands::parse_zone(&cli.timezone)?;

    match &cli.command {
        Command::Reconstruct(args) => commands::reconstruct::run(args, zone),
        Command::Enrich(args) => commands::enrich::run(args).await,
        Command::Merge(args) => commands::merge::run(args, zone),
    }
}
