//! AgriGuard CLI - Command-line interface
//!
//! Boundary centroids, reverse geocoding, field analysis and offline
//! rendering of saved prediction responses.

mod cli;
mod commands;
mod config_loader;
mod errors;
mod interactive;
mod output;
mod output_types;
mod progress;

use clap::Parser;
use cli::Cli;
use errors::{from_anyhow, CliError};

fn main() {
    // Logs go to stderr so --json output stays parseable
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let result = tokio::runtime::Runtime::new()
        .map_err(anyhow::Error::from)
        .and_then(|runtime| runtime.block_on(commands::execute(cli)));

    if let Err(error) = result {
        match error.downcast::<CliError>() {
            Ok(cli_error) => cli_error.display(),
            Err(other) => from_anyhow(other).display(),
        }
        std::process::exit(1);
    }
}
