//! Command implementations

mod analyze;
mod centroid;
mod config;
mod geocode;
mod render;

use std::path::Path;

use agriguard_core::models::FieldBoundary;
use anyhow::Result;

use crate::cli::{Cli, Commands};
use crate::config_loader::load_config;
use crate::errors::{file_not_found, invalid_boundary};
use crate::output::OutputWriter;

/// Execute a CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Centroid(args) => centroid::execute(args, &output),
        Commands::Geocode(args) => geocode::execute(args, &config, &output).await,
        Commands::Analyze(args) => analyze::execute(args, &config, &output).await,
        Commands::Render(args) => render::execute(args, &output),
        Commands::Config => config::execute(&config, &output),
    }
}

/// Read a file, reporting a missing one with suggestions
fn read_input(path: &Path, command: &str) -> Result<String> {
    if !path.exists() {
        return Err(file_not_found(path, command).into());
    }
    Ok(std::fs::read_to_string(path)?)
}

/// Read and parse a boundary file
fn read_boundary(path: &Path, command: &str) -> Result<FieldBoundary> {
    let text = read_input(path, command)?;
    FieldBoundary::parse(&text).map_err(|e| invalid_boundary(path, &e).into())
}
