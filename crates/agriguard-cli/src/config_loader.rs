//! Configuration loading for CLI commands

use anyhow::{Context, Result};
use agriguard_core::config::{CliConfigOverrides, LayeredConfig};
use std::path::{Path, PathBuf};

use crate::cli::Cli;

/// Config file picked up from the working directory
pub const DEFAULT_CONFIG_FILE: &str = "agriguard.toml";

/// Load layered configuration: defaults, file, environment, then flags.
///
/// An explicit `--config` file must exist; the default one is optional.
pub fn load_config(cli: &Cli) -> Result<LayeredConfig> {
    let config = match &cli.config {
        Some(path) => LayeredConfig::with_defaults()
            .load_from_file(path)
            .with_context(|| format!("Failed to load configuration file {}", path.display()))?,
        None => LayeredConfig::with_defaults()
            .load_from_optional_file(default_config_path())
            .context("Failed to load configuration file")?,
    };

    let mut config = config.load_from_env();
    config.update_from_cli(overrides(cli)).context("Invalid command-line option")?;
    Ok(config)
}

fn default_config_path() -> PathBuf {
    Path::new(".").join(DEFAULT_CONFIG_FILE)
}

fn overrides(cli: &Cli) -> CliConfigOverrides {
    CliConfigOverrides {
        predict_url: cli.predict_url.clone(),
        geocoder_url: cli.geocoder_url.clone(),
        request_timeout_secs: cli.timeout,
    }
}
