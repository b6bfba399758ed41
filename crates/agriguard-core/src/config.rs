use crate::error::{AgriguardError, Result};
use crate::models::DEFAULT_CROP;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_PREDICT_URL: &str = "http://localhost:8000/predict";
pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_USER_AGENT: &str = concat!("agriguard/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for the dashboard clients
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub predict_url: ConfigValue<String>,
    pub geocoder_url: ConfigValue<String>,
    pub user_agent: ConfigValue<String>,
    pub weather_api_key: ConfigValue<Option<String>>,
    pub request_timeout_secs: ConfigValue<u64>,
    pub default_crop: ConfigValue<String>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            predict_url: ConfigValue::new(DEFAULT_PREDICT_URL.to_string(), ConfigSource::Default),
            geocoder_url: ConfigValue::new(
                DEFAULT_GEOCODER_URL.to_string(),
                ConfigSource::Default,
            ),
            user_agent: ConfigValue::new(DEFAULT_USER_AGENT.to_string(), ConfigSource::Default),
            weather_api_key: ConfigValue::new(None, ConfigSource::Default),
            request_timeout_secs: ConfigValue::new(
                DEFAULT_REQUEST_TIMEOUT_SECS,
                ConfigSource::Default,
            ),
            default_crop: ConfigValue::new(DEFAULT_CROP.to_string(), ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| AgriguardError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| AgriguardError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(predict_url) = file_config.predict_url {
            self.predict_url.update(predict_url, ConfigSource::File);
        }

        if let Some(geocoder_url) = file_config.geocoder_url {
            self.geocoder_url.update(geocoder_url, ConfigSource::File);
        }

        if let Some(user_agent) = file_config.user_agent {
            self.user_agent.update(user_agent, ConfigSource::File);
        }

        if let Some(key) = file_config.weather_api_key {
            self.weather_api_key.update(Some(key), ConfigSource::File);
        }

        if let Some(timeout) = file_config.request_timeout_secs {
            if timeout == 0 {
                return Err(zero_timeout());
            }
            self.request_timeout_secs.update(timeout, ConfigSource::File);
        }

        if let Some(crop) = file_config.default_crop {
            self.default_crop.update(crop, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load the file only if it exists
    pub fn load_from_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self> {
        if path.as_ref().exists() {
            self.load_from_file(path)
        } else {
            Ok(self)
        }
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // AGRIGUARD_PREDICT_URL
        if let Ok(url) = env::var("AGRIGUARD_PREDICT_URL") {
            self.predict_url.update(url, ConfigSource::Environment);
        }

        // AGRIGUARD_GEOCODER_URL
        if let Ok(url) = env::var("AGRIGUARD_GEOCODER_URL") {
            self.geocoder_url.update(url, ConfigSource::Environment);
        }

        // AGRIGUARD_USER_AGENT
        if let Ok(agent) = env::var("AGRIGUARD_USER_AGENT") {
            self.user_agent.update(agent, ConfigSource::Environment);
        }

        // AGRIGUARD_WEATHER_API_KEY
        if let Ok(key) = env::var("AGRIGUARD_WEATHER_API_KEY") {
            self.weather_api_key.update(Some(key), ConfigSource::Environment);
        }

        // AGRIGUARD_REQUEST_TIMEOUT
        if let Ok(timeout_str) = env::var("AGRIGUARD_REQUEST_TIMEOUT") {
            match parse_timeout_secs(&timeout_str) {
                Ok(timeout) => {
                    self.request_timeout_secs.update(timeout, ConfigSource::Environment)
                }
                Err(_) => tracing::warn!(
                    "Invalid AGRIGUARD_REQUEST_TIMEOUT value '{}': expected a positive number of seconds",
                    timeout_str
                ),
            }
        }

        // AGRIGUARD_DEFAULT_CROP
        if let Ok(crop) = env::var("AGRIGUARD_DEFAULT_CROP") {
            self.default_crop.update(crop, ConfigSource::Environment);
        }

        self
    }

    /// Update configuration from CLI arguments
    ///
    /// Nothing is applied if any override is invalid.
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) -> Result<()> {
        if overrides.request_timeout_secs == Some(0) {
            return Err(zero_timeout());
        }

        if let Some(predict_url) = overrides.predict_url {
            self.predict_url.update(predict_url, ConfigSource::Cli);
        }

        if let Some(geocoder_url) = overrides.geocoder_url {
            self.geocoder_url.update(geocoder_url, ConfigSource::Cli);
        }

        if let Some(timeout) = overrides.request_timeout_secs {
            self.request_timeout_secs.update(timeout, ConfigSource::Cli);
        }

        Ok(())
    }

    /// Timeout applied to every outbound request
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.value)
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "predict_url".to_string(),
            (self.predict_url.value.clone(), self.predict_url.source),
        );

        map.insert(
            "geocoder_url".to_string(),
            (self.geocoder_url.value.clone(), self.geocoder_url.source),
        );

        map.insert(
            "user_agent".to_string(),
            (self.user_agent.value.clone(), self.user_agent.source),
        );

        map.insert(
            "weather_api_key".to_string(),
            (
                self.weather_api_key
                    .value
                    .as_deref()
                    .map(mask_secret)
                    .unwrap_or_else(|| "(unset)".to_string()),
                self.weather_api_key.source,
            ),
        );

        map.insert(
            "request_timeout_secs".to_string(),
            (self.request_timeout_secs.value.to_string(), self.request_timeout_secs.source),
        );

        map.insert(
            "default_crop".to_string(),
            (self.default_crop.value.clone(), self.default_crop.source),
        );

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    predict_url: Option<String>,
    geocoder_url: Option<String>,
    user_agent: Option<String>,
    weather_api_key: Option<String>,
    request_timeout_secs: Option<u64>,
    default_crop: Option<String>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub predict_url: Option<String>,
    pub geocoder_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

/// Parse a timeout in whole seconds
pub fn parse_timeout_secs(s: &str) -> Result<u64> {
    match s.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(AgriguardError::ConfigInvalid {
            key: "request_timeout_secs".to_string(),
            reason: format!("Invalid timeout: {}. Use a positive number of seconds", s),
        }),
    }
}

fn zero_timeout() -> AgriguardError {
    AgriguardError::ConfigInvalid {
        key: "request_timeout_secs".to_string(),
        reason: "timeout must be at least 1 second".to_string(),
    }
}

/// Keep the first four characters of a secret
fn mask_secret(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    format!("{}…", visible)
}
