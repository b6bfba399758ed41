use std::env;
use std::path::PathBuf;
use std::time::Duration;

use agriguard_core::config::LayeredConfig;
use agriguard_core::Result;

use crate::state::DEFAULT_SESSION_TTL;

/// Config file read when `AGRIGUARD_CONFIG` is not set
pub const DEFAULT_CONFIG_FILE: &str = "agriguard.toml";

/// API server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub port: u16,
    pub cors_origin: String,
    pub config_path: PathBuf,
    /// Idle time after which a dashboard session is dropped
    pub session_ttl: Duration,
}

impl ApiConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let port = env::var("AGRIGUARD_PORT").ok().and_then(|p| p.parse().ok()).unwrap_or(3000);

        let cors_origin = env::var("AGRIGUARD_CORS_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        let config_path = env::var("AGRIGUARD_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));

        let session_ttl = env::var("AGRIGUARD_SESSION_TTL")
            .ok()
            .and_then(|secs| secs.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_SESSION_TTL);

        Self {
            port,
            cors_origin,
            config_path,
            session_ttl,
        }
    }

    /// Get the server bind address
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    /// Client settings: defaults, then the config file (if present), then env
    pub fn load_client_config(&self) -> Result<LayeredConfig> {
        Ok(LayeredConfig::with_defaults()
            .load_from_optional_file(&self.config_path)?
            .load_from_env())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        env::remove_var("AGRIGUARD_PORT");
        env::remove_var("AGRIGUARD_CORS_ORIGIN");
        env::remove_var("AGRIGUARD_CONFIG");
        env::remove_var("AGRIGUARD_SESSION_TTL");

        let config = ApiConfig::from_env();
        assert_eq!(config.port, 3000);
        assert_eq!(config.session_ttl, Duration::from_secs(30 * 60));
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
        assert_eq!(config.config_path, PathBuf::from("agriguard.toml"));
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        env::set_var("AGRIGUARD_PORT", "8080");
        env::set_var("AGRIGUARD_CORS_ORIGIN", "https://fields.example.org");
        env::set_var("AGRIGUARD_SESSION_TTL", "120");

        let config = ApiConfig::from_env();
        assert_eq!(config.port, 8080);
        assert_eq!(config.cors_origin, "https://fields.example.org");
        assert_eq!(config.session_ttl, Duration::from_secs(120));

        env::set_var("AGRIGUARD_SESSION_TTL", "0");
        assert_eq!(ApiConfig::from_env().session_ttl, DEFAULT_SESSION_TTL);

        env::remove_var("AGRIGUARD_PORT");
        env::remove_var("AGRIGUARD_CORS_ORIGIN");
        env::remove_var("AGRIGUARD_SESSION_TTL");
    }

    #[test]
    #[serial]
    fn test_missing_config_file_is_not_an_error() {
        let config = ApiConfig {
            port: 3000,
            cors_origin: String::new(),
            config_path: PathBuf::from("/nonexistent/agriguard.toml"),
            session_ttl: DEFAULT_SESSION_TTL,
        };
        let client = config.load_client_config().unwrap();
        assert_eq!(client.request_timeout_secs.value, 30);
    }
}
