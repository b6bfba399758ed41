use std::time::Duration;

use agriguard_core::config::LayeredConfig;
use agriguard_core::{AgriguardError, Result};

/// Build the shared HTTP client used by all adapters
pub fn build_client(user_agent: &str, timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .build()
        .map_err(|e| AgriguardError::ConfigInvalid {
            key: "user_agent".to_string(),
            reason: format!("Failed to build HTTP client: {}", e),
        })
}

/// Build the HTTP client described by a configuration
pub fn client_from_config(config: &LayeredConfig) -> Result<reqwest::Client> {
    build_client(&config.user_agent.value, config.request_timeout())
}

/// Strip a trailing slash so paths can be appended with `format!`
pub(crate) fn trim_base_url(url: impl Into<String>) -> String {
    let url = url.into();
    url.trim_end_matches('/').to_string()
}
