use agriguard_core::config::LayeredConfig;
use agriguard_core::models::{LatLon, ReverseGeocode};
use agriguard_core::ports::Geocoder;
use agriguard_core::{AgriguardError, Result};
use async_trait::async_trait;
use serde::Deserialize;

use crate::http::{client_from_config, trim_base_url};

/// Reverse geocoder backed by a Nominatim-compatible `/reverse` endpoint
pub struct NominatimGeocoder {
    /// Base URL (e.g., "https://nominatim.openstreetmap.org")
    base_url: String,

    /// HTTP client, carrying the User-Agent Nominatim's usage policy asks for
    client: reqwest::Client,
}

impl NominatimGeocoder {
    pub fn new(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: trim_base_url(base_url),
            client,
        }
    }

    /// Create from the effective configuration
    pub fn from_config(config: &LayeredConfig) -> Result<Self> {
        Ok(Self::new(config.geocoder_url.value.clone(), client_from_config(config)?))
    }

    fn reverse_url(&self, location: LatLon) -> Result<reqwest::Url> {
        reqwest::Url::parse_with_params(
            &format!("{}/reverse", self.base_url),
            &[
                ("lat", location.lat.to_string()),
                ("lon", location.lon.to_string()),
                ("format", "json".to_string()),
            ],
        )
        .map_err(|e| AgriguardError::Geocoding {
            reason: format!("Invalid geocoder URL '{}': {}", self.base_url, e),
        })
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn reverse(&self, location: LatLon) -> Result<ReverseGeocode> {
        let url = self.reverse_url(location)?;
        tracing::debug!(%url, "Reverse geocoding");

        let response = self.client.get(url).send().await.map_err(|e| {
            AgriguardError::Geocoding { reason: format!("Failed to reach {}: {}", self.base_url, e) }
        })?;

        if !response.status().is_success() {
            return Err(AgriguardError::Geocoding {
                reason: format!("Geocoder returned HTTP {}", response.status()),
            });
        }

        let body: NominatimReverse =
            response.json().await.map_err(|e| AgriguardError::Geocoding {
                reason: format!("Failed to parse geocoder response: {}", e),
            })?;

        match (body.display_name, body.error) {
            (Some(display_name), _) => Ok(ReverseGeocode::new(display_name)),
            (None, Some(error)) => Err(AgriguardError::Geocoding { reason: error }),
            (None, None) => Err(AgriguardError::Geocoding {
                reason: "Response has no display_name".to_string(),
            }),
        }
    }

    fn name(&self) -> &str {
        "nominatim"
    }
}

/// The part of Nominatim's reverse response we use
#[derive(Debug, Deserialize)]
struct NominatimReverse {
    display_name: Option<String>,
    /// Set instead of `display_name` when nothing is found (e.g. open sea)
    error: Option<String>,
}
