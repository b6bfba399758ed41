use agriguard_core::config::LayeredConfig;
use agriguard_core::models::AnalysisRequest;
use agriguard_core::ports::Predictor;
use agriguard_core::{AgriguardError, Result};
use async_trait::async_trait;
use serde_json::Value;

use crate::http::client_from_config;

/// Longest error body kept in a `PredictionRejected` detail
const MAX_DETAIL_CHARS: usize = 300;

/// Client for the crop stress prediction backend
pub struct HttpPredictor {
    /// Full endpoint URL (e.g., "http://localhost:8000/predict")
    endpoint: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpPredictor {
    pub fn new(endpoint: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            endpoint: endpoint.into(),
            client,
        }
    }

    /// Create from the effective configuration
    pub fn from_config(config: &LayeredConfig) -> Result<Self> {
        Ok(Self::new(config.predict_url.value.clone(), client_from_config(config)?))
    }
}

#[async_trait]
impl Predictor for HttpPredictor {
    async fn predict(&self, request: &AnalysisRequest) -> Result<Value> {
        tracing::info!(endpoint = %self.endpoint, crop = %request.crop, "Submitting analysis");

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| AgriguardError::PredictionUnavailable {
                reason: format!("Failed to connect to prediction service: {}", e),
                remediation: format!(
                    "Ensure the prediction backend is running at {} \
                     or point AGRIGUARD_PREDICT_URL at a reachable one.",
                    self.endpoint
                ),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AgriguardError::PredictionRejected {
                status: status.as_u16(),
                detail: error_detail(&body),
            });
        }

        response.json::<Value>().await.map_err(|e| AgriguardError::MalformedResponse {
            reason: format!("Response is not JSON: {}", e),
        })
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Prefer a JSON `detail` field, otherwise the (truncated) body text
fn error_detail(body: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        if let Some(detail) = map.get("detail").and_then(Value::as_str) {
            return detail.to_string();
        }
    }

    let body = body.trim();
    if body.is_empty() {
        return "(empty body)".to_string();
    }
    match body.char_indices().nth(MAX_DETAIL_CHARS) {
        Some((cut, _)) => format!("{}…", &body[..cut]),
        None => body.to_string(),
    }
}
