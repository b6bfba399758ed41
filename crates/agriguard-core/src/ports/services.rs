use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::models::{AnalysisRequest, LatLon, ReverseGeocode};

/// Port for reverse geocoding
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve a location to a human-readable place
    async fn reverse(&self, location: LatLon) -> Result<ReverseGeocode>;

    /// Service name, for logs
    fn name(&self) -> &str;
}

/// Port for the crop stress prediction backend
#[async_trait]
pub trait Predictor: Send + Sync {
    /// Submit a field for analysis and return the raw JSON response.
    ///
    /// Implementations report transport failures and non-success statuses as
    /// errors; the response body is validated by the caller.
    async fn predict(&self, request: &AnalysisRequest) -> Result<Value>;

    /// Endpoint the requests go to, for logs
    fn endpoint(&self) -> &str;
}
