//! Error types for AgriGuard

use thiserror::Error;

/// Message shown when analysis is requested before a boundary exists.
pub const MISSING_BOUNDARY_MESSAGE: &str = "Please draw your field boundary first!";

/// Message shown for every failed analysis, whatever the cause.
pub const ANALYSIS_FAILED_MESSAGE: &str = "Analysis failed. Please try again.";

#[derive(Debug, Error)]
pub enum AgriguardError {
    // Boundary errors
    #[error("Please draw your field boundary first!")]
    BoundaryMissing,

    #[error("Invalid field boundary: {reason}")]
    InvalidBoundary { reason: String },

    #[error("Unsupported boundary geometry: expected Polygon, found {found}")]
    UnsupportedGeometry { found: String },

    // Geocoding errors
    #[error("Reverse geocoding failed: {reason}")]
    Geocoding { reason: String },

    // Prediction errors
    #[error("Prediction service unavailable: {reason}. Try: {remediation}")]
    PredictionUnavailable { reason: String, remediation: String },

    #[error("Prediction service returned HTTP {status}: {detail}")]
    PredictionRejected { status: u16, detail: String },

    #[error("Malformed prediction response: {reason}")]
    MalformedResponse { reason: String },

    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl AgriguardError {
    /// True when the error is a missing precondition rather than a failure.
    ///
    /// Precondition errors never reach the network.
    pub fn is_precondition(&self) -> bool {
        matches!(self, AgriguardError::BoundaryMissing)
    }

    /// True for failures of the prediction round-trip.
    pub fn is_prediction_failure(&self) -> bool {
        matches!(
            self,
            AgriguardError::PredictionUnavailable { .. }
                | AgriguardError::PredictionRejected { .. }
                | AgriguardError::MalformedResponse { .. }
        )
    }

    /// The message a user should see for this error.
    pub fn user_message(&self) -> &'static str {
        if self.is_precondition() {
            MISSING_BOUNDARY_MESSAGE
        } else {
            ANALYSIS_FAILED_MESSAGE
        }
    }
}

impl From<serde_json::Error> for AgriguardError {
    fn from(err: serde_json::Error) -> Self {
        AgriguardError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AgriguardError>;
