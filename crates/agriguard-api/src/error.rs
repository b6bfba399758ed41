use agriguard_core::error::{AgriguardError, ANALYSIS_FAILED_MESSAGE, MISSING_BOUNDARY_MESSAGE};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Unified API error type
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<String>,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            details: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: message.into(),
            details: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn session_not_found(id: impl std::fmt::Display) -> Self {
        Self::not_found("Session not found").with_details(format!("No session with id {}", id))
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
            details: self.details,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<AgriguardError> for ApiError {
    fn from(err: AgriguardError) -> Self {
        match &err {
            AgriguardError::BoundaryMissing => Self::bad_request(MISSING_BOUNDARY_MESSAGE),
            AgriguardError::InvalidBoundary { .. }
            | AgriguardError::UnsupportedGeometry { .. }
            | AgriguardError::Serialization(_) => {
                Self::bad_request("Invalid field boundary").with_details(err.to_string())
            }
            e if e.is_prediction_failure() => {
                Self::bad_gateway(ANALYSIS_FAILED_MESSAGE).with_details(err.to_string())
            }
            AgriguardError::Geocoding { .. } => {
                Self::bad_gateway("Reverse geocoding failed").with_details(err.to_string())
            }
            _ => Self::internal("Internal error").with_details(err.to_string()),
        }
    }
}

impl From<askama::Error> for ApiError {
    fn from(err: askama::Error) -> Self {
        tracing::error!(error = %err, "Template rendering failed");
        Self::internal("Failed to render page").with_details(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_boundary_is_bad_request() {
        let err = ApiError::from(AgriguardError::BoundaryMissing);
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Please draw your field boundary first!");
        assert!(err.details.is_none());
    }

    #[test]
    fn test_prediction_failures_share_one_message() {
        let errors = [
            AgriguardError::PredictionUnavailable {
                reason: "connection refused".to_string(),
                remediation: "start the backend".to_string(),
            },
            AgriguardError::PredictionRejected { status: 500, detail: "boom".to_string() },
            AgriguardError::MalformedResponse { reason: "missing 'risk_level'".to_string() },
        ];

        for err in errors {
            let detail = err.to_string();
            let api = ApiError::from(err);
            assert_eq!(api.status, StatusCode::BAD_GATEWAY);
            assert_eq!(api.message, "Analysis failed. Please try again.");
            assert_eq!(api.details.as_deref(), Some(detail.as_str()));
        }
    }

    #[test]
    fn test_unsupported_geometry_is_bad_request() {
        let err = ApiError::from(AgriguardError::UnsupportedGeometry { found: "Point".to_string() });
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.details.unwrap().contains("Point"));
    }
}
