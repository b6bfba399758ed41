use serde::Serialize;

use super::boundary::FieldBoundary;

/// Crop preselected on a fresh dashboard
pub const DEFAULT_CROP: &str = "Rice";

/// Body posted to the prediction backend
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub boundary: FieldBoundary,
    pub crop: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planting_date: Option<String>,
}

impl AnalysisRequest {
    /// Build a request; blank planting dates are dropped.
    pub fn new(
        boundary: FieldBoundary,
        crop: impl Into<String>,
        planting_date: Option<String>,
    ) -> Self {
        Self {
            boundary,
            crop: crop.into().trim().to_string(),
            planting_date: planting_date
                .map(|date| date.trim().to_string())
                .filter(|date| !date.is_empty()),
        }
    }
}
