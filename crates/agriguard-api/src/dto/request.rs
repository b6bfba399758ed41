use serde::Deserialize;

/// Analyze request body; both fields fall back to the session's values
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub crop: Option<String>,
    #[serde(default)]
    pub planting_date: Option<String>,
}
