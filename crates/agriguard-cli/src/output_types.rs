use agriguard_core::models::{AnalysisReport, LatLon};
use agriguard_core::render::ResultView;
use agriguard_geo::BoundarySummary;
use serde::Serialize;
use tabled::Tabled;

/// Output for centroid command
#[derive(Debug, Serialize)]
pub struct CentroidOutput {
    pub path: String,
    #[serde(flatten)]
    pub summary: BoundarySummary,
}

/// Output for geocode command
#[derive(Debug, Serialize)]
pub struct GeocodeOutput {
    pub location: LatLon,
    pub label: String,
    pub display_name: String,
}

/// Output for analyze command
#[derive(Debug, Serialize)]
pub struct AnalyzeOutput {
    pub crop: String,
    pub planting_date: Option<String>,
    pub place_label: Option<String>,
    pub boundary: BoundarySummary,
    pub report: AnalysisReport,
    pub view: ResultView,
}

/// Output for render command
#[derive(Debug, Serialize)]
pub struct RenderOutput {
    pub report: AnalysisReport,
    pub view: ResultView,
}

/// Output for config command
#[derive(Debug, Serialize, Tabled)]
pub struct ConfigEntry {
    #[tabled(rename = "Setting")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Source")]
    pub source: String,
}

/// A zone row in the terminal result
#[derive(Debug, Tabled)]
pub struct ZoneTableRow {
    #[tabled(rename = "Zone")]
    pub zone: String,
    #[tabled(rename = "Risk")]
    pub risk: String,
    #[tabled(rename = "Confidence")]
    pub confidence: String,
}
