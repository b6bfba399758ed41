use agriguard_client::SessionSnapshot;
use agriguard_core::models::AnalysisReport;
use agriguard_core::render::ResultView;
use agriguard_geo::BoundarySummary;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self { status: "ok", service: "agriguard-api" }
    }
}

/// Session state as seen by the dashboard
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub snapshot: SessionSnapshot,
}

/// Result of capturing a boundary
#[derive(Debug, Serialize)]
pub struct BoundaryResponse {
    pub id: Uuid,
    pub generation: u64,
    pub summary: BoundarySummary,
}

/// Outcome of an analysis request
#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    /// `applied` or `superseded`
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<AnalysisReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<ResultView>,
}

impl AnalysisResponse {
    pub fn applied(report: AnalysisReport) -> Self {
        let view = ResultView::from_result(&report.result);
        Self {
            status: "applied",
            report: Some(report),
            view: Some(view),
        }
    }

    pub fn superseded() -> Self {
        Self {
            status: "superseded",
            report: None,
            view: None,
        }
    }
}

/// The session's current result
#[derive(Debug, Serialize)]
pub struct ResultResponse {
    pub report: AnalysisReport,
    pub view: ResultView,
}

impl From<AnalysisReport> for ResultResponse {
    fn from(report: AnalysisReport) -> Self {
        let view = ResultView::from_result(&report.result);
        Self { report, view }
    }
}

/// Delete operation response
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}
