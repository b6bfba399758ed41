use std::sync::Arc;

use agriguard_client::AnalysisOutcome;
use askama::Template;
use axum::{
    extract::{Path, State},
    response::Html,
    Json,
};
use uuid::Uuid;

use crate::dto::{AnalysisResponse, AnalyzeRequest, ResultResponse};
use crate::error::ApiError;
use crate::state::AppState;
use crate::templates::ResultTemplate;

pub async fn analyze(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let (session, _) = state.session(id).ok_or_else(|| ApiError::session_not_found(id))?;

    let crop = request
        .crop
        .filter(|crop| !crop.trim().is_empty())
        .unwrap_or_else(|| state.config.default_crop.value.clone());

    tracing::info!(session_id = %id, crop = %crop, "Analyzing field");

    match session.analyze_with(crop, request.planting_date).await? {
        AnalysisOutcome::Applied(report) => Ok(Json(AnalysisResponse::applied(report))),
        AnalysisOutcome::Superseded => Ok(Json(AnalysisResponse::superseded())),
    }
}

pub async fn get_result(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ResultResponse>, ApiError> {
    let (session, _) = state.session(id).ok_or_else(|| ApiError::session_not_found(id))?;
    let report = session.report().ok_or_else(|| ApiError::not_found("No analysis result yet"))?;

    Ok(Json(ResultResponse::from(report)))
}

/// The result panel as an HTML fragment
pub async fn get_result_html(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Html<String>, ApiError> {
    let (session, _) = state.session(id).ok_or_else(|| ApiError::session_not_found(id))?;
    let report = session.report().ok_or_else(|| ApiError::not_found("No analysis result yet"))?;

    let page = ResultTemplate {
        view: ResultResponse::from(report).view,
        place_label: session.place_label(),
    };
    Ok(Html(page.render()?))
}
