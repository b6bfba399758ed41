use std::sync::Arc;

use agriguard_core::models::FieldBoundary;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::dto::{BoundaryResponse, DeleteResponse, SessionResponse};
use crate::error::ApiError;
use crate::state::AppState;

pub async fn create_session(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<SessionResponse>) {
    let (id, session, created_at) = state.create_session();
    tracing::info!(session_id = %id, "Created dashboard session");

    (
        StatusCode::CREATED,
        Json(SessionResponse {
            id,
            created_at,
            snapshot: session.snapshot(),
        }),
    )
}

pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, ApiError> {
    let (session, created_at) = state.session(id).ok_or_else(|| ApiError::session_not_found(id))?;

    Ok(Json(SessionResponse {
        id,
        created_at,
        snapshot: session.snapshot(),
    }))
}

pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>, ApiError> {
    if !state.remove_session(id) {
        return Err(ApiError::session_not_found(id));
    }
    tracing::info!(session_id = %id, "Deleted dashboard session");

    Ok(Json(DeleteResponse {
        success: true,
        message: format!("Session {} deleted", id),
    }))
}

/// Capture a drawn boundary and look up its place name in the background
pub async fn capture_boundary(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    body: String,
) -> Result<Json<BoundaryResponse>, ApiError> {
    let boundary = FieldBoundary::parse(&body).map_err(|e| {
        tracing::warn!(session_id = %id, error = %e, "Rejected boundary");
        ApiError::from(e)
    })?;

    let captured =
        state.capture_boundary(id, boundary).ok_or_else(|| ApiError::session_not_found(id))?;

    Ok(Json(BoundaryResponse {
        id,
        generation: captured.generation,
        summary: captured.summary,
    }))
}
