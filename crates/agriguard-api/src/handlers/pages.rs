use std::sync::Arc;

use askama::Template;
use axum::{extract::State, http::StatusCode, response::Html};
use chrono::{Datelike, Utc};

use crate::error::ApiError;
use crate::state::AppState;
use crate::templates::{DashboardTemplate, LandingTemplate, UnavailableTemplate};

pub async fn landing_page() -> Result<Html<String>, ApiError> {
    Ok(Html(LandingTemplate::current().render()?))
}

pub async fn dashboard_page(State(state): State<Arc<AppState>>) -> Result<Html<String>, ApiError> {
    let page = DashboardTemplate::new(
        &state.config.default_crop.value,
        state.config.weather_api_key.value.as_deref(),
    );
    Ok(Html(page.render()?))
}

async fn unavailable(page: &'static str) -> Result<(StatusCode, Html<String>), ApiError> {
    tracing::debug!(page, "Requested page is not available");
    let body = UnavailableTemplate { page, year: Utc::now().year() }.render()?;
    Ok((StatusCode::NOT_FOUND, Html(body)))
}

pub async fn login_page() -> Result<(StatusCode, Html<String>), ApiError> {
    unavailable("Login").await
}

pub async fn signup_page() -> Result<(StatusCode, Html<String>), ApiError> {
    unavailable("Sign Up").await
}

pub async fn about_page() -> Result<(StatusCode, Html<String>), ApiError> {
    unavailable("About Us").await
}
