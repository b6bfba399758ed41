use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handlers;
use crate::state::AppState;

/// Create the router with all pages and API routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health
        .route("/health", get(handlers::health_check))

        // Pages
        .route("/", get(handlers::landing_page))
        .route("/dashboard", get(handlers::dashboard_page))
        .route("/login", get(handlers::login_page))
        .route("/signup", get(handlers::signup_page))
        .route("/about", get(handlers::about_page))

        // Dashboard sessions
        .route("/api/sessions", post(handlers::create_session))
        .route(
            "/api/sessions/{id}",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        .route("/api/sessions/{id}/boundary", put(handlers::capture_boundary))
        .route("/api/sessions/{id}/analyze", post(handlers::analyze))
        .route("/api/sessions/{id}/result", get(handlers::get_result))
        .route("/api/sessions/{id}/result/html", get(handlers::get_result_html))

        .with_state(state)
}
