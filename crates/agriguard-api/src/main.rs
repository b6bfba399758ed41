use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::http::{header, HeaderValue, Method};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agriguard_api::{create_router, ApiConfig, AppState};
use agriguard_client::{HttpPredictor, NominatimGeocoder};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agriguard_api=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let api_config = ApiConfig::from_env();
    let config = api_config.load_client_config().with_context(|| {
        format!("Failed to load configuration from {}", api_config.config_path.display())
    })?;

    tracing::info!(
        port = api_config.port,
        predict_url = %config.predict_url.value,
        geocoder_url = %config.geocoder_url.value,
        timeout_secs = config.request_timeout_secs.value,
        session_ttl_secs = api_config.session_ttl.as_secs(),
        "Starting AgriGuard API server"
    );

    let geocoder = NominatimGeocoder::from_config(&config)?;
    let predictor = HttpPredictor::from_config(&config)?;
    let state = Arc::new(
        AppState::new(Arc::new(geocoder), Arc::new(predictor), config)
            .with_session_ttl(api_config.session_ttl),
    );
    spawn_session_sweeper(state.clone());

    let cors = CorsLayer::new()
        .allow_origin(
            api_config
                .cors_origin
                .parse::<HeaderValue>()
                .with_context(|| format!("Invalid CORS origin '{}'", api_config.cors_origin))?,
        )
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let app = create_router(state).layer(cors).layer(TraceLayer::new_for_http());

    let addr = api_config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Listening on {}", addr);
    tracing::info!("CORS enabled for {}", api_config.cors_origin);

    axum::serve(listener, app).await?;
    Ok(())
}

/// Periodically drop sessions whose page was closed without a DELETE
fn spawn_session_sweeper(state: Arc<AppState>) {
    let period = state.session_ttl().clamp(Duration::from_secs(1), Duration::from_secs(60));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            let evicted = state.evict_idle(chrono::Utc::now());
            if evicted > 0 {
                tracing::info!(evicted, remaining = state.session_count(), "Evicted idle sessions");
            }
        }
    });
}
