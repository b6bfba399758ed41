use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use agriguard_api::{create_router, AppState};
use agriguard_core::config::{ConfigSource, LayeredConfig};
use agriguard_core::models::{AnalysisRequest, FieldBoundary, LatLon, ReverseGeocode};
use agriguard_core::ports::{Geocoder, Predictor};
use agriguard_core::{AgriguardError, Result};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::Utc;
use serde_json::{json, Value};
use tower::ServiceExt;

const BOUNDARY: &str = r#"{
    "type": "Feature",
    "properties": {},
    "geometry": {
        "type": "Polygon",
        "coordinates": [[[80.0, 7.0], [80.1, 7.0], [80.1, 7.1], [80.0, 7.1], [80.0, 7.0]]]
    }
}"#;

struct StubGeocoder;

#[async_trait]
impl Geocoder for StubGeocoder {
    async fn reverse(&self, _location: LatLon) -> Result<ReverseGeocode> {
        Ok(ReverseGeocode::new("Field Road, Dambulla, Matale District, Central Province, Sri Lanka"))
    }

    fn name(&self) -> &str {
        "stub"
    }
}

/// Replays a fixed response and records every request
struct StubPredictor {
    response: Mutex<Option<Value>>,
    calls: AtomicUsize,
    last_request: Mutex<Option<Value>>,
}

impl StubPredictor {
    fn answering(response: Option<Value>) -> Arc<Self> {
        Arc::new(Self {
            response: Mutex::new(response),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        })
    }
}

#[async_trait]
impl Predictor for StubPredictor {
    async fn predict(&self, request: &AnalysisRequest) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(serde_json::to_value(request).unwrap());
        self.response.lock().unwrap().clone().ok_or_else(|| {
            AgriguardError::PredictionUnavailable {
                reason: "connection refused".to_string(),
                remediation: "start the backend".to_string(),
            }
        })
    }

    fn endpoint(&self) -> &str {
        "stub"
    }
}

fn high_risk() -> Value {
    json!({
        "risk_level": "High",
        "confidence": 0.83,
        "trend_status": "Declining",
        "trend_data": [{"day": "Day 1", "score": 0.7}, {"day": "Day 2", "score": 0.4}],
        "health_average": 0.55,
        "anomalies_detected": ["Water Stress"],
        "recommended_actions": ["Irrigate field", "AI Analysis: monitor NDVI"],
    })
}

fn state_with_ttl(ttl: Duration) -> Arc<AppState> {
    Arc::new(
        AppState::new(
            Arc::new(StubGeocoder),
            StubPredictor::answering(None),
            LayeredConfig::with_defaults(),
        )
        .with_session_ttl(ttl),
    )
}

fn app_with(predictor: Arc<StubPredictor>, config: LayeredConfig) -> Router {
    create_router(Arc::new(AppState::new(Arc::new(StubGeocoder), predictor, config)))
}

fn app(predictor: Arc<StubPredictor>) -> Router {
    app_with(predictor, LayeredConfig::with_defaults())
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, String) {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
        builder = builder.header("content-type", "application/json");
    }
    let request = builder.body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty)).unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn new_session(app: &Router) -> String {
    let (status, body) = send(app, "POST", "/api/sessions", None).await;
    assert_eq!(status, StatusCode::CREATED);
    let body: Value = serde_json::from_str(&body).unwrap();
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(&app(StubPredictor::answering(None)), "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body, json!({"status": "ok", "service": "agriguard-api"}));
}

#[tokio::test]
async fn test_landing_page() {
    let (status, body) = send(&app(StubPredictor::answering(None)), "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Crop Stress Predictor"));
    assert!(body.contains(r#"<a href="/signup">Get Started — Free</a>"#));
    assert!(body.contains(r#"<a href="/login">Login to Dashboard</a>"#));
    assert!(body.contains(r#"href="/about""#));

    let year = chrono::Datelike::year(&chrono::Utc::now());
    assert!(body.contains(&format!("&copy; {} AgriGuard AI", year)));
}

#[tokio::test]
async fn test_auth_links_are_not_available() {
    let app = app(StubPredictor::answering(None));
    for path in ["/login", "/signup", "/about"] {
        let (status, body) = send(&app, "GET", path, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", path);
        assert!(body.contains("not available yet"));
    }
}

#[tokio::test]
async fn test_dashboard_weather_overlays_follow_key() {
    let (status, body) = send(&app(StubPredictor::answering(None)), "GET", "/dashboard", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("leaflet.draw"));
    assert!(!body.contains("tile.openweathermap.org"));
    // The page releases its session when it is closed
    assert!(body.contains("\"pagehide\""));
    assert!(body.contains("method: \"DELETE\", keepalive: true"));

    let mut config = LayeredConfig::with_defaults();
    config.weather_api_key.update(Some("owm-key".to_string()), ConfigSource::Environment);
    let (_, body) = send(&app_with(StubPredictor::answering(None), config), "GET", "/dashboard", None).await;
    assert!(body.contains("precipitation_new"));
    assert!(body.contains("clouds_new"));
    assert!(body.contains("temp_new"));
}

#[tokio::test]
async fn test_analyze_without_boundary() {
    let predictor = StubPredictor::answering(Some(high_risk()));
    let app = app(predictor.clone());
    let id = new_session(&app).await;

    let (status, body) =
        send(&app, "POST", &format!("/api/sessions/{}/analyze", id), Some(r#"{"crop": "Rice"}"#)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["error"], "Please draw your field boundary first!");
    assert_eq!(predictor.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_invalid_boundary_is_rejected() {
    let app = app(StubPredictor::answering(None));
    let id = new_session(&app).await;
    let uri = format!("/api/sessions/{}/boundary", id);

    let (status, _) = send(&app, "PUT", &uri, Some("not geojson")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let point = r#"{"type": "Point", "coordinates": [80.0, 7.0]}"#;
    let (status, body) = send(&app, "PUT", &uri, Some(point)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Point"));
}

#[tokio::test]
async fn test_full_analysis_flow() {
    let predictor = StubPredictor::answering(Some(high_risk()));
    let app = app(predictor.clone());
    let id = new_session(&app).await;

    let (status, body) =
        send(&app, "PUT", &format!("/api/sessions/{}/boundary", id), Some(BOUNDARY)).await;
    assert_eq!(status, StatusCode::OK);
    let captured: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(captured["summary"]["vertex_count"], 4);
    let centroid = &captured["summary"]["centroid"];
    assert!((centroid["lat"].as_f64().unwrap() - 7.05).abs() < 1e-9);
    assert!((centroid["lon"].as_f64().unwrap() - 80.05).abs() < 1e-9);

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/sessions/{}/analyze", id),
        Some(r#"{"crop": "Maize", "plantingDate": "2025-01-15"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let outcome: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(outcome["status"], "applied");
    assert_eq!(outcome["view"]["risk"]["css_class"], "risk-badge risk-high");
    assert_eq!(outcome["view"]["confidence"], "83%");

    let sent = predictor.last_request.lock().unwrap().clone().unwrap();
    assert_eq!(sent["crop"], "Maize");
    assert_eq!(sent["plantingDate"], "2025-01-15");
    assert_eq!(sent["boundary"]["type"], "Feature");

    let (status, body) = send(&app, "GET", &format!("/api/sessions/{}/result", id), None).await;
    assert_eq!(status, StatusCode::OK);
    let result: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(result["report"]["result"]["risk_level"], "High");

    let (status, html) = send(&app, "GET", &format!("/api/sessions/{}/result/html", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("risk-badge risk-high"));
    assert!(html.contains("83%"));
    assert!(html.contains("Water Stress"));
    assert!(html.contains("Weather data unavailable"));
    assert!(!html.contains("weather-grid"));
    assert!(html.contains(r#"<li class="emphasized">AI Analysis: monitor NDVI</li>"#));
    assert!(html.contains("<li>Irrigate field</li>"));
}

#[tokio::test]
async fn test_prediction_failure_is_bad_gateway() {
    let app = app(StubPredictor::answering(None));
    let id = new_session(&app).await;
    send(&app, "PUT", &format!("/api/sessions/{}/boundary", id), Some(BOUNDARY)).await;

    let (status, body) = send(&app, "POST", &format!("/api/sessions/{}/analyze", id), Some("{}")).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["error"], "Analysis failed. Please try again.");
    assert!(body["details"].as_str().unwrap().contains("connection refused"));

    let (status, session) = send(&app, "GET", &format!("/api/sessions/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    let session: Value = serde_json::from_str(&session).unwrap();
    assert_eq!(session["loading"], false);

    let (status, _) = send(&app, "GET", &format!("/api/sessions/{}/result", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_and_deleted_sessions() {
    let app = app(StubPredictor::answering(None));
    let missing = "00000000-0000-0000-0000-000000000000";
    let (status, _) = send(&app, "GET", &format!("/api/sessions/{}", missing), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let id = new_session(&app).await;
    send(&app, "PUT", &format!("/api/sessions/{}/boundary", id), Some(BOUNDARY)).await;

    let (status, _) = send(&app, "DELETE", &format!("/api/sessions/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "GET", &format!("/api/sessions/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "DELETE", &format!("/api/sessions/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_place_label_is_resolved_in_background() {
    let app = app(StubPredictor::answering(None));
    let id = new_session(&app).await;
    send(&app, "PUT", &format!("/api/sessions/{}/boundary", id), Some(BOUNDARY)).await;

    let mut label = Value::Null;
    for _ in 0..50 {
        let (_, body) = send(&app, "GET", &format!("/api/sessions/{}", id), None).await;
        let session: Value = serde_json::from_str(&body).unwrap();
        label = session["place_label"].clone();
        if !label.is_null() {
            break;
        }
        tokio::task::yield_now().await;
    }
    assert_eq!(label, "Field Road, Sri Lanka");
}

#[tokio::test]
async fn test_boundary_for_unknown_session() {
    let app = app(StubPredictor::answering(None));
    let missing = "00000000-0000-0000-0000-000000000000";
    let (status, _) =
        send(&app, "PUT", &format!("/api/sessions/{}/boundary", missing), Some(BOUNDARY)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_idle_sessions_are_evicted() {
    let state = state_with_ttl(Duration::from_secs(60));
    for _ in 0..3 {
        state.create_session();
    }

    assert_eq!(state.evict_idle(Utc::now()), 0);
    assert_eq!(state.session_count(), 3);

    assert_eq!(state.evict_idle(Utc::now() + chrono::Duration::seconds(61)), 3);
    assert_eq!(state.session_count(), 0);
}

#[tokio::test]
async fn test_page_loads_do_not_accumulate_sessions() {
    let state = state_with_ttl(Duration::ZERO);
    for _ in 0..1000 {
        state.create_session();
    }
    assert_eq!(state.session_count(), 1);

    let app = create_router(state.clone());
    let first = new_session(&app).await;
    new_session(&app).await;
    let (status, _) = send(&app, "GET", &format!("/api/sessions/{}", first), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_captures_resolve_latest_boundary() {
    let state = state_with_ttl(Duration::from_secs(60));
    let (id, session, _) = state.create_session();

    let captures: Vec<_> = (0..16)
        .map(|_| {
            let state = state.clone();
            tokio::spawn(async move {
                let boundary = FieldBoundary::parse(BOUNDARY).unwrap();
                state.capture_boundary(id, boundary).unwrap().generation
            })
        })
        .collect();
    for capture in captures {
        capture.await.unwrap();
    }
    assert_eq!(session.boundary().unwrap().generation, 16);

    let mut label = None;
    for _ in 0..200 {
        label = session.place_label();
        if label.is_some() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(label.as_deref(), Some("Field Road, Sri Lanka"));
}
