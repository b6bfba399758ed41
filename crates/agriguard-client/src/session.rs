//! Dashboard session state.
//!
//! A session holds what one open dashboard knows: the captured boundary, the
//! form inputs, the resolved place label, the loading flag and the last
//! analysis report. State sits behind a `std::sync::RwLock` that is never held
//! across an `.await`.
//!
//! Two generation counters keep late completions from clobbering newer state:
//! every analysis takes the next `analysis_generation`, and every captured
//! boundary takes the next `boundary_generation` (and invalidates in-flight
//! analyses too). A completion is applied only if its generation is still
//! current.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use agriguard_core::models::{AnalysisReport, AnalysisRequest, FieldBoundary, DEFAULT_CROP};
use agriguard_core::ports::{Geocoder, Predictor};
use agriguard_core::{AgriguardError, Result};
use agriguard_geo::{summarize, BoundarySummary};
use serde::Serialize;

/// A boundary as captured by the session
#[derive(Debug, Clone, Serialize)]
pub struct CapturedBoundary {
    pub boundary: FieldBoundary,
    pub summary: BoundarySummary,
    pub generation: u64,
}

/// What became of a finished analysis
#[derive(Debug, Clone)]
pub enum AnalysisOutcome {
    /// The report is now the session's current result
    Applied(AnalysisReport),
    /// A newer analysis or boundary superseded this one; nothing changed
    Superseded,
}

/// Read-only copy of a session's state
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub has_boundary: bool,
    pub boundary: Option<BoundarySummary>,
    pub crop: String,
    pub planting_date: Option<String>,
    pub place_label: Option<String>,
    pub loading: bool,
    pub report: Option<AnalysisReport>,
}

#[derive(Debug)]
struct SessionState {
    boundary: Option<CapturedBoundary>,
    crop: String,
    planting_date: Option<String>,
    place_label: Option<String>,
    loading: bool,
    report: Option<AnalysisReport>,
    analysis_generation: u64,
    boundary_generation: u64,
}

/// One dashboard's state plus the services it talks to
pub struct DashboardSession {
    geocoder: Arc<dyn Geocoder>,
    predictor: Arc<dyn Predictor>,
    state: RwLock<SessionState>,
}

impl DashboardSession {
    pub fn new(geocoder: Arc<dyn Geocoder>, predictor: Arc<dyn Predictor>) -> Self {
        Self::with_default_crop(geocoder, predictor, DEFAULT_CROP)
    }

    pub fn with_default_crop(
        geocoder: Arc<dyn Geocoder>,
        predictor: Arc<dyn Predictor>,
        crop: impl Into<String>,
    ) -> Self {
        Self {
            geocoder,
            predictor,
            state: RwLock::new(SessionState {
                boundary: None,
                crop: crop.into(),
                planting_date: None,
                place_label: None,
                loading: false,
                report: None,
                analysis_generation: 0,
                boundary_generation: 0,
            }),
        }
    }

    // A panic while holding the lock leaves plain data behind; keep using it.
    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the boundary.
    ///
    /// Clears the place label and the loading flag and invalidates every
    /// in-flight geocoding lookup and analysis. The previous report stays
    /// visible until a new one arrives.
    pub fn capture_boundary(&self, boundary: FieldBoundary) -> CapturedBoundary {
        let summary = summarize(&boundary);
        for warning in &summary.warnings {
            tracing::debug!(warning = %warning, "Boundary diagnostic");
        }

        let mut state = self.write();
        state.boundary_generation += 1;
        state.analysis_generation += 1;
        state.loading = false;
        state.place_label = None;

        let captured = CapturedBoundary {
            boundary,
            summary,
            generation: state.boundary_generation,
        };
        state.boundary = Some(captured.clone());

        tracing::info!(
            generation = captured.generation,
            vertices = captured.summary.vertex_count,
            "Boundary captured"
        );
        captured
    }

    /// Reverse-geocode the current boundary's centroid.
    ///
    /// Failures are logged and leave the label empty. Returns the label if it
    /// was applied.
    pub async fn resolve_place(&self) -> Option<String> {
        let (location, generation) = {
            let state = self.read();
            let captured = state.boundary.as_ref()?;
            (captured.summary.centroid?, captured.generation)
        };

        let place = match self.geocoder.reverse(location).await {
            Ok(place) => place,
            Err(e) => {
                tracing::warn!(geocoder = self.geocoder.name(), error = %e, "Reverse geocoding failed");
                return None;
            }
        };

        let label = place.label();
        let mut state = self.write();
        if state.boundary_generation != generation {
            tracing::debug!(generation, "Discarding place label for replaced boundary");
            return None;
        }
        state.place_label = Some(label.clone());
        Some(label)
    }

    /// Record the form inputs and analyze the current boundary with them.
    ///
    /// Without a boundary this fails with `BoundaryMissing` and the predictor
    /// is never called. The inputs and the request are taken under one lock,
    /// so concurrent callers each send their own crop and planting date. The
    /// loading flag is set for the duration and cleared on every exit path,
    /// including cancellation.
    pub async fn analyze_with(
        &self,
        crop: impl Into<String>,
        planting_date: Option<String>,
    ) -> Result<AnalysisOutcome> {
        let (request, generation) = {
            let mut state = self.write();
            state.crop = crop.into();
            state.planting_date = planting_date;
            let captured = state.boundary.as_ref().ok_or(AgriguardError::BoundaryMissing)?;
            let request = AnalysisRequest::new(
                captured.boundary.clone(),
                state.crop.clone(),
                state.planting_date.clone(),
            );
            state.analysis_generation += 1;
            state.loading = true;
            (request, state.analysis_generation)
        };
        let _loading = LoadingGuard {
            state: &self.state,
            generation,
        };

        let report = self
            .predictor
            .predict(&request)
            .await
            .and_then(|response| AnalysisReport::from_json(&response))
            .map_err(|e| {
                tracing::error!(endpoint = self.predictor.endpoint(), error = %e, "Analysis failed");
                e
            })?;

        let mut state = self.write();
        if state.analysis_generation != generation {
            tracing::info!(generation, "Discarding superseded analysis result");
            return Ok(AnalysisOutcome::Superseded);
        }

        tracing::info!(
            generation,
            risk_level = %report.result.risk_level,
            warnings = report.warnings.len(),
            "Analysis applied"
        );
        state.report = Some(report.clone());
        Ok(AnalysisOutcome::Applied(report))
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.read();
        SessionSnapshot {
            has_boundary: state.boundary.is_some(),
            boundary: state.boundary.as_ref().map(|b| b.summary.clone()),
            crop: state.crop.clone(),
            planting_date: state.planting_date.clone(),
            place_label: state.place_label.clone(),
            loading: state.loading,
            report: state.report.clone(),
        }
    }

    pub fn boundary(&self) -> Option<CapturedBoundary> {
        self.read().boundary.clone()
    }

    pub fn report(&self) -> Option<AnalysisReport> {
        self.read().report.clone()
    }

    pub fn place_label(&self) -> Option<String> {
        self.read().place_label.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.read().loading
    }
}

/// Clears the loading flag when the analysis that set it ends
struct LoadingGuard<'a> {
    state: &'a RwLock<SessionState>,
    generation: u64,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        // A newer analysis owns the flag now
        if state.analysis_generation == self.generation {
            state.loading = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agriguard_core::models::{LatLon, ReverseGeocode};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tokio::sync::oneshot;

    struct FixedGeocoder(std::result::Result<&'static str, &'static str>);

    #[async_trait]
    impl Geocoder for FixedGeocoder {
        async fn reverse(&self, _location: LatLon) -> Result<ReverseGeocode> {
            self.0
                .map(ReverseGeocode::new)
                .map_err(|reason| AgriguardError::Geocoding { reason: reason.to_string() })
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    /// Answers each call with the next queued response; counts calls
    #[derive(Default)]
    struct QueuedPredictor {
        responses: Mutex<Vec<Result<Value>>>,
        calls: AtomicUsize,
        requests: Mutex<Vec<AnalysisRequest>>,
    }

    impl QueuedPredictor {
        fn with(responses: Vec<Result<Value>>) -> Self {
            Self {
                responses: Mutex::new(responses),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl Predictor for QueuedPredictor {
        async fn predict(&self, request: &AnalysisRequest) -> Result<Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().unwrap().push(request.clone());
            self.responses.lock().unwrap().remove(0)
        }

        fn endpoint(&self) -> &str {
            "queued"
        }
    }

    /// Blocks until released, so tests can interleave requests
    struct GatedPredictor {
        gates: Mutex<Vec<oneshot::Receiver<Value>>>,
    }

    #[async_trait]
    impl Predictor for GatedPredictor {
        async fn predict(&self, _request: &AnalysisRequest) -> Result<Value> {
            let gate = self.gates.lock().unwrap().remove(0);
            gate.await.map_err(|_| AgriguardError::PredictionUnavailable {
                reason: "gate dropped".to_string(),
                remediation: String::new(),
            })
        }

        fn endpoint(&self) -> &str {
            "gated"
        }
    }

    /// Reports the request's crop back as the risk level
    struct EchoPredictor;

    #[async_trait]
    impl Predictor for EchoPredictor {
        async fn predict(&self, request: &AnalysisRequest) -> Result<Value> {
            tokio::task::yield_now().await;
            Ok(json!({ "risk_level": request.crop, "confidence": 0.5 }))
        }

        fn endpoint(&self) -> &str {
            "echo"
        }
    }

    fn square() -> FieldBoundary {
        FieldBoundary::from_exterior(vec![
            [80.0, 7.0],
            [80.1, 7.0],
            [80.1, 7.1],
            [80.0, 7.1],
            [80.0, 7.0],
        ])
    }

    fn result(risk: &str) -> Value {
        json!({ "risk_level": risk, "confidence": 0.83 })
    }

    fn session(predictor: Arc<dyn Predictor>) -> DashboardSession {
        DashboardSession::new(Arc::new(FixedGeocoder(Ok("A, B, C, D, E"))), predictor)
    }

    #[tokio::test]
    async fn test_analyze_without_boundary_never_calls_predictor() {
        let predictor = Arc::new(QueuedPredictor::default());
        let session = session(predictor.clone());

        let err = session.analyze_with("Rice", None).await.unwrap_err();
        assert!(matches!(err, AgriguardError::BoundaryMissing));
        assert_eq!(err.to_string(), "Please draw your field boundary first!");
        assert_eq!(predictor.calls.load(Ordering::SeqCst), 0);
        assert!(!session.is_loading());
    }

    #[tokio::test]
    async fn test_analyze_applies_report() {
        let predictor = Arc::new(QueuedPredictor::with(vec![Ok(result("High"))]));
        let session = session(predictor.clone());
        session.capture_boundary(square());

        let outcome = session.analyze_with("Tea", Some("2025-01-15".to_string())).await.unwrap();
        assert!(matches!(outcome, AnalysisOutcome::Applied(_)));
        assert_eq!(session.report().unwrap().result.risk_level, "High");
        assert!(!session.is_loading());

        let requests = predictor.requests.lock().unwrap();
        assert_eq!(requests[0].crop, "Tea");
        assert_eq!(requests[0].planting_date.as_deref(), Some("2025-01-15"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_analyses_send_their_own_inputs() {
        let session = Arc::new(session(Arc::new(EchoPredictor)));
        session.capture_boundary(square());

        let crops = ["Tea", "Rice", "Maize", "Coconut", "Rubber", "Cinnamon"];
        let tasks: Vec<_> = crops
            .iter()
            .map(|&crop| {
                let session = session.clone();
                tokio::spawn(async move { (crop, session.analyze_with(crop, None).await) })
            })
            .collect();

        for task in tasks {
            let (crop, outcome) = task.await.unwrap();
            match outcome.unwrap() {
                AnalysisOutcome::Applied(report) => assert_eq!(report.result.risk_level, crop),
                AnalysisOutcome::Superseded => {}
            }
        }
        assert!(!session.is_loading());
    }

    #[tokio::test]
    async fn test_analyze_with_records_inputs() {
        let predictor = Arc::new(QueuedPredictor::with(vec![Ok(result("Medium"))]));
        let session = session(predictor.clone());

        let err = session.analyze_with("Maize", None).await.unwrap_err();
        assert!(matches!(err, AgriguardError::BoundaryMissing));
        assert_eq!(predictor.calls.load(Ordering::SeqCst), 0);

        session.capture_boundary(square());
        session.analyze_with("Maize", Some("2025-03-01".to_string())).await.unwrap();

        let snapshot = session.snapshot();
        assert_eq!(snapshot.crop, "Maize");
        assert_eq!(snapshot.planting_date.as_deref(), Some("2025-03-01"));
        assert_eq!(predictor.requests.lock().unwrap()[0].crop, "Maize");
    }

    #[tokio::test]
    async fn test_failure_clears_loading_and_keeps_previous_report() {
        let predictor = Arc::new(QueuedPredictor::with(vec![
            Ok(result("Low")),
            Err(AgriguardError::PredictionRejected { status: 500, detail: "boom".to_string() }),
            Ok(json!({ "confidence": 0.5 })),
        ]));
        let session = session(predictor);
        session.capture_boundary(square());

        session.analyze_with("Rice", None).await.unwrap();

        let err = session.analyze_with("Rice", None).await.unwrap_err();
        assert_eq!(err.user_message(), "Analysis failed. Please try again.");
        assert!(!session.is_loading());

        let err = session.analyze_with("Rice", None).await.unwrap_err();
        assert!(matches!(err, AgriguardError::MalformedResponse { .. }));
        assert!(!session.is_loading());

        assert_eq!(session.report().unwrap().result.risk_level, "Low");
    }

    #[tokio::test]
    async fn test_superseded_analysis_is_not_applied() {
        let (first_tx, first_rx) = oneshot::channel();
        let (second_tx, second_rx) = oneshot::channel();
        let predictor = Arc::new(GatedPredictor { gates: Mutex::new(vec![first_rx, second_rx]) });
        let session = Arc::new(session(predictor));
        session.capture_boundary(square());

        let first = tokio::spawn({
            let session = session.clone();
            async move { session.analyze_with("Rice", None).await }
        });
        // Let the first request take its generation before the second starts
        while !session.is_loading() {
            tokio::task::yield_now().await;
        }
        let second = tokio::spawn({
            let session = session.clone();
            async move { session.analyze_with("Rice", None).await }
        });
        while session.read().analysis_generation < 3 {
            tokio::task::yield_now().await;
        }

        second_tx.send(result("Low")).unwrap();
        let second = second.await.unwrap().unwrap();
        assert!(matches!(second, AnalysisOutcome::Applied(_)));

        // The earlier request completes last and must not overwrite
        first_tx.send(result("High")).unwrap();
        let first = first.await.unwrap().unwrap();
        assert!(matches!(first, AnalysisOutcome::Superseded));

        assert_eq!(session.report().unwrap().result.risk_level, "Low");
        assert!(!session.is_loading());
    }

    #[tokio::test]
    async fn test_new_boundary_supersedes_in_flight_analysis() {
        let (tx, rx) = oneshot::channel();
        let predictor = Arc::new(GatedPredictor { gates: Mutex::new(vec![rx]) });
        let session = Arc::new(session(predictor));
        session.capture_boundary(square());

        let pending = tokio::spawn({
            let session = session.clone();
            async move { session.analyze_with("Rice", None).await }
        });
        while !session.is_loading() {
            tokio::task::yield_now().await;
        }

        session.capture_boundary(square());
        assert!(!session.is_loading());

        tx.send(result("High")).unwrap();
        let outcome = pending.await.unwrap().unwrap();
        assert!(matches!(outcome, AnalysisOutcome::Superseded));
        assert!(session.report().is_none());
    }

    #[tokio::test]
    async fn test_cancelled_analysis_clears_loading() {
        let (_tx, rx) = oneshot::channel::<Value>();
        let predictor = Arc::new(GatedPredictor { gates: Mutex::new(vec![rx]) });
        let session = Arc::new(session(predictor));
        session.capture_boundary(square());

        let pending = tokio::spawn({
            let session = session.clone();
            async move { session.analyze_with("Rice", None).await }
        });
        while !session.is_loading() {
            tokio::task::yield_now().await;
        }

        pending.abort();
        assert!(pending.await.unwrap_err().is_cancelled());
        assert!(!session.is_loading());
    }

    #[tokio::test]
    async fn test_resolve_place_shortens_label() {
        let session = session(Arc::new(QueuedPredictor::default()));
        assert_eq!(session.resolve_place().await, None);

        session.capture_boundary(square());
        assert_eq!(session.resolve_place().await.as_deref(), Some("A, E"));
        assert_eq!(session.snapshot().place_label.as_deref(), Some("A, E"));

        // A new boundary clears the old label
        session.capture_boundary(square());
        assert!(session.place_label().is_none());
    }

    #[tokio::test]
    async fn test_geocoding_failure_leaves_label_empty() {
        let session = DashboardSession::new(
            Arc::new(FixedGeocoder(Err("offline"))),
            Arc::new(QueuedPredictor::default()),
        );
        session.capture_boundary(square());

        assert_eq!(session.resolve_place().await, None);
        assert!(session.place_label().is_none());
    }

    #[test]
    fn test_capture_reports_centroid() {
        let session = session(Arc::new(QueuedPredictor::default()));
        let captured = session.capture_boundary(square());

        let centroid = captured.summary.centroid.unwrap();
        assert!((centroid.lon - 80.05).abs() < 1e-9);
        assert!((centroid.lat - 7.05).abs() < 1e-9);

        let snapshot = session.snapshot();
        assert!(snapshot.has_boundary);
        assert_eq!(snapshot.crop, "Rice");
        assert!(!snapshot.loading);
    }
}
