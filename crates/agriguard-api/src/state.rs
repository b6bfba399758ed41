use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use agriguard_client::{CapturedBoundary, DashboardSession};
use agriguard_core::config::LayeredConfig;
use agriguard_core::models::FieldBoundary;
use agriguard_core::ports::{Geocoder, Predictor};
use chrono::{DateTime, Utc};
use tokio::task::AbortHandle;
use uuid::Uuid;

/// Sessions untouched for this long are dropped
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 60);

/// A live dashboard session and its background work
struct SessionEntry {
    session: Arc<DashboardSession>,
    created_at: DateTime<Utc>,
    last_access: DateTime<Utc>,
    geocode_task: Option<AbortHandle>,
}

impl SessionEntry {
    fn abort_background_work(&self) {
        if let Some(task) = &self.geocode_task {
            task.abort();
        }
    }
}

pub struct AppState {
    pub geocoder: Arc<dyn Geocoder>,
    pub predictor: Arc<dyn Predictor>,
    pub config: LayeredConfig,
    session_ttl: Duration,
    sessions: RwLock<HashMap<Uuid, SessionEntry>>,
}

impl AppState {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        predictor: Arc<dyn Predictor>,
        config: LayeredConfig,
    ) -> Self {
        Self {
            geocoder,
            predictor,
            config,
            session_ttl: DEFAULT_SESSION_TTL,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }

    /// Start a fresh session with the configured default crop.
    ///
    /// Idle sessions are swept first.
    pub fn create_session(&self) -> (Uuid, Arc<DashboardSession>, DateTime<Utc>) {
        let id = Uuid::new_v4();
        let created_at = Utc::now();
        let session = Arc::new(DashboardSession::with_default_crop(
            self.geocoder.clone(),
            self.predictor.clone(),
            self.config.default_crop.value.clone(),
        ));

        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        self.evict_locked(&mut sessions, created_at);
        sessions.insert(
            id,
            SessionEntry {
                session: session.clone(),
                created_at,
                last_access: created_at,
                geocode_task: None,
            },
        );
        (id, session, created_at)
    }

    /// Look up a session and mark it as active
    pub fn session(&self, id: Uuid) -> Option<(Arc<DashboardSession>, DateTime<Utc>)> {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        sessions.get_mut(&id).map(|entry| {
            entry.last_access = Utc::now();
            (entry.session.clone(), entry.created_at)
        })
    }

    /// Capture a boundary and start looking up its place name.
    ///
    /// Capture and task registration happen under the sessions lock, so the
    /// tracked task always belongs to the latest boundary. The task it
    /// replaces is aborted. Returns `None` for unknown sessions.
    pub fn capture_boundary(&self, id: Uuid, boundary: FieldBoundary) -> Option<CapturedBoundary> {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let entry = sessions.get_mut(&id)?;
        entry.last_access = Utc::now();

        let captured = entry.session.capture_boundary(boundary);
        let task = tokio::spawn({
            let session = entry.session.clone();
            async move {
                session.resolve_place().await;
            }
        });
        if let Some(previous) = entry.geocode_task.replace(task.abort_handle()) {
            previous.abort();
        }
        Some(captured)
    }

    /// Drop a session and abort its background work. Returns false if unknown.
    pub fn remove_session(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().unwrap_or_else(PoisonError::into_inner).remove(&id);
        match removed {
            Some(entry) => {
                entry.abort_background_work();
                true
            }
            None => false,
        }
    }

    /// Drop every session idle for longer than the TTL as of `now`
    pub fn evict_idle(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        self.evict_locked(&mut sessions, now)
    }

    fn evict_locked(&self, sessions: &mut HashMap<Uuid, SessionEntry>, now: DateTime<Utc>) -> usize {
        let before = sessions.len();
        sessions.retain(|id, entry| {
            // Accessed after `now`: still active
            let keep = match now.signed_duration_since(entry.last_access).to_std() {
                Ok(idle) => idle < self.session_ttl,
                Err(_) => true,
            };
            if !keep {
                entry.abort_background_work();
                tracing::debug!(session_id = %id, "Evicted idle session");
            }
            keep
        });
        before - sessions.len()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}
