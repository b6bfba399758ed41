//! AgriGuard Client - Outbound adapters and dashboard session state
//!
//! Implements the core ports over HTTP (Nominatim reverse geocoding and the
//! crop stress prediction backend) and the per-dashboard session that ties
//! boundary capture, geocoding and analysis together.

pub mod geocoder;
pub mod http;
pub mod predictor;
pub mod session;

pub use geocoder::NominatimGeocoder;
pub use predictor::HttpPredictor;
pub use session::{AnalysisOutcome, CapturedBoundary, DashboardSession, SessionSnapshot};
