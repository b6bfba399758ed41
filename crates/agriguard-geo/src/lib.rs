//! AgriGuard Geo - Boundary geometry
//!
//! Centroids, ring diagnostics and measurements for captured field
//! boundaries. Nothing in this crate rejects a boundary: diagnostics are
//! reported alongside the boundary, which is always passed on unchanged.

pub mod models;
pub mod spatial;
pub mod validation;

pub use models::{distinct_vertices, to_geo_polygon};
pub use spatial::{
    area_weighted_centroid, bounds, geodesic_area_m2, summarize, vertex_mean, BoundarySummary,
};
pub use validation::{validate_boundary, ValidationIssue, ValidationResult};
