use agriguard_core::models::FieldBoundary;
use geo::algorithm::intersects::Intersects;
use geo::{Coord, Line};
use std::fmt;

use crate::models::distinct_vertices;

/// A problem found in a boundary ring
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    pub location: String,
    pub reason: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.reason)
    }
}

/// Validation result with details
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub issues: Vec<ValidationIssue>,
    degenerate: bool,
}

impl ValidationResult {
    /// Whether area and bounds can be computed at all
    pub fn is_measurable(&self) -> bool {
        !self.degenerate
    }

    fn add_issue(&mut self, location: impl Into<String>, reason: impl Into<String>) {
        self.issues.push(ValidationIssue {
            location: location.into(),
            reason: reason.into(),
        });
    }
}

/// Check a boundary for common drawing problems.
///
/// The boundary is never modified or rejected.
pub fn validate_boundary(boundary: &FieldBoundary) -> ValidationResult {
    let mut result = ValidationResult::default();

    check_ring(&mut result, "exterior", boundary.exterior());
    for (i, ring) in boundary.interiors().iter().enumerate() {
        check_ring(&mut result, &format!("interior[{}]", i), ring);
    }

    result
}

fn check_ring(result: &mut ValidationResult, location: &str, ring: &[[f64; 2]]) {
    let vertices = distinct_vertices(ring);

    if vertices.len() < 3 {
        result.add_issue(
            location,
            format!("ring needs at least 3 distinct vertices, found {}", vertices.len()),
        );
        result.degenerate = true;
    }

    if let (Some(first), Some(last)) = (ring.first(), ring.last()) {
        if ring.len() > 1 && first != last {
            result.add_issue(location, "ring is not closed (first vertex != last vertex)");
        }
    }

    for (i, [lon, lat]) in ring.iter().enumerate() {
        if !lon.is_finite() || !lat.is_finite() {
            result.add_issue(format!("{}[{}]", location, i), "coordinates must be finite");
            result.degenerate = true;
        } else if !(-180.0..=180.0).contains(lon) || !(-90.0..=90.0).contains(lat) {
            result.add_issue(
                format!("{}[{}]", location, i),
                format!("({}, {}) is outside WGS 84 bounds", lon, lat),
            );
        }
    }

    if !result.degenerate && self_intersects(vertices) {
        result.add_issue(location, "ring crosses itself");
    }
}

/// Check whether any two non-adjacent edges of the closed ring cross
fn self_intersects(vertices: &[[f64; 2]]) -> bool {
    let n = vertices.len();
    let edge = |i: usize| {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        Line::new(Coord { x: a[0], y: a[1] }, Coord { x: b[0], y: b[1] })
    };

    for i in 0..n {
        for j in (i + 2)..n {
            // First and last edges share the closing vertex
            if i == 0 && j == n - 1 {
                continue;
            }
            if edge(i).intersects(&edge(j)) {
                return true;
            }
        }
    }
    false
}
