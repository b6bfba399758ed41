use agriguard_core::models::{FieldBoundary, LatLon};
use geo::algorithm::bounding_rect::BoundingRect;
use geo::algorithm::centroid::Centroid;
use geo::{Distance, GeodesicArea, Haversine, Point};
use serde::Serialize;

use crate::models::{distinct_vertices, to_geo_polygon};
use crate::validation::validate_boundary;

const SQUARE_METRES_PER_HECTARE: f64 = 10_000.0;

/// Arithmetic mean of a ring's vertices.
///
/// This is the location used for geocoding. It is not the polygon's true
/// centroid and drifts toward densely digitised edges. The closing vertex of
/// a closed ring is counted once.
pub fn vertex_mean(ring: &[[f64; 2]]) -> Option<LatLon> {
    let vertices = distinct_vertices(ring);
    if vertices.is_empty() {
        return None;
    }

    let n = vertices.len() as f64;
    let (lon_sum, lat_sum) =
        vertices.iter().fold((0.0, 0.0), |(lon, lat), v| (lon + v[0], lat + v[1]));

    Some(LatLon::new(lat_sum / n, lon_sum / n))
}

/// Area-weighted centroid of the polygon
pub fn area_weighted_centroid(boundary: &FieldBoundary) -> Option<LatLon> {
    to_geo_polygon(boundary).centroid().map(|p| LatLon::new(p.y(), p.x()))
}

/// `[min_lon, min_lat, max_lon, max_lat]`
pub fn bounds(boundary: &FieldBoundary) -> Option<[f64; 4]> {
    to_geo_polygon(boundary)
        .bounding_rect()
        .map(|rect| [rect.min().x, rect.min().y, rect.max().x, rect.max().y])
}

/// Geodesic area of the polygon in square metres
pub fn geodesic_area_m2(boundary: &FieldBoundary) -> f64 {
    to_geo_polygon(boundary).geodesic_area_unsigned()
}

/// Everything the dashboard reports about a freshly captured boundary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundarySummary {
    pub vertex_count: usize,
    /// Arithmetic-mean centroid, used for geocoding
    pub centroid: Option<LatLon>,
    pub area_weighted_centroid: Option<LatLon>,
    /// Distance between the two centroids
    pub centroid_offset_m: Option<f64>,
    pub bounds: Option<[f64; 4]>,
    pub area_hectares: Option<f64>,
    pub warnings: Vec<String>,
}

/// Summarize a boundary. Never fails; problems end up in `warnings`.
pub fn summarize(boundary: &FieldBoundary) -> BoundarySummary {
    let validation = validate_boundary(boundary);

    let centroid = vertex_mean(boundary.exterior());

    // Measurements are meaningless on degenerate or non-finite rings
    let measurable = validation.is_measurable();
    let area_weighted = if measurable { area_weighted_centroid(boundary) } else { None };
    let centroid_offset_m = match (centroid, area_weighted) {
        (Some(a), Some(b)) => {
            Some(Haversine.distance(Point::new(a.lon, a.lat), Point::new(b.lon, b.lat)))
        }
        _ => None,
    };

    BoundarySummary {
        vertex_count: distinct_vertices(boundary.exterior()).len(),
        centroid,
        area_weighted_centroid: area_weighted,
        centroid_offset_m,
        bounds: if measurable { bounds(boundary) } else { None },
        area_hectares: measurable.then(|| geodesic_area_m2(boundary) / SQUARE_METRES_PER_HECTARE),
        warnings: validation.issues.iter().map(|issue| issue.to_string()).collect(),
    }
}
