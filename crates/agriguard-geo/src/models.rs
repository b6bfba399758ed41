//! Conversions from captured boundaries to `geo` types.

use agriguard_core::models::FieldBoundary;
use geo::{Coord, LineString, Polygon};

/// The ring's vertices with the closing repeat of the first vertex removed
pub fn distinct_vertices(ring: &[[f64; 2]]) -> &[[f64; 2]] {
    match ring {
        [first, .., last] if first == last => &ring[..ring.len() - 1],
        _ => ring,
    }
}

fn to_line_string(ring: &[[f64; 2]]) -> LineString {
    // LineString::new does not close the ring; Polygon::new does
    LineString::new(ring.iter().map(|c| Coord { x: c[0], y: c[1] }).collect())
}

/// Convert a boundary to a `geo::Polygon` (rings are closed if needed)
pub fn to_geo_polygon(boundary: &FieldBoundary) -> Polygon {
    let exterior = to_line_string(boundary.exterior());
    let interiors = boundary.interiors().iter().map(|ring| to_line_string(ring)).collect();
    Polygon::new(exterior, interiors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_vertices() {
        let closed = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]];
        assert_eq!(distinct_vertices(&closed).len(), 3);

        let open = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]];
        assert_eq!(distinct_vertices(&open).len(), 3);

        let single = [[0.0, 0.0]];
        assert_eq!(distinct_vertices(&single).len(), 1);
    }

    #[test]
    fn test_polygon_is_closed() {
        let boundary = FieldBoundary::from_exterior(vec![[0.0, 0.0], [2.0, 0.0], [2.0, 2.0]]);
        let polygon = to_geo_polygon(&boundary);
        let exterior = polygon.exterior();
        assert_eq!(exterior.0.first(), exterior.0.last());
        assert_eq!(exterior.0.len(), 4);
    }
}
