//! Field boundaries as drawn on the dashboard map.
//!
//! The draw widget emits a GeoJSON `Feature` wrapping a `Polygon`. The
//! original document is kept verbatim so it can be forwarded to the
//! prediction backend unchanged; the rings are extracted once for local
//! computations.

use geojson::GeoJson;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{AgriguardError, Result};

/// A ring of `[lon, lat]` positions
pub type Ring = Vec<[f64; 2]>;

/// A geographic location in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl fmt::Display for LatLon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}, {:.5}", self.lat, self.lon)
    }
}

/// A captured field boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GeoJson", into = "GeoJson")]
pub struct FieldBoundary {
    source: GeoJson,
    rings: Vec<Ring>,
}

impl FieldBoundary {
    /// Build a boundary from a parsed GeoJSON document.
    ///
    /// Accepts a `Polygon` geometry, a `Feature` holding one, or a
    /// `FeatureCollection` with exactly one such feature. Ring validity
    /// (closure, vertex count, self-intersection) is not checked here.
    pub fn from_geojson(source: GeoJson) -> Result<Self> {
        let rings = match &source {
            GeoJson::Geometry(geometry) => polygon_rings(geometry)?,
            GeoJson::Feature(feature) => feature_rings(feature)?,
            GeoJson::FeatureCollection(collection) => match collection.features.as_slice() {
                [feature] => feature_rings(feature)?,
                features => {
                    return Err(AgriguardError::InvalidBoundary {
                        reason: format!(
                            "expected exactly one feature in the collection, found {}",
                            features.len()
                        ),
                    })
                }
            },
        };

        if rings.is_empty() {
            return Err(AgriguardError::InvalidBoundary {
                reason: "polygon has no rings".to_string(),
            });
        }

        Ok(Self { source, rings })
    }

    /// Parse a boundary from GeoJSON text
    pub fn parse(text: &str) -> Result<Self> {
        let source: GeoJson = text.parse().map_err(|e| AgriguardError::InvalidBoundary {
            reason: format!("not valid GeoJSON: {}", e),
        })?;
        Self::from_geojson(source)
    }

    /// Build a bare polygon boundary from an exterior ring
    pub fn from_exterior(ring: Ring) -> Self {
        let positions = ring.iter().map(|p| vec![p[0], p[1]]).collect();
        let geometry = geojson::Geometry::new(geojson::Value::Polygon(vec![positions]));
        Self {
            source: GeoJson::Geometry(geometry),
            rings: vec![ring],
        }
    }

    /// The outer ring, as drawn
    pub fn exterior(&self) -> &[[f64; 2]] {
        &self.rings[0]
    }

    /// Holes, if the source polygon had any
    pub fn interiors(&self) -> &[Ring] {
        &self.rings[1..]
    }

    /// The GeoJSON document this boundary was built from
    pub fn geojson(&self) -> &GeoJson {
        &self.source
    }
}

impl TryFrom<GeoJson> for FieldBoundary {
    type Error = AgriguardError;

    fn try_from(value: GeoJson) -> Result<Self> {
        Self::from_geojson(value)
    }
}

impl From<FieldBoundary> for GeoJson {
    fn from(boundary: FieldBoundary) -> Self {
        boundary.source
    }
}

fn feature_rings(feature: &geojson::Feature) -> Result<Vec<Ring>> {
    let geometry = feature.geometry.as_ref().ok_or_else(|| AgriguardError::InvalidBoundary {
        reason: "feature has no geometry".to_string(),
    })?;
    polygon_rings(geometry)
}

fn polygon_rings(geometry: &geojson::Geometry) -> Result<Vec<Ring>> {
    match &geometry.value {
        geojson::Value::Polygon(rings) => rings
            .iter()
            .enumerate()
            .map(|(ring_idx, ring)| {
                ring.iter()
                    .enumerate()
                    .map(|(pos_idx, position)| match position.as_slice() {
                        [lon, lat, ..] => Ok([*lon, *lat]),
                        _ => Err(AgriguardError::InvalidBoundary {
                            reason: format!(
                                "position {} of ring {} has fewer than two coordinates",
                                pos_idx, ring_idx
                            ),
                        }),
                    })
                    .collect::<Result<Ring>>()
            })
            .collect(),
        other => Err(AgriguardError::UnsupportedGeometry {
            found: other.type_name().to_string(),
        }),
    }
}
