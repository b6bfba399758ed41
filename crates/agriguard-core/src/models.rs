pub mod boundary;
pub mod place;
pub mod request;
pub mod result;

pub use boundary::{FieldBoundary, LatLon, Ring};
pub use place::ReverseGeocode;
pub use request::{AnalysisRequest, DEFAULT_CROP};
pub use result::{
    AnalysisReport, AnalysisResult, SatelliteFeatures, TrendPoint, WeatherSnapshot, ZoneRisk,
};
