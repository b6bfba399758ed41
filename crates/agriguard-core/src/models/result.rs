//! Prediction results as returned by the backend.
//!
//! The backend's response shape is not under our control, so it is read
//! field by field from a `serde_json::Value`. `risk_level` and `confidence`
//! are required; every other field is optional and dropped with a warning
//! when it has the wrong shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{AgriguardError, Result};

/// One point of the vegetation health trend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub day: String,
    pub score: f64,
}

/// Current weather at the field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub description: String,
    pub icon: String,
    pub temp: Option<f64>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
}

/// Per-zone risk breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneRisk {
    pub zone_id: String,
    pub risk: String,
    pub confidence: f64,
}

/// Satellite statistics the backend based its decision on
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SatelliteFeatures {
    pub ndvi_mean: Option<f64>,
    pub vv_mean: Option<f64>,
    pub vh_mean: Option<f64>,
    pub time_window_days: Option<u32>,
}

/// A stress diagnosis for one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub risk_level: String,
    /// Model confidence in `[0, 1]`
    pub confidence: f64,
    #[serde(default)]
    pub trend_status: Option<String>,
    #[serde(default)]
    pub trend_data: Vec<TrendPoint>,
    #[serde(default)]
    pub health_average: Option<f64>,
    /// Distinct anomaly tags, in the order the backend listed them
    #[serde(default)]
    pub anomalies_detected: Vec<String>,
    #[serde(default)]
    pub recommended_actions: Vec<String>,
    #[serde(default)]
    pub weather: Option<WeatherSnapshot>,
    #[serde(default)]
    pub zones: Vec<ZoneRisk>,
    #[serde(default)]
    pub features_used: Option<SatelliteFeatures>,
}

/// A validated result together with what validation had to drop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub result: AnalysisResult,
    pub warnings: Vec<String>,
    pub received_at: DateTime<Utc>,
}

impl AnalysisReport {
    /// Validate a raw backend response
    pub fn from_json(value: &Value) -> Result<Self> {
        let (result, warnings) = AnalysisResult::validate(value)?;
        for warning in &warnings {
            tracing::warn!(warning = %warning, "Prediction response field dropped");
        }
        Ok(Self {
            result,
            warnings,
            received_at: Utc::now(),
        })
    }
}

impl AnalysisResult {
    /// Validate a raw backend response, returning the result and warnings.
    pub fn validate(value: &Value) -> Result<(Self, Vec<String>)> {
        let object = value.as_object().ok_or_else(|| AgriguardError::MalformedResponse {
            reason: format!("expected a JSON object, found {}", kind(value)),
        })?;

        let mut reader = FieldReader::new(object);

        let risk_level = match object.get("risk_level") {
            Some(Value::String(level)) if !level.trim().is_empty() => level.clone(),
            Some(other) if !other.is_null() => {
                return Err(AgriguardError::MalformedResponse {
                    reason: format!("'risk_level' must be a non-empty string, found {}", kind(other)),
                })
            }
            _ => return Err(missing_field(object, "risk_level")),
        };

        let confidence = match object.get("confidence") {
            Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
            Some(other) if !other.is_null() => {
                return Err(AgriguardError::MalformedResponse {
                    reason: format!("'confidence' must be a number, found {}", kind(other)),
                })
            }
            _ => return Err(missing_field(object, "confidence")),
        };
        if !confidence.is_finite() {
            return Err(AgriguardError::MalformedResponse {
                reason: "'confidence' is not a finite number".to_string(),
            });
        }
        let confidence = if (0.0..=1.0).contains(&confidence) {
            confidence
        } else {
            reader.warn("confidence", format!("{} is outside [0, 1], clamped", confidence));
            confidence.clamp(0.0, 1.0)
        };

        let result = Self {
            risk_level,
            confidence,
            trend_status: reader.optional_string("trend_status"),
            trend_data: reader.trend_data(),
            health_average: reader.optional_number("health_average"),
            anomalies_detected: dedup(reader.string_list("anomalies_detected")),
            recommended_actions: reader.string_list("recommended_actions"),
            weather: reader.weather(),
            zones: reader.zones(),
            features_used: reader.features(),
        };

        Ok((result, reader.warnings))
    }
}

fn missing_field(object: &Map<String, Value>, field: &str) -> AgriguardError {
    let reason = match object.get("detail").and_then(Value::as_str) {
        Some(detail) => format!("missing '{}' (backend said: {})", field, detail),
        None => format!("missing required field '{}'", field),
    };
    AgriguardError::MalformedResponse { reason }
}

fn dedup(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items.into_iter().filter(|item| seen.insert(item.clone())).collect()
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Reads optional fields, recording a warning for each one it drops
struct FieldReader<'a> {
    object: &'a Map<String, Value>,
    warnings: Vec<String>,
}

impl<'a> FieldReader<'a> {
    fn new(object: &'a Map<String, Value>) -> Self {
        Self { object, warnings: Vec::new() }
    }

    fn warn(&mut self, field: &str, reason: String) {
        self.warnings.push(format!("{}: {}", field, reason));
    }

    fn present(&self, field: &str) -> Option<&'a Value> {
        self.object.get(field).filter(|value| !value.is_null())
    }

    fn optional_string(&mut self, field: &str) -> Option<String> {
        match self.present(field)? {
            Value::String(s) => Some(s.clone()),
            other => {
                self.warn(field, format!("expected a string, found {}", kind(other)));
                None
            }
        }
    }

    fn optional_number(&mut self, field: &str) -> Option<f64> {
        match self.present(field)? {
            Value::Number(n) => n.as_f64(),
            other => {
                self.warn(field, format!("expected a number, found {}", kind(other)));
                None
            }
        }
    }

    fn array(&mut self, field: &str) -> &'a [Value] {
        match self.present(field) {
            None => &[],
            Some(Value::Array(items)) => items,
            Some(other) => {
                self.warn(field, format!("expected an array, found {}", kind(other)));
                &[]
            }
        }
    }

    fn string_list(&mut self, field: &str) -> Vec<String> {
        let mut out = Vec::new();
        for (idx, item) in self.array(field).iter().enumerate() {
            match item {
                Value::String(s) => out.push(s.clone()),
                other => self.warn(
                    &format!("{}[{}]", field, idx),
                    format!("expected a string, found {}", kind(other)),
                ),
            }
        }
        out
    }

    fn trend_data(&mut self) -> Vec<TrendPoint> {
        let mut points = Vec::new();
        for (idx, item) in self.array("trend_data").iter().enumerate() {
            let location = format!("trend_data[{}]", idx);

            let day = match item.get("day") {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Number(n)) => n.to_string(),
                _ => {
                    self.warn(&location, "missing 'day'".to_string());
                    continue;
                }
            };

            match item.get("score").and_then(Value::as_f64) {
                Some(score) => points.push(TrendPoint { day, score }),
                None => self.warn(&location, "missing numeric 'score'".to_string()),
            }
        }
        points
    }

    fn weather(&mut self) -> Option<WeatherSnapshot> {
        let object = match self.present("weather")? {
            Value::Object(object) => object,
            other => {
                self.warn("weather", format!("expected an object, found {}", kind(other)));
                return None;
            }
        };

        let text = |key: &str| object.get(key).and_then(Value::as_str).map(str::to_string);
        let number = |key: &str| object.get(key).and_then(Value::as_f64);

        let description = text("description").unwrap_or_default();
        let icon = text("icon").unwrap_or_default();
        if description.is_empty() && icon.is_empty() {
            self.warn("weather", "neither 'description' nor 'icon' present".to_string());
            return None;
        }

        Some(WeatherSnapshot {
            description,
            icon,
            temp: number("temp"),
            humidity: number("humidity"),
            wind_speed: number("wind_speed"),
        })
    }

    fn zones(&mut self) -> Vec<ZoneRisk> {
        let mut zones = Vec::new();
        for (idx, item) in self.array("zones").iter().enumerate() {
            let zone_id = item.get("zone_id").and_then(Value::as_str);
            let risk = item.get("risk").and_then(Value::as_str);
            let confidence = item.get("confidence").and_then(Value::as_f64);

            match (zone_id, risk, confidence) {
                (Some(zone_id), Some(risk), Some(confidence)) => zones.push(ZoneRisk {
                    zone_id: zone_id.to_string(),
                    risk: risk.to_string(),
                    confidence,
                }),
                _ => self.warn(
                    &format!("zones[{}]", idx),
                    "expected zone_id, risk and confidence".to_string(),
                ),
            }
        }
        zones
    }

    fn features(&mut self) -> Option<SatelliteFeatures> {
        match self.present("features_used")? {
            Value::Object(object) => {
                let number = |key: &str| object.get(key).and_then(Value::as_f64);
                Some(SatelliteFeatures {
                    ndvi_mean: number("ndvi_mean"),
                    vv_mean: number("vv_mean"),
                    vh_mean: number("vh_mean"),
                    time_window_days: object
                        .get("time_window_days")
                        .and_then(Value::as_u64)
                        .and_then(|days| u32::try_from(days).ok()),
                })
            }
            other => {
                self.warn("features_used", format!("expected an object, found {}", kind(other)));
                None
            }
        }
    }
}
