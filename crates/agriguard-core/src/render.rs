//! View models for presenting an analysis result.
//!
//! Everything here is presentation only: the backend's values are mapped
//! onto labels, classes and chart geometry without further interpretation.

pub mod chart;

use serde::Serialize;

use crate::models::{AnalysisResult, WeatherSnapshot, ZoneRisk};
use crate::tiles::weather_icon_url;

pub use chart::{ChartGeometry, TrendChart};

/// Shown in place of the weather grid when the backend sent no weather
pub const WEATHER_UNAVAILABLE: &str = "Weather data unavailable";

/// Actions produced by the backend's model rather than its rule table
pub const AI_ACTION_PREFIX: &str = "AI Analysis";

/// Visual tone of a risk badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTone {
    Danger,
    Warning,
    Ok,
    Neutral,
}

/// Badge showing the risk level
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskBadge {
    pub label: String,
    pub css_class: String,
    pub tone: RiskTone,
}

impl RiskBadge {
    /// Badge for a backend risk level, keyed by its lowercased text
    pub fn for_level(level: &str) -> Self {
        let key = level.trim().to_lowercase();

        let tone = match key.as_str() {
            "high" | "severe" | "critical" => RiskTone::Danger,
            "moderate" | "medium" => RiskTone::Warning,
            "low" | "healthy" => RiskTone::Ok,
            _ => RiskTone::Neutral,
        };

        let slug: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
            .collect();

        Self {
            label: level.trim().to_string(),
            css_class: format!("risk-badge risk-{}", slug),
            tone,
        }
    }

    /// Extra CSS class for the badge colour
    pub fn tone_class(&self) -> &'static str {
        match self.tone {
            RiskTone::Danger => "tone-danger",
            RiskTone::Warning => "tone-warning",
            RiskTone::Ok => "tone-ok",
            RiskTone::Neutral => "tone-neutral",
        }
    }
}

/// Confidence as a whole percentage
pub fn confidence_percent(confidence: f64) -> i64 {
    (confidence * 100.0).round() as i64
}

/// A recommended action row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionRow {
    pub text: String,
    pub emphasized: bool,
}

impl ActionRow {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            emphasized: text.starts_with(AI_ACTION_PREFIX),
        }
    }
}

/// Weather block contents
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherView {
    pub description: String,
    pub icon_url: Option<String>,
    pub temperature: Option<String>,
    pub humidity: Option<String>,
    pub wind_speed: Option<String>,
}

impl From<&WeatherSnapshot> for WeatherView {
    fn from(weather: &WeatherSnapshot) -> Self {
        Self {
            description: weather.description.clone(),
            icon_url: (!weather.icon.is_empty()).then(|| weather_icon_url(&weather.icon)),
            temperature: weather.temp.map(|t| format!("{:.1}°C", t)),
            humidity: weather.humidity.map(|h| format!("{:.0}%", h)),
            wind_speed: weather.wind_speed.map(|w| format!("{:.1} m/s", w)),
        }
    }
}

/// A zone row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneRow {
    pub zone_id: String,
    pub risk: RiskBadge,
    pub confidence: String,
}

impl From<&ZoneRisk> for ZoneRow {
    fn from(zone: &ZoneRisk) -> Self {
        Self {
            zone_id: zone.zone_id.clone(),
            risk: RiskBadge::for_level(&zone.risk),
            confidence: format!("{}%", confidence_percent(zone.confidence)),
        }
    }
}

/// Everything the result panel shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultView {
    pub risk: RiskBadge,
    pub confidence_percent: i64,
    pub confidence: String,
    pub trend: TrendChart,
    pub anomalies: Vec<String>,
    pub actions: Vec<ActionRow>,
    pub weather: Option<WeatherView>,
    /// Set exactly when `weather` is `None`
    pub weather_fallback: Option<String>,
    pub zones: Vec<ZoneRow>,
}

impl ResultView {
    pub fn from_result(result: &AnalysisResult) -> Self {
        let percent = confidence_percent(result.confidence);
        let weather = result.weather.as_ref().map(WeatherView::from);
        let weather_fallback = weather.is_none().then(|| WEATHER_UNAVAILABLE.to_string());

        Self {
            risk: RiskBadge::for_level(&result.risk_level),
            confidence_percent: percent,
            confidence: format!("{}%", percent),
            trend: TrendChart::new(
                result.trend_status.clone(),
                result.trend_data.clone(),
                result.health_average,
            ),
            anomalies: result.anomalies_detected.clone(),
            actions: result.recommended_actions.iter().map(|a| ActionRow::new(a)).collect(),
            weather,
            weather_fallback,
            zones: result.zones.iter().map(ZoneRow::from).collect(),
        }
    }
}
