//! Server-rendered pages.
//!
//! Templates live in `templates/` and are compiled in by askama, which
//! escapes every interpolated value unless marked `safe`.

use agriguard_core::render::ResultView;
use agriguard_core::tiles::{base_map, weather_overlays, MapView, TileLayer};
use askama::Template;
use chrono::{Datelike, Utc};
use serde::Serialize;

#[derive(Template)]
#[template(path = "landing.html")]
pub struct LandingTemplate {
    pub year: i32,
}

impl LandingTemplate {
    pub fn current() -> Self {
        Self { year: Utc::now().year() }
    }
}

/// Links on the landing page that have no page behind them yet
#[derive(Template)]
#[template(path = "unavailable.html")]
pub struct UnavailableTemplate {
    pub page: &'static str,
    pub year: i32,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub default_crop: String,
    pub overlay_names: Vec<String>,
    /// Map setup handed to the page script as JSON
    pub map_config_json: String,
    pub year: i32,
}

#[derive(Serialize)]
struct MapConfig<'a> {
    view: MapView,
    base: TileLayer,
    overlays: &'a [TileLayer],
}

impl DashboardTemplate {
    pub fn new(default_crop: &str, weather_api_key: Option<&str>) -> Self {
        let overlays = weather_overlays(weather_api_key);
        let config = MapConfig {
            view: MapView::default(),
            base: base_map(),
            overlays: &overlays,
        };

        Self {
            default_crop: default_crop.to_string(),
            overlay_names: overlays.iter().map(|layer| layer.name.clone()).collect(),
            map_config_json: script_json(&config),
            year: Utc::now().year(),
        }
    }
}

/// The result panel, inserted into the dashboard after an analysis
#[derive(Template)]
#[template(path = "result.html")]
pub struct ResultTemplate {
    pub view: ResultView,
    pub place_label: Option<String>,
}

/// JSON that is safe to embed in a `<script>` element
fn script_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string()).replace("</", "<\\/")
}
