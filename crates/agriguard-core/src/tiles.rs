//! Map tile sources for the dashboard map

use serde::Serialize;

/// Value shipped in sample configs in place of a real OpenWeatherMap key
pub const WEATHER_KEY_PLACEHOLDER: &str = "your_api_key_here";

const OSM_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
const OSM_ATTRIBUTION: &str = "&copy; OpenStreetMap contributors";
const OWM_TILE_BASE: &str = "https://tile.openweathermap.org/map";
const OWM_ATTRIBUTION: &str = "Weather data &copy; OpenWeatherMap";
const OWM_ICON_BASE: &str = "https://openweathermap.org/img/wn";

/// A raster tile layer in Leaflet's URL template form
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileLayer {
    pub name: String,
    pub url_template: String,
    pub attribution: String,
    pub opacity: f32,
}

/// OpenWeatherMap overlay layers offered on the map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherLayer {
    Precipitation,
    Clouds,
    Temperature,
}

impl WeatherLayer {
    pub const ALL: [WeatherLayer; 3] =
        [WeatherLayer::Precipitation, WeatherLayer::Clouds, WeatherLayer::Temperature];

    /// Layer identifier in the tile URL
    pub fn slug(&self) -> &'static str {
        match self {
            WeatherLayer::Precipitation => "precipitation_new",
            WeatherLayer::Clouds => "clouds_new",
            WeatherLayer::Temperature => "temp_new",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WeatherLayer::Precipitation => "Precipitation",
            WeatherLayer::Clouds => "Clouds",
            WeatherLayer::Temperature => "Temperature",
        }
    }
}

/// Initial map view
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapView {
    /// `[lat, lon]`
    pub center: [f64; 2],
    pub zoom: u8,
}

impl Default for MapView {
    fn default() -> Self {
        // Sri Lanka
        Self { center: [7.8731, 80.7718], zoom: 8 }
    }
}

/// OpenStreetMap base layer
pub fn base_map() -> TileLayer {
    TileLayer {
        name: "OpenStreetMap".to_string(),
        url_template: OSM_TILE_URL.to_string(),
        attribution: OSM_ATTRIBUTION.to_string(),
        opacity: 1.0,
    }
}

/// Returns the key only if it is set and not the placeholder
pub fn usable_api_key(key: Option<&str>) -> Option<&str> {
    key.map(str::trim).filter(|k| !k.is_empty() && *k != WEATHER_KEY_PLACEHOLDER)
}

/// Weather overlays, or none at all without a usable key
pub fn weather_overlays(api_key: Option<&str>) -> Vec<TileLayer> {
    let Some(key) = usable_api_key(api_key) else {
        return Vec::new();
    };

    WeatherLayer::ALL
        .iter()
        .map(|layer| TileLayer {
            name: layer.label().to_string(),
            url_template: format!(
                "{}/{}/{{z}}/{{x}}/{{y}}.png?appid={}",
                OWM_TILE_BASE,
                layer.slug(),
                key
            ),
            attribution: OWM_ATTRIBUTION.to_string(),
            opacity: 0.6,
        })
        .collect()
}

/// URL of a weather condition icon
pub fn weather_icon_url(icon: &str) -> String {
    format!("{}/{}@2x.png", OWM_ICON_BASE, icon)
}
