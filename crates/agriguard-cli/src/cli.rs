use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// AgriGuard - Crop stress analysis for drawn field boundaries
#[derive(Parser, Debug)]
#[command(name = "agriguard")]
#[command(about = "Crop stress analysis for field boundaries", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to ./agriguard.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Prediction endpoint URL
    #[arg(long, global = true, value_name = "URL")]
    pub predict_url: Option<String>,

    /// Reverse geocoding service base URL
    #[arg(long, global = true, value_name = "URL")]
    pub geocoder_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the centroid and ring diagnostics of a boundary
    Centroid(CentroidArgs),

    /// Look up the place name at a location
    Geocode(GeocodeArgs),

    /// Submit a boundary for crop stress analysis
    Analyze(AnalyzeArgs),

    /// Render a saved prediction response
    Render(RenderArgs),

    /// Show the effective configuration and where each value comes from
    Config,
}

#[derive(Parser, Debug)]
pub struct CentroidArgs {
    /// GeoJSON file with a Polygon geometry or Feature
    pub path: PathBuf,
}

#[derive(Parser, Debug)]
pub struct GeocodeArgs {
    /// Latitude in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,

    /// Longitude in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lon: f64,
}

#[derive(Parser, Debug)]
pub struct AnalyzeArgs {
    /// GeoJSON file with a Polygon geometry or Feature
    pub path: PathBuf,

    /// Crop grown in the field (defaults to the configured crop)
    #[arg(long)]
    pub crop: Option<String>,

    /// Planting date, e.g. 2025-01-15
    #[arg(long, value_name = "DATE")]
    pub planting_date: Option<String>,

    /// Interactive mode - prompt for crop and planting date
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(Parser, Debug)]
pub struct RenderArgs {
    /// JSON file holding a prediction response
    pub path: PathBuf,
}
