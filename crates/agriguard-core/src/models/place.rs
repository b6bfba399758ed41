use serde::{Deserialize, Serialize};

use crate::labels::short_place_label;

/// Result of a reverse-geocoding lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReverseGeocode {
    pub display_name: String,
}

impl ReverseGeocode {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self { display_name: display_name.into() }
    }

    /// Shortened label for display
    pub fn label(&self) -> String {
        short_place_label(&self.display_name)
    }
}
