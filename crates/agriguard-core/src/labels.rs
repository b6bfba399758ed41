//! Place labels derived from reverse-geocoding display names

/// Separator used by Nominatim between address components
const COMPONENT_SEPARATOR: &str = ", ";

/// Names with more components than this are shortened
const MAX_FULL_COMPONENTS: usize = 3;

/// Shorten a reverse-geocoding display name for the dashboard header.
///
/// Names with more than three components keep only the first and the last
/// (usually the locality and the country).
pub fn short_place_label(display_name: &str) -> String {
    let parts: Vec<&str> = display_name.split(COMPONENT_SEPARATOR).collect();

    if parts.len() > MAX_FULL_COMPONENTS {
        format!("{}{}{}", parts[0], COMPONENT_SEPARATOR, parts[parts.len() - 1])
    } else {
        display_name.to_string()
    }
}
