//! Location model for geographic coordinates and metadata

use serde::{Deserialize, Serialize};

/// A resolved place with coordinates and a display name
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Location {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Display name (formatted address from the geocoder)
    pub name: String,
}

impl Location {
    /// Create a new location
    #[must_use]
    pub fn new(latitude: f64, longitude: f64, name: String) -> Self {
        Self {
            latitude,
            longitude,
            name,
        }
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }

    /// Round coordinates for cache key generation
    #[must_use]
    pub fn rounded_coordinates(precision: u32, latitude: f64, longitude: f64) -> (f64, f64) {
        let multiplier = 10_f64.powi(i32::try_from(precision).unwrap_or(4));
        let lat = (latitude * multiplier).round() / multiplier;
        let lon = (longitude * multiplier).round() / multiplier;
        (lat, lon)
    }

    /// Generate a provider cache key for the given coordinates.
    ///
    /// Coordinates are rounded to two decimal places (roughly 1 km) so
    /// nearby lookups share a cache entry.
    #[must_use]
    pub fn cache_key(kind: &str, latitude: f64, longitude: f64) -> String {
        let (lat, lon) = Self::rounded_coordinates(2, latitude, longitude);
        format!("{kind}:{lat:.2}:{lon:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key() {
        let key = Location::cache_key("weather", 46.8182, 8.2275);
        assert_eq!(key, "weather:46.82:8.23");
    }

    #[test]
    fn test_rounded_coordinates() {
        let (lat, lon) = Location::rounded_coordinates(2, 46.818_234, 8.227_456);
        assert_eq!(lat, 46.82);
        assert_eq!(lon, 8.23);
    }

    #[test]
    fn test_format_coordinates() {
        let location = Location::new(46.8182, 8.2275, "Interlaken".to_string());
        assert_eq!(location.format_coordinates(), "46.8182, 8.2275");
    }
}
