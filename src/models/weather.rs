//! Weather data models and display helpers

use serde::{Deserialize, Serialize};

/// One discrete weather prediction at a fixed future timestamp,
/// typically spaced 3 hours apart
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ForecastSample {
    /// Prediction time as seconds since the Unix epoch (UTC)
    pub timestamp_utc: i64,
    /// Temperature in Celsius
    pub temperature_c: f64,
    /// Relative humidity percentage (0-100)
    pub humidity_pct: u8,
    /// Weather category reported by the provider (e.g. "Clear", "Rain")
    pub condition: String,
    /// Longer provider description (e.g. "light intensity drizzle")
    pub description: String,
}

/// Current conditions at a location
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CurrentConditions {
    /// Place name reported by the weather provider
    pub name: String,
    /// Temperature in Celsius
    pub temperature_c: f64,
    /// Relative humidity percentage (0-100)
    pub humidity_pct: u8,
    /// Wind speed in m/s
    pub wind_speed_ms: f64,
    /// Weather category reported by the provider
    pub condition: String,
    /// Friendly display description derived from the category
    pub description: String,
}

/// Map a provider weather category to a friendly display label.
///
/// Unrecognized categories fall back to the provider's own description.
#[must_use]
pub fn friendly_condition(condition: &str, description: &str) -> String {
    match condition {
        "Clear" => "Sunny".to_string(),
        "Clouds" => "Cloudy".to_string(),
        "Rain" => "Rainy".to_string(),
        "Drizzle" => "Light Rain".to_string(),
        "Thunderstorm" => "Stormy".to_string(),
        "Snow" => "Snowy".to_string(),
        "Mist" => "Misty".to_string(),
        "Fog" => "Foggy".to_string(),
        "Haze" => "Hazy".to_string(),
        _ => description.to_string(),
    }
}
