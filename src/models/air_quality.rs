//! Air quality data models

use serde::{Deserialize, Serialize};

/// Pollutant concentrations in µg/m³, passed through from the provider
/// untouched for display
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PollutantConcentrations {
    /// Fine particulate matter (diameter < 2.5 µm)
    pub pm2_5: f64,
    /// Coarse particulate matter (diameter < 10 µm)
    pub pm10: f64,
    /// Nitrogen dioxide
    pub no2: f64,
    /// Ozone
    pub o3: f64,
    /// Carbon monoxide
    pub co: f64,
}

/// One air quality observation from the provider
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AirQualityReading {
    /// Provider-normalized air quality index (1..=5, open-ended upward)
    pub aqi: i64,
    /// Pollutant concentrations for display
    pub components: PollutantConcentrations,
}
