//! Data models shared across providers, core logic, and the API layer

pub mod air_quality;
pub mod location;
pub mod news;
pub mod weather;

pub use air_quality::{AirQualityReading, PollutantConcentrations};
pub use location::Location;
pub use news::NewsArticle;
pub use weather::{CurrentConditions, ForecastSample};
