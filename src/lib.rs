//! `Skycast` - Self-hosted weather and location dashboard
//!
//! This library provides the backend for a personal dashboard: account
//! management, location search, current weather, daily forecast
//! aggregation, air quality classification, and local news.

pub mod air_quality;
pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod forecast;
pub mod models;
pub mod providers;
pub mod store;
pub mod web;

// Re-export core types for public API
pub use air_quality::{AqiBucket, AqiClassification, classify};
pub use cache::Cache;
pub use config::SkycastConfig;
pub use error::SkycastError;
pub use forecast::{DailyForecast, aggregate};
pub use models::{AirQualityReading, CurrentConditions, ForecastSample, Location, NewsArticle};
pub use store::Store;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, SkycastError>;
