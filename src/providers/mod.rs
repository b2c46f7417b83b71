//! Clients for the third-party data providers
//!
//! All clients share the same reqwest stack: JSON responses, a
//! per-request timeout, an identifying user agent, and transient-error
//! retries with exponential backoff.

use anyhow::{Context, Result};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use std::time::Duration;

use crate::config::ProvidersConfig;

pub mod geocoding;
pub mod news;
pub mod weather;

pub use geocoding::GeocodingClient;
pub use news::NewsClient;
pub use weather::{LocationForecast, WeatherClient};

const USER_AGENT: &str = concat!("Skycast/", env!("CARGO_PKG_VERSION"));

/// Build the shared HTTP client used by every provider.
pub fn build_http_client(config: &ProvidersConfig) -> Result<ClientWithMiddleware> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds.into()))
        .user_agent(USER_AGENT)
        .build()
        .with_context(|| "Failed to create HTTP client")?;

    let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.max_retries);

    Ok(ClientBuilder::new(client)
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build())
}
