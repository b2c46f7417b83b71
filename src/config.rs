//! Configuration management for the `Skycast` service
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::SkycastError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the `Skycast` service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkycastConfig {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Third-party data provider configuration
    pub providers: ProvidersConfig,
    /// Account and token configuration
    pub auth: AuthConfig,
    /// Persistent store configuration
    pub store: StoreConfig,
    /// Provider response cache configuration
    pub cache: CacheConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port to listen on
    #[serde(default = "default_server_port")]
    pub port: u16,
    /// Directory with the built frontend assets
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

/// Third-party data provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    /// OpenWeatherMap API key (weather, forecast, air quality)
    #[serde(default)]
    pub openweather_api_key: String,
    /// NewsAPI key; the news endpoint reports an error when unset
    pub news_api_key: Option<String>,
    /// Base URL for the weather API
    #[serde(default = "default_weather_base_url")]
    pub weather_base_url: String,
    /// Base URL for the geocoding API
    #[serde(default = "default_geocoding_base_url")]
    pub geocoding_base_url: String,
    /// Base URL for the news API
    #[serde(default = "default_news_base_url")]
    pub news_base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_provider_timeout")]
    pub timeout_seconds: u32,
    /// Maximum number of retries for failed requests
    #[serde(default = "default_provider_max_retries")]
    pub max_retries: u32,
}

/// Account and token settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret used to sign access tokens
    #[serde(default)]
    pub jwt_secret: String,
    /// Access token lifetime in hours
    #[serde(default = "default_token_ttl")]
    pub token_ttl_hours: u32,
}

/// Persistent store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store directory location
    #[serde(default = "default_store_location")]
    pub location: String,
}

/// Provider response cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache TTL in minutes
    #[serde(default = "default_cache_ttl")]
    pub ttl_minutes: u32,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions
fn default_server_port() -> u16 {
    3000
}

fn default_static_dir() -> String {
    "frontend/dist".to_string()
}

fn default_weather_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_geocoding_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_news_base_url() -> String {
    "https://newsapi.org/v2".to_string()
}

fn default_provider_timeout() -> u32 {
    30
}

fn default_provider_max_retries() -> u32 {
    3
}

fn default_token_ttl() -> u32 {
    24
}

fn default_store_location() -> String {
    dirs::data_dir()
        .map(|dir| dir.join("skycast").to_string_lossy().into_owned())
        .unwrap_or_else(|| "./skycast_data".to_string())
}

fn default_cache_ttl() -> u32 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for SkycastConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                port: default_server_port(),
                static_dir: default_static_dir(),
            },
            providers: ProvidersConfig {
                openweather_api_key: String::new(),
                news_api_key: None,
                weather_base_url: default_weather_base_url(),
                geocoding_base_url: default_geocoding_base_url(),
                news_base_url: default_news_base_url(),
                timeout_seconds: default_provider_timeout(),
                max_retries: default_provider_max_retries(),
            },
            auth: AuthConfig {
                jwt_secret: String::new(),
                token_ttl_hours: default_token_ttl(),
            },
            store: StoreConfig {
                location: default_store_location(),
            },
            cache: CacheConfig {
                ttl_minutes: default_cache_ttl(),
            },
            logging: LoggingConfig {
                level: default_log_level(),
            },
        }
    }
}

impl SkycastConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment variable overrides with SKYCAST_ prefix,
        // e.g. SKYCAST_PROVIDERS__OPENWEATHER_API_KEY
        builder = builder.add_source(
            Environment::with_prefix("SKYCAST")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let config: SkycastConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("skycast").join("config.toml"))
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_secrets()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate API keys and signing secrets
    fn validate_secrets(&self) -> Result<()> {
        if self.providers.openweather_api_key.is_empty() {
            return Err(SkycastError::config(
                "OpenWeatherMap API key must be set (providers.openweather_api_key)",
            )
            .into());
        }

        if self.auth.jwt_secret.len() < 16 {
            return Err(SkycastError::config(
                "Token signing secret must be at least 16 characters (auth.jwt_secret)",
            )
            .into());
        }

        if let Some(news_key) = &self.providers.news_api_key {
            if news_key.is_empty() {
                return Err(SkycastError::config(
                    "News API key cannot be empty if provided. Either remove it or provide a valid key.",
                )
                .into());
            }
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.providers.timeout_seconds == 0 || self.providers.timeout_seconds > 300 {
            return Err(SkycastError::config(
                "Provider timeout must be between 1 and 300 seconds",
            )
            .into());
        }

        if self.providers.max_retries > 10 {
            return Err(SkycastError::config("Provider max retries cannot exceed 10").into());
        }

        if self.cache.ttl_minutes == 0 || self.cache.ttl_minutes > 24 * 60 {
            return Err(
                SkycastError::config("Cache TTL must be between 1 minute and 24 hours").into(),
            );
        }

        if self.auth.token_ttl_hours == 0 || self.auth.token_ttl_hours > 24 * 30 {
            return Err(
                SkycastError::config("Token lifetime must be between 1 hour and 30 days").into(),
            );
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(SkycastError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        for (name, url) in [
            ("weather", &self.providers.weather_base_url),
            ("geocoding", &self.providers.geocoding_base_url),
            ("news", &self.providers.news_base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(SkycastError::config(format!(
                    "The {name} base URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }
}
