//! OpenWeatherMap client: current weather, 5-day forecast, air pollution

use anyhow::{Context, Result};
use chrono::{FixedOffset, Offset, Utc};
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::SkycastError;
use crate::models::weather::friendly_condition;
use crate::models::{AirQualityReading, CurrentConditions, ForecastSample, PollutantConcentrations};

/// Client for the OpenWeatherMap v2.5 endpoints
pub struct WeatherClient {
    http: ClientWithMiddleware,
    base_url: String,
    api_key: String,
}

/// The 3-hourly forecast for one location, with the UTC offset the
/// provider reports for it
#[derive(Debug, Clone)]
pub struct LocationForecast {
    /// City name reported by the provider
    pub city: String,
    /// Local UTC offset of the forecast location
    pub utc_offset: FixedOffset,
    /// Time-ordered 3-hourly samples
    pub samples: Vec<ForecastSample>,
}

#[derive(Debug, Deserialize)]
struct ConditionInfo {
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct MainReadings {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct WindInfo {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct CurrentWeatherResponse {
    name: String,
    main: MainReadings,
    wind: WindInfo,
    weather: Vec<ConditionInfo>,
}

#[derive(Debug, Deserialize)]
struct ForecastEntry {
    dt: i64,
    main: MainReadings,
    weather: Vec<ConditionInfo>,
}

#[derive(Debug, Deserialize)]
struct CityInfo {
    name: String,
    /// Shift from UTC in seconds
    timezone: i32,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    list: Vec<ForecastEntry>,
    city: CityInfo,
}

#[derive(Debug, Deserialize)]
struct AqiIndex {
    aqi: i64,
}

#[derive(Debug, Deserialize)]
struct AirQualityEntry {
    main: AqiIndex,
    components: PollutantConcentrations,
}

#[derive(Debug, Deserialize)]
struct AirPollutionResponse {
    list: Vec<AirQualityEntry>,
}

fn primary_condition(conditions: &[ConditionInfo]) -> (String, String) {
    conditions
        .first()
        .map(|c| (c.main.clone(), c.description.clone()))
        .unwrap_or_default()
}

impl From<CurrentWeatherResponse> for CurrentConditions {
    fn from(response: CurrentWeatherResponse) -> Self {
        let (condition, description) = primary_condition(&response.weather);
        let description = friendly_condition(&condition, &description);
        Self {
            name: response.name,
            temperature_c: response.main.temp,
            humidity_pct: response.main.humidity,
            wind_speed_ms: response.wind.speed,
            condition,
            description,
        }
    }
}

impl From<ForecastResponse> for LocationForecast {
    fn from(response: ForecastResponse) -> Self {
        let utc_offset =
            FixedOffset::east_opt(response.city.timezone).unwrap_or_else(|| Utc.fix());

        let samples = response
            .list
            .into_iter()
            .map(|entry| {
                let (condition, description) = primary_condition(&entry.weather);
                ForecastSample {
                    timestamp_utc: entry.dt,
                    temperature_c: entry.main.temp,
                    humidity_pct: entry.main.humidity,
                    condition,
                    description,
                }
            })
            .collect();

        Self {
            city: response.city.name,
            utc_offset,
            samples,
        }
    }
}

impl WeatherClient {
    #[must_use]
    pub fn new(http: ClientWithMiddleware, base_url: String, api_key: String) -> Self {
        Self {
            http,
            base_url,
            api_key,
        }
    }

    /// Current conditions at the given coordinates, in metric units.
    #[instrument(skip(self))]
    pub async fn current_weather(&self, latitude: f64, longitude: f64) -> Result<CurrentConditions> {
        let url = format!(
            "{}/weather?lat={latitude}&lon={longitude}&appid={}&units=metric",
            self.base_url, self.api_key
        );

        let response: CurrentWeatherResponse = self.fetch_json(&url, "current weather").await?;
        Ok(response.into())
    }

    /// The 3-hourly 5-day forecast at the given coordinates.
    #[instrument(skip(self))]
    pub async fn forecast(&self, latitude: f64, longitude: f64) -> Result<LocationForecast> {
        let url = format!(
            "{}/forecast?lat={latitude}&lon={longitude}&appid={}&units=metric",
            self.base_url, self.api_key
        );

        let response: ForecastResponse = self.fetch_json(&url, "forecast").await?;
        let forecast = LocationForecast::from(response);
        debug!(
            "Retrieved {} forecast samples for {}",
            forecast.samples.len(),
            forecast.city
        );
        Ok(forecast)
    }

    /// The latest air quality observation at the given coordinates.
    #[instrument(skip(self))]
    pub async fn air_quality(&self, latitude: f64, longitude: f64) -> Result<AirQualityReading> {
        let url = format!(
            "{}/air_pollution?lat={latitude}&lon={longitude}&appid={}",
            self.base_url, self.api_key
        );

        let response: AirPollutionResponse = self.fetch_json(&url, "air quality").await?;
        let entry = response
            .list
            .into_iter()
            .next()
            .ok_or_else(|| SkycastError::api("No air quality data for this location"))?;

        Ok(AirQualityReading {
            aqi: entry.main.aqi,
            components: entry.components,
        })
    }

    async fn fetch_json<T: serde::de::DeserializeOwned>(&self, url: &str, what: &str) -> Result<T> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to reach the {what} endpoint"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SkycastError::api(format!(
                "The {what} request failed with status {status}"
            ))
            .into());
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse the {what} response"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_weather_conversion() {
        let payload = r#"{
            "name": "Interlaken",
            "main": {"temp": 18.3, "humidity": 62, "pressure": 1015},
            "wind": {"speed": 3.6, "deg": 220},
            "weather": [{"id": 800, "main": "Clear", "description": "clear sky"}]
        }"#;

        let response: CurrentWeatherResponse = serde_json::from_str(payload).unwrap();
        let conditions = CurrentConditions::from(response);

        assert_eq!(conditions.name, "Interlaken");
        assert_eq!(conditions.temperature_c, 18.3);
        assert_eq!(conditions.humidity_pct, 62);
        assert_eq!(conditions.wind_speed_ms, 3.6);
        assert_eq!(conditions.condition, "Clear");
        assert_eq!(conditions.description, "Sunny");
    }

    #[test]
    fn test_forecast_conversion_carries_city_offset() {
        let payload = r#"{
            "list": [
                {
                    "dt": 1750000000,
                    "main": {"temp": 21.0, "humidity": 55},
                    "weather": [{"main": "Rain", "description": "light rain"}]
                },
                {
                    "dt": 1750010800,
                    "main": {"temp": 23.5, "humidity": 48},
                    "weather": []
                }
            ],
            "city": {"name": "Interlaken", "timezone": 7200}
        }"#;

        let response: ForecastResponse = serde_json::from_str(payload).unwrap();
        let forecast = LocationForecast::from(response);

        assert_eq!(forecast.city, "Interlaken");
        assert_eq!(forecast.utc_offset.local_minus_utc(), 7200);
        assert_eq!(forecast.samples.len(), 2);
        assert_eq!(forecast.samples[0].condition, "Rain");
        assert_eq!(forecast.samples[0].description, "light rain");
        // Missing condition list degrades to empty strings, not an error.
        assert_eq!(forecast.samples[1].condition, "");
    }

    #[test]
    fn test_air_pollution_response_parses() {
        let payload = r#"{
            "list": [
                {
                    "main": {"aqi": 3},
                    "components": {
                        "co": 201.9, "no": 0.02, "no2": 0.77,
                        "o3": 68.7, "so2": 0.64,
                        "pm2_5": 12.5, "pm10": 15.2, "nh3": 0.12
                    }
                }
            ]
        }"#;

        let response: AirPollutionResponse = serde_json::from_str(payload).unwrap();
        let entry = &response.list[0];

        assert_eq!(entry.main.aqi, 3);
        assert_eq!(entry.components.pm2_5, 12.5);
        assert_eq!(entry.components.co, 201.9);
    }
}
