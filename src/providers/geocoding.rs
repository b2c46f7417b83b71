//! Nominatim (OpenStreetMap) geocoding client
//!
//! Free-form search and reverse lookup. Nominatim requires an
//! identifying user agent, which the shared HTTP client sets.

use anyhow::{Context, Result};
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::SkycastError;
use crate::models::Location;

/// Raw search result; Nominatim returns coordinates as strings
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    display_name: String,
    lat: String,
    lon: String,
}

#[derive(Debug, Deserialize)]
struct NominatimReverse {
    display_name: Option<String>,
}

impl TryFrom<NominatimPlace> for Location {
    type Error = anyhow::Error;

    fn try_from(place: NominatimPlace) -> Result<Self> {
        let latitude = place
            .lat
            .parse::<f64>()
            .with_context(|| format!("Invalid latitude from geocoder: {}", place.lat))?;
        let longitude = place
            .lon
            .parse::<f64>()
            .with_context(|| format!("Invalid longitude from geocoder: {}", place.lon))?;

        Ok(Location::new(latitude, longitude, place.display_name))
    }
}

/// Client for the Nominatim search and reverse endpoints
pub struct GeocodingClient {
    http: ClientWithMiddleware,
    base_url: String,
}

impl GeocodingClient {
    #[must_use]
    pub fn new(http: ClientWithMiddleware, base_url: String) -> Self {
        Self { http, base_url }
    }

    /// Search for a place by free-form query, returning the best match.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<Option<Location>> {
        let url = format!(
            "{}/search?q={}&format=json&limit=1",
            self.base_url,
            urlencoding::encode(query)
        );

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| "Failed to reach the geocoding endpoint")?;

        let status = response.status();
        if !status.is_success() {
            return Err(SkycastError::api(format!(
                "Geocoding request failed with status {status}"
            ))
            .into());
        }

        let places: Vec<NominatimPlace> = response
            .json()
            .await
            .with_context(|| "Failed to parse the geocoding response")?;

        match places.into_iter().next() {
            Some(place) => {
                let location = Location::try_from(place)?;
                debug!(
                    "Geocoded '{}' to {} ({})",
                    query,
                    location.name,
                    location.format_coordinates()
                );
                Ok(Some(location))
            }
            None => {
                warn!("No geocoding results for '{}'", query);
                Ok(None)
            }
        }
    }

    /// Resolve coordinates to a display name. Falls back to the raw
    /// coordinates when the geocoder has no name for them.
    #[instrument(skip(self))]
    pub async fn reverse(&self, latitude: f64, longitude: f64) -> Result<Location> {
        let url = format!(
            "{}/reverse?lat={latitude}&lon={longitude}&format=json",
            self.base_url
        );

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| "Failed to reach the reverse geocoding endpoint")?;

        let status = response.status();
        if !status.is_success() {
            return Err(SkycastError::api(format!(
                "Reverse geocoding request failed with status {status}"
            ))
            .into());
        }

        let place: NominatimReverse = response
            .json()
            .await
            .with_context(|| "Failed to parse the reverse geocoding response")?;

        let mut location = Location::new(latitude, longitude, String::new());
        location.name = place
            .display_name
            .unwrap_or_else(|| location.format_coordinates());

        Ok(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_response_parses_string_coordinates() {
        let payload = r#"[
            {
                "display_name": "Interlaken, Bern, Switzerland",
                "lat": "46.6863",
                "lon": "7.8632",
                "class": "place",
                "type": "town"
            }
        ]"#;

        let places: Vec<NominatimPlace> = serde_json::from_str(payload).unwrap();
        let location = Location::try_from(places.into_iter().next().unwrap()).unwrap();

        assert_eq!(location.name, "Interlaken, Bern, Switzerland");
        assert_eq!(location.latitude, 46.6863);
        assert_eq!(location.longitude, 7.8632);
    }

    #[test]
    fn test_malformed_coordinates_rejected() {
        let place = NominatimPlace {
            display_name: "Nowhere".to_string(),
            lat: "not-a-number".to_string(),
            lon: "7.8632".to_string(),
        };

        assert!(Location::try_from(place).is_err());
    }

    #[test]
    fn test_reverse_response_without_name() {
        let payload = r#"{"error": "Unable to geocode"}"#;
        let place: NominatimReverse = serde_json::from_str(payload).unwrap();
        assert!(place.display_name.is_none());
    }
}
