//! HTTP API consumed by the dashboard frontend
//!
//! Routes mirror what the frontend calls: account registration and
//! login, location search, current weather, daily forecast, air
//! quality, news, favorites, and search history. Every route except
//! register/login requires a bearer token.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::{
    Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post},
};
use chrono::{DateTime, NaiveDate, Utc};
use rand::RngExt;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::air_quality::{AqiClassification, classify};
use crate::auth::{self, AuthUser};
use crate::cache::Cache;
use crate::config::SkycastConfig;
use crate::error::SkycastError;
use crate::forecast::{DailyForecast, aggregate};
use crate::models::weather::friendly_condition;
use crate::models::{
    AirQualityReading, CurrentConditions, Location, NewsArticle, PollutantConcentrations,
};
use crate::providers::{self, GeocodingClient, NewsClient, WeatherClient};
use crate::store::{FavoriteRecord, HistoryRecord, Store};

/// Shared state for all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<SkycastConfig>,
    pub store: Store,
    pub cache: Cache,
    pub geocoding: Arc<GeocodingClient>,
    pub weather: Arc<WeatherClient>,
    pub news: Arc<NewsClient>,
}

impl AppState {
    /// Build the provider clients and wire up shared state.
    pub fn new(config: SkycastConfig, store: Store) -> Result<Self> {
        let http = providers::build_http_client(&config.providers)?;

        let geocoding = Arc::new(GeocodingClient::new(
            http.clone(),
            config.providers.geocoding_base_url.clone(),
        ));
        let weather = Arc::new(WeatherClient::new(
            http.clone(),
            config.providers.weather_base_url.clone(),
            config.providers.openweather_api_key.clone(),
        ));
        let news = Arc::new(NewsClient::new(
            http,
            config.providers.news_base_url.clone(),
            config.providers.news_api_key.clone(),
        ));

        let cache = store.cache();

        Ok(Self {
            config: Arc::new(config),
            store,
            cache,
            geocoding,
            weather,
            news,
        })
    }

    /// Cache TTL with jitter so entries don't all expire together.
    fn cache_ttl(&self) -> Duration {
        let jitter: f64 = rand::rng().random_range(0.9..1.1);
        let seconds = f64::from(self.config.cache.ttl_minutes) * 60.0 * jitter;
        Duration::from_secs(seconds as u64)
    }
}

/// Error response for the API layer: a status code plus a JSON body.
///
/// Application errors use a `message` key; provider passthrough errors
/// use an `error` key, matching what the frontend expects.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    key: &'static str,
    message: String,
}

impl ApiError {
    pub fn message(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            key: "message",
            message: message.into(),
        }
    }

    pub fn provider(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            key: "error",
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::message(StatusCode::UNAUTHORIZED, message)
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = serde_json::Map::new();
        body.insert(
            self.key.to_string(),
            serde_json::Value::String(self.message),
        );
        (self.status, Json(serde_json::Value::Object(body))).into_response()
    }
}

impl From<SkycastError> for ApiError {
    fn from(err: SkycastError) -> Self {
        match &err {
            SkycastError::Validation { message } => {
                Self::message(StatusCode::BAD_REQUEST, message.clone())
            }
            SkycastError::Auth { .. } => Self::unauthorized(err.user_message()),
            SkycastError::Api { message } | SkycastError::Config { message } => {
                Self::provider(StatusCode::INTERNAL_SERVER_ERROR, message.clone())
            }
            SkycastError::Store { .. } | SkycastError::Io { .. } => {
                Self::message(StatusCode::INTERNAL_SERVER_ERROR, err.user_message())
            }
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<SkycastError>() {
            Ok(known) => known.into(),
            Err(other) => {
                error!("Unhandled internal error: {other:#}");
                Self::message(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct CoordsQuery {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Deserialize)]
pub struct NewsQuery {
    pub location: String,
}

// The search response keeps the wire shape the frontend already consumes.
#[derive(Debug, Serialize)]
pub struct LocationSearchResponse {
    pub results: Vec<SearchResult>,
}

#[derive(Debug, Serialize)]
pub struct SearchResult {
    pub formatted_address: String,
    pub geometry: Geometry,
}

#[derive(Debug, Serialize)]
pub struct Geometry {
    pub location: GeoPoint,
}

#[derive(Debug, Serialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// One aggregated forecast day, ready for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastDayView {
    pub date: NaiveDate,
    /// Short weekday name, e.g. "Sat"
    pub weekday: String,
    pub temperature_c: f64,
    pub humidity_pct: u8,
    pub condition: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastView {
    pub city: String,
    pub days: Vec<ForecastDayView>,
}

#[derive(Debug, Serialize)]
pub struct AirQualityView {
    pub aqi: i64,
    pub classification: AqiClassification,
    pub components: PollutantConcentrations,
}

#[derive(Debug, Serialize)]
pub struct NewsView {
    pub articles: Vec<NewsArticle>,
}

#[derive(Debug, Deserialize)]
pub struct FavoriteRequest {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Serialize)]
pub struct FavoriteView {
    pub id: u64,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Serialize)]
pub struct HistoryView {
    pub query: String,
    /// RFC 3339 timestamp
    pub timestamp: String,
}

impl From<DailyForecast> for ForecastDayView {
    fn from(day: DailyForecast) -> Self {
        Self {
            date: day.date,
            weekday: day.date.format("%a").to_string(),
            temperature_c: day.sample.temperature_c,
            humidity_pct: day.sample.humidity_pct,
            description: friendly_condition(&day.sample.condition, &day.sample.description),
            condition: day.sample.condition,
        }
    }
}

impl From<FavoriteRecord> for FavoriteView {
    fn from(record: FavoriteRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            lat: record.latitude,
            lon: record.longitude,
        }
    }
}

impl From<HistoryRecord> for HistoryView {
    fn from(record: HistoryRecord) -> Self {
        let timestamp = DateTime::<Utc>::from_timestamp(record.timestamp, 0)
            .map(|dt| dt.to_rfc3339())
            .unwrap_or_default();
        Self {
            query: record.query,
            timestamp,
        }
    }
}

/// Build the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/location/search", get(search_location))
        .route("/location/reverse", get(reverse_location))
        .route("/weather", get(current_weather))
        .route("/forecast", get(forecast_daily))
        .route("/air-quality", get(air_quality))
        .route("/news", get(news))
        .route("/favorites", get(list_favorites).post(add_favorite))
        .route("/favorites/{id}", delete(remove_favorite))
        .route("/history", get(history))
        .with_state(state)
}

async fn register(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let email = payload.email.trim();
    if email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::message(
            StatusCode::BAD_REQUEST,
            "Email and password are required",
        ));
    }

    let password_hash = auth::hash_password(&payload.password)?;
    let user = state.store.create_user(email, &password_hash).await?;
    info!("Registered user {} ({})", user.id, user.email);

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User registered successfully".to_string(),
        }),
    ))
}

async fn login(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let user = state.store.find_user(payload.email.trim()).await?;

    let user = match user {
        Some(user) if auth::verify_password(&payload.password, &user.password_hash) => user,
        _ => {
            return Err(ApiError::message(
                StatusCode::UNAUTHORIZED,
                "Invalid credentials",
            ));
        }
    };

    let token = auth::issue_token(
        user.id,
        &state.config.auth.jwt_secret,
        state.config.auth.token_ttl_hours,
    )?;

    Ok(Json(TokenResponse {
        access_token: token,
    }))
}

async fn search_location(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<SearchQuery>,
) -> Result<Json<LocationSearchResponse>, ApiError> {
    // The query lands in history before geocoding, so failed searches
    // show up there too.
    state.store.record_search(user.user_id, &query.q).await?;

    match state.geocoding.search(&query.q).await? {
        Some(place) => Ok(Json(LocationSearchResponse {
            results: vec![SearchResult {
                geometry: Geometry {
                    location: GeoPoint {
                        lat: place.latitude,
                        lng: place.longitude,
                    },
                },
                formatted_address: place.name,
            }],
        })),
        None => Err(ApiError::provider(
            StatusCode::NOT_FOUND,
            "Location not found",
        )),
    }
}

async fn reverse_location(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(coords): Query<CoordsQuery>,
) -> Result<Json<LocationSearchResponse>, ApiError> {
    let place = state.geocoding.reverse(coords.lat, coords.lon).await?;

    Ok(Json(LocationSearchResponse {
        results: vec![SearchResult {
            geometry: Geometry {
                location: GeoPoint {
                    lat: place.latitude,
                    lng: place.longitude,
                },
            },
            formatted_address: place.name,
        }],
    }))
}

async fn current_weather(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(coords): Query<CoordsQuery>,
) -> Result<Json<CurrentConditions>, ApiError> {
    let key = Location::cache_key("weather", coords.lat, coords.lon);
    if let Some(cached) = state.cache.get::<CurrentConditions>(&key).await? {
        return Ok(Json(cached));
    }

    let conditions = state.weather.current_weather(coords.lat, coords.lon).await?;
    state
        .cache
        .put(&key, conditions.clone(), state.cache_ttl())
        .await?;

    Ok(Json(conditions))
}

async fn forecast_daily(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(coords): Query<CoordsQuery>,
) -> Result<Json<ForecastView>, ApiError> {
    let key = Location::cache_key("forecast", coords.lat, coords.lon);
    if let Some(cached) = state.cache.get::<ForecastView>(&key).await? {
        return Ok(Json(cached));
    }

    let forecast = state.weather.forecast(coords.lat, coords.lon).await?;
    let days = aggregate(&forecast.samples, &forecast.utc_offset);

    let view = ForecastView {
        city: forecast.city,
        days: days.into_iter().map(ForecastDayView::from).collect(),
    };
    state
        .cache
        .put(&key, view.clone(), state.cache_ttl())
        .await?;

    Ok(Json(view))
}

async fn air_quality(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(coords): Query<CoordsQuery>,
) -> Result<Json<AirQualityView>, ApiError> {
    let key = Location::cache_key("air-quality", coords.lat, coords.lon);
    let reading = match state.cache.get::<AirQualityReading>(&key).await? {
        Some(cached) => cached,
        None => {
            let reading = state.weather.air_quality(coords.lat, coords.lon).await?;
            state
                .cache
                .put(&key, reading.clone(), state.cache_ttl())
                .await?;
            reading
        }
    };

    Ok(Json(AirQualityView {
        aqi: reading.aqi,
        classification: classify(reading.aqi),
        components: reading.components,
    }))
}

async fn news(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<NewsQuery>,
) -> Result<Json<NewsView>, ApiError> {
    let key = format!("news:{}", query.location);
    if let Some(cached) = state.cache.get::<Vec<NewsArticle>>(&key).await? {
        return Ok(Json(NewsView { articles: cached }));
    }

    let articles = state.news.headlines(&query.location).await?;
    state
        .cache
        .put(&key, articles.clone(), state.cache_ttl())
        .await?;

    Ok(Json(NewsView { articles }))
}

async fn list_favorites(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<FavoriteView>>, ApiError> {
    let favorites = state.store.list_favorites(user.user_id).await?;
    Ok(Json(favorites.into_iter().map(FavoriteView::from).collect()))
}

async fn add_favorite(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<FavoriteRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(ApiError::message(
            StatusCode::BAD_REQUEST,
            "Favorite name is required",
        ));
    }

    state
        .store
        .add_favorite(user.user_id, name, payload.lat, payload.lon)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Favorite added".to_string(),
        }),
    ))
}

async fn remove_favorite(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<u64>,
) -> Result<Json<MessageResponse>, ApiError> {
    if state.store.remove_favorite(user.user_id, id).await? {
        Ok(Json(MessageResponse {
            message: "Favorite removed".to_string(),
        }))
    } else {
        Err(ApiError::message(
            StatusCode::NOT_FOUND,
            "Favorite not found",
        ))
    }
}

async fn history(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<HistoryView>>, ApiError> {
    let entries = state.store.search_history(user.user_id).await?;
    Ok(Json(entries.into_iter().map(HistoryView::from).collect()))
}
