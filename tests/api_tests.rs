//! Router-level tests for accounts, favorites, and search history
//!
//! These exercise the API without touching the network: only routes
//! backed by the embedded store are driven end to end.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use skycast::api::{self, AppState};
use skycast::{SkycastConfig, Store};
use tempfile::TempDir;
use tower::ServiceExt;

fn test_app(dir: &TempDir) -> Router {
    let mut config = SkycastConfig::default();
    config.providers.openweather_api_key = "test-owm-key".to_string();
    config.auth.jwt_secret = "integration-test-secret-0123456789".to_string();
    config.store.location = dir.path().to_string_lossy().into_owned();

    let store = Store::open(dir.path()).unwrap();
    let state = AppState::new(config, store).unwrap();
    api::router(state)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn register_and_login(app: &Router, email: &str) -> String {
    let credentials = json!({"email": email, "password": "hunter2"});

    let (status, _) = send(app, "POST", "/register", None, Some(credentials.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(app, "POST", "/login", None, Some(credentials)).await;
    assert_eq!(status, StatusCode::OK);
    body["access_token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_register_and_login_flow() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let token = register_and_login(&app, "ada@example.com").await;
    assert!(!token.is_empty());
}

#[tokio::test]
async fn test_register_requires_email_and_password() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let (status, body) = send(
        &app,
        "POST",
        "/register",
        None,
        Some(json!({"email": "", "password": ""})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email and password are required");
}

#[tokio::test]
async fn test_duplicate_registration_rejected() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let credentials = json!({"email": "ada@example.com", "password": "hunter2"});
    let (status, _) = send(&app, "POST", "/register", None, Some(credentials.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, "POST", "/register", None, Some(credentials)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email already registered");
}

#[tokio::test]
async fn test_login_with_wrong_password_rejected() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    register_and_login(&app, "ada@example.com").await;

    let (status, body) = send(
        &app,
        "POST",
        "/login",
        None,
        Some(json!({"email": "ada@example.com", "password": "wrong"})),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid credentials");
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    for uri in ["/favorites", "/history", "/weather?lat=46.8&lon=8.2"] {
        let (status, _) = send(&app, "GET", uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "expected 401 for {uri}");
    }
}

#[tokio::test]
async fn test_garbage_token_rejected() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let (status, _) = send(&app, "GET", "/favorites", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_favorites_lifecycle() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);
    let token = register_and_login(&app, "ada@example.com").await;

    let (status, body) = send(&app, "GET", "/favorites", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 0);

    let favorite = json!({"name": "Interlaken", "lat": 46.6863, "lon": 7.8632});
    let (status, body) = send(&app, "POST", "/favorites", Some(&token), Some(favorite)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Favorite added");

    let (status, body) = send(&app, "GET", "/favorites", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let favorites = body.as_array().unwrap();
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0]["name"], "Interlaken");
    let id = favorites[0]["id"].as_u64().unwrap();

    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/favorites/{id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Favorite removed");

    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/favorites/{id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Favorite not found");
}

#[tokio::test]
async fn test_favorites_are_scoped_per_user() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let ada = register_and_login(&app, "ada@example.com").await;
    let ben = register_and_login(&app, "ben@example.com").await;

    let favorite = json!({"name": "Annecy", "lat": 45.8992, "lon": 6.1294});
    let (status, _) = send(&app, "POST", "/favorites", Some(&ada), Some(favorite)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = send(&app, "GET", "/favorites", Some(&ben), None).await;
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_history_starts_empty() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);
    let token = register_and_login(&app, "ada@example.com").await;

    let (status, body) = send(&app, "GET", "/history", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 0);
}
