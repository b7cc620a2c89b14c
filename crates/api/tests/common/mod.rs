#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use chrono::Utc;
use http_body_util::BodyExt;
use rand::rngs::StdRng;
use rand::SeedableRng;
use sensorhub_api::config::ServerConfig;
use sensorhub_api::router::build_app_router;
use sensorhub_api::simulator::Simulator;
use sensorhub_api::state::AppState;
use sensorhub_core::dashboard::Dashboard;
use sensorhub_events::EventBus;
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default).
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        ..ServerConfig::default()
    }
}

/// Build application state around a deterministic dashboard with
/// `devices` seeded devices.
pub fn test_state(devices: usize) -> AppState {
    let config = test_config();
    let bus = Arc::new(EventBus::default());
    let mut rng = StdRng::seed_from_u64(2024);
    let dashboard = Dashboard::seeded(&mut rng, Utc::now(), devices, config.log_capacity);
    AppState::new(config, Simulator::with_rng(dashboard, rng, bus))
}

/// Build the full application router with all middleware layers.
///
/// This uses the same builder as `main.rs` so integration tests exercise
/// the production middleware stack.
pub fn build_test_app(state: AppState) -> Router {
    let config = test_config();
    build_app_router(state, &config)
}

pub async fn send(app: Router, method: Method, uri: &str, body: Body) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body)
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, Body::empty()).await
}

pub async fn post(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::POST, uri, Body::empty()).await
}

pub async fn post_json(app: Router, uri: &str, json: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Body::from(json.to_string())).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Body::empty()).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
