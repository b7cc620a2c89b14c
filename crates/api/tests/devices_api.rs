//! HTTP-level integration tests for the `/devices` and `/metrics` endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, delete, get, post, test_state};

// ---------------------------------------------------------------------------
// Test: seeded devices are listed with metrics
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_devices_returns_seeded_devices_and_metrics() {
    let app = build_test_app(test_state(3));
    let response = get(app, "/api/v1/devices").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let devices = json["data"]["devices"].as_array().expect("devices array");
    assert_eq!(devices.len(), 3);
    assert_eq!(devices[0]["name"], "Sensor 1");
    assert_eq!(devices[2]["name"], "Sensor 3");
    assert!(devices
        .iter()
        .all(|d| d["id"].as_str().unwrap().starts_with("dev-")));
    assert!(devices.iter().all(|d| d["status"] == "online"));

    let latencies: Vec<u64> = devices
        .iter()
        .map(|d| d["latency_ms"].as_u64().unwrap())
        .collect();
    let expected = (latencies.iter().sum::<u64>() as f64 / 3.0).round() as u64;
    assert_eq!(json["data"]["metrics"]["active_devices"], 3);
    assert_eq!(json["data"]["metrics"]["avg_latency_ms"], expected);
}

// ---------------------------------------------------------------------------
// Test: adding N then removing N empties the registry
// ---------------------------------------------------------------------------

#[tokio::test]
async fn add_then_remove_returns_registry_to_empty() {
    let state = test_state(0);

    for i in 1..=4 {
        let response = post(build_test_app(state.clone()), "/api/v1/devices").await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        assert_eq!(json["data"]["name"], format!("Sensor {i}"));
    }

    for _ in 0..4 {
        let response = delete(build_test_app(state.clone()), "/api/v1/devices/last").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_json(response).await["data"].is_object());
    }

    let json = body_json(get(build_test_app(state), "/api/v1/metrics").await).await;
    assert_eq!(json["data"]["active_devices"], 0);
    assert_eq!(json["data"]["avg_latency_ms"], 0);
}

// ---------------------------------------------------------------------------
// Test: removing from an empty registry is a no-op
// ---------------------------------------------------------------------------

#[tokio::test]
async fn remove_on_empty_registry_returns_null() {
    let app = build_test_app(test_state(0));
    let response = delete(app, "/api/v1/devices/last").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["data"].is_null());
}

// ---------------------------------------------------------------------------
// Test: ping logs a line for known devices and 404s otherwise
// ---------------------------------------------------------------------------

#[tokio::test]
async fn ping_known_device_writes_log_line() {
    let state = test_state(1);
    let id = state.simulator.devices().await.devices[0].id.clone();

    let response = post(
        build_test_app(state.clone()),
        &format!("/api/v1/devices/{id}/ping"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["kind"], "ping");
    assert_eq!(json["data"]["message"], format!("Pinged {id}"));

    let log = body_json(get(build_test_app(state), "/api/v1/telemetry/log").await).await;
    assert_eq!(log["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn ping_unknown_device_returns_404() {
    let app = build_test_app(test_state(1));
    let response = post(app, "/api/v1/devices/dev-nothere/ping").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}
