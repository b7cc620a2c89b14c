//! HTTP-level integration tests for the `/rules` endpoints.

mod common;

use axum::body::Body;
use axum::http::{Method, StatusCode};
use common::{body_json, build_test_app, delete, get, post_json, send, test_state};
use serde_json::json;

// ---------------------------------------------------------------------------
// Test: POST /rules creates a rule with defaults applied
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_rule_with_number_threshold() {
    let state = test_state(0);
    let response = post_json(
        build_test_app(state.clone()),
        "/api/v1/rules",
        json!({ "name": "hot", "condition": ">", "value": 30 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "hot");
    assert_eq!(json["data"]["condition"], ">");
    assert_eq!(json["data"]["threshold"], 30.0);

    let list = body_json(get(build_test_app(state), "/api/v1/rules").await).await;
    assert_eq!(list["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn empty_name_defaults_and_text_threshold_is_parsed() {
    let app = build_test_app(test_state(0));
    let response = post_json(
        app,
        "/api/v1/rules",
        json!({ "name": "", "condition": "<", "value": "25.5C" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "rule");
    assert_eq!(json["data"]["threshold"], 25.5);
}

#[tokio::test]
async fn non_numeric_threshold_is_accepted_as_nan() {
    let app = build_test_app(test_state(0));
    let response = post_json(
        app,
        "/api/v1/rules",
        json!({ "condition": "==", "value": "warm" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    // NaN has no JSON representation.
    assert!(json["data"]["threshold"].is_null());
}

// ---------------------------------------------------------------------------
// Test: unknown operators are rejected
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_condition_returns_400() {
    let app = build_test_app(test_state(0));
    let response = post_json(
        app,
        "/api/v1/rules",
        json!({ "name": "x", "condition": ">=", "value": 1 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

// ---------------------------------------------------------------------------
// Test: DELETE /rules/{index}
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_rule_by_index() {
    let state = test_state(0);
    for name in ["a", "b", "c"] {
        post_json(
            build_test_app(state.clone()),
            "/api/v1/rules",
            json!({ "name": name, "condition": ">", "value": 1 }),
        )
        .await;
    }

    let response = delete(build_test_app(state.clone()), "/api/v1/rules/1").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["name"], "b");

    let list = body_json(get(build_test_app(state), "/api/v1/rules").await).await;
    let names: Vec<&str> = list["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["a", "c"]);
}

#[tokio::test]
async fn delete_rule_out_of_range_returns_404() {
    let app = build_test_app(test_state(0));
    let response = delete(app, "/api/v1/rules/0").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: a matching rule logs an alert on the next tick
// ---------------------------------------------------------------------------

#[tokio::test]
async fn matching_rule_fires_on_tick() {
    let state = test_state(2);
    post_json(
        build_test_app(state.clone()),
        "/api/v1/rules",
        json!({ "name": "always", "condition": ">", "value": 0 }),
    )
    .await;

    let outcome = state.simulator.tick().await.expect("devices are seeded");
    assert_eq!(outcome.alerts.len(), 1);

    let log = body_json(get(build_test_app(state), "/api/v1/telemetry/log").await).await;
    let entries = log["data"].as_array().unwrap();
    assert_eq!(entries[0]["kind"], "alert");
    assert_eq!(
        entries[0]["message"],
        format!("⚠ Rule always triggered on {}", outcome.reading.device_id)
    );
    assert_eq!(entries[1]["kind"], "telemetry");
}

// ---------------------------------------------------------------------------
// Test: extractor failures use the JSON error envelope
// ---------------------------------------------------------------------------

#[tokio::test]
async fn malformed_json_returns_400_envelope() {
    let app = build_test_app(test_state(0));
    let response = send(
        app,
        Method::POST,
        "/api/v1/rules",
        Body::from("{\"condition\": \">\", "),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn missing_condition_returns_400_envelope() {
    let state = test_state(0);
    let response = post_json(
        build_test_app(state.clone()),
        "/api/v1/rules",
        json!({ "name": "no-op", "value": 3 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert!(json["error"].as_str().unwrap().contains("condition"));

    let list = body_json(get(build_test_app(state), "/api/v1/rules").await).await;
    assert!(list["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn non_numeric_rule_index_returns_400_envelope() {
    let app = build_test_app(test_state(0));
    let response = delete(app, "/api/v1/rules/first").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn long_threshold_text_is_accepted() {
    let app = build_test_app(test_state(0));
    let value = format!("{}{}", "1".repeat(50_000), "-".repeat(50_000));
    let response = post_json(
        app,
        "/api/v1/rules",
        json!({ "name": "huge", "condition": "<", "value": value }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // Infinity has no JSON representation.
    let json = body_json(response).await;
    assert!(json["data"]["threshold"].is_null());
}
