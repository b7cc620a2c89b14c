//! Handlers for the simulated device registry.

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/devices
///
/// List devices together with the active count and average latency.
pub async fn list_devices(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let listing = state.simulator.devices().await;
    Ok(Json(DataResponse { data: listing }))
}

/// POST /api/v1/devices
///
/// Create a new simulated device.
pub async fn add_device(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let device = state.simulator.add_device().await;
    Ok((StatusCode::CREATED, Json(DataResponse { data: device })))
}

/// DELETE /api/v1/devices/last
///
/// Remove the most recently added device. Returns `{"data": null}` when the
/// registry is already empty.
pub async fn remove_last_device(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let removed = state.simulator.remove_device().await;
    Ok(Json(DataResponse { data: removed }))
}

/// POST /api/v1/devices/{id}/ping
///
/// Write a "Pinged" line for the device into the telemetry log.
pub async fn ping_device(
    State(state): State<AppState>,
    device_id: Result<Path<String>, PathRejection>,
) -> AppResult<impl IntoResponse> {
    let Path(device_id) = device_id?;
    let entry = state.simulator.ping_device(&device_id).await?;
    Ok(Json(DataResponse { data: entry }))
}
