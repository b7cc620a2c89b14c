//! Handlers for the telemetry log, sparkline and headline metrics.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/telemetry/log
///
/// Log entries, newest first.
pub async fn get_log(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let entries = state.simulator.log().await;
    Ok(Json(DataResponse { data: entries }))
}

/// DELETE /api/v1/telemetry/log
pub async fn clear_log(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    state.simulator.clear_log().await;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/telemetry/sparkline
///
/// The retained temperature points plus their normalized form.
pub async fn get_sparkline(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let sparkline = state.simulator.sparkline().await;
    Ok(Json(DataResponse { data: sparkline }))
}

/// GET /api/v1/metrics
///
/// Active device count and rounded average latency.
pub async fn get_metrics(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let metrics = state.simulator.metrics().await;
    Ok(Json(DataResponse { data: metrics }))
}
