//! Handlers for the telemetry stream state machine.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct StreamStatus {
    pub running: bool,
    /// Whether the request changed the stream state.
    pub changed: bool,
    pub tick_interval_ms: u64,
}

fn status(state: &AppState, running: bool, changed: bool) -> Json<DataResponse<StreamStatus>> {
    Json(DataResponse {
        data: StreamStatus {
            running,
            changed,
            tick_interval_ms: state.stream.period().as_millis() as u64,
        },
    })
}

/// GET /api/v1/stream
pub async fn get_stream(State(state): State<AppState>) -> Json<DataResponse<StreamStatus>> {
    let running = state.stream.is_running().await;
    status(&state, running, false)
}

/// POST /api/v1/stream/start
///
/// Start ticking; a no-op when already running.
pub async fn start_stream(State(state): State<AppState>) -> Json<DataResponse<StreamStatus>> {
    let changed = state.stream.start().await;
    if changed {
        tracing::info!("Telemetry stream start requested");
    }
    status(&state, true, changed)
}

/// POST /api/v1/stream/stop
///
/// Cancel the pending tick; a no-op when already stopped.
pub async fn stop_stream(State(state): State<AppState>) -> Json<DataResponse<StreamStatus>> {
    let changed = state.stream.stop().await;
    if changed {
        tracing::info!("Telemetry stream stopped");
    }
    status(&state, false, changed)
}
