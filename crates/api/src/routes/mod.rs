pub mod devices;
pub mod health;
pub mod rules;
pub mod stream;
pub mod telemetry;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws                          WebSocket event stream
///
/// /dashboard                   full snapshot (GET)
/// /metrics                     device count + average latency (GET)
///
/// /devices                     list, add (GET, POST)
/// /devices/last                remove most recent device (DELETE)
/// /devices/{id}/ping           ping device (POST)
///
/// /rules                       list, create (GET, POST)
/// /rules/{index}               delete (DELETE)
///
/// /stream                      status (GET)
/// /stream/start                start ticking (POST)
/// /stream/stop                 stop ticking (POST)
///
/// /telemetry/log               list, clear (GET, DELETE)
/// /telemetry/sparkline         points (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .route("/dashboard", get(handlers::dashboard::get_dashboard))
        .route("/metrics", get(handlers::telemetry::get_metrics))
        .nest("/devices", devices::router())
        .nest("/rules", rules::router())
        .nest("/stream", stream::router())
        .nest("/telemetry", telemetry::router())
}
