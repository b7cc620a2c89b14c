//! Route definitions for the telemetry log and sparkline.

use axum::routing::get;
use axum::Router;

use crate::handlers::telemetry;
use crate::state::AppState;

/// Telemetry routes mounted at `/telemetry`.
///
/// ```text
/// GET    /log         -> get_log
/// DELETE /log         -> clear_log
/// GET    /sparkline   -> get_sparkline
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/log", get(telemetry::get_log).delete(telemetry::clear_log))
        .route("/sparkline", get(telemetry::get_sparkline))
}
