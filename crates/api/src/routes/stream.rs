//! Route definitions for the telemetry stream.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::stream;
use crate::state::AppState;

/// Stream routes mounted at `/stream`.
///
/// ```text
/// GET  /        -> get_stream
/// POST /start   -> start_stream
/// POST /stop    -> stop_stream
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(stream::get_stream))
        .route("/start", post(stream::start_stream))
        .route("/stop", post(stream::stop_stream))
}
