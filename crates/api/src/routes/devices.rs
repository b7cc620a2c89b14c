//! Route definitions for the device registry.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::devices;
use crate::state::AppState;

/// Device routes mounted at `/devices`.
///
/// ```text
/// GET    /             -> list_devices
/// POST   /             -> add_device
/// DELETE /last         -> remove_last_device
/// POST   /{id}/ping    -> ping_device
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(devices::list_devices).post(devices::add_device))
        .route("/last", delete(devices::remove_last_device))
        .route("/{id}/ping", post(devices::ping_device))
}
