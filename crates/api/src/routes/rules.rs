//! Route definitions for threshold rules.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::rules;
use crate::state::AppState;

/// Rule routes mounted at `/rules`.
///
/// ```text
/// GET    /          -> list_rules
/// POST   /          -> create_rule
/// DELETE /{index}   -> delete_rule
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(rules::list_rules).post(rules::create_rule))
        .route("/{index}", delete(rules::delete_rule))
}
