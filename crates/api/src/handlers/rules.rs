//! Handlers for threshold rules.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use sensorhub_core::error::CoreError;
use sensorhub_core::rule::{parse_threshold, Comparison, Rule};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Threshold as submitted by a client: a JSON number or free text.
///
/// Text is parsed leniently; unparseable input becomes NaN and the rule
/// simply never fires.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ThresholdInput {
    Number(f64),
    Text(String),
}

impl ThresholdInput {
    pub fn to_threshold(&self) -> f64 {
        match self {
            ThresholdInput::Number(n) => *n,
            ThresholdInput::Text(s) => parse_threshold(s),
        }
    }
}

/// Body of `POST /api/v1/rules`.
#[derive(Debug, Deserialize)]
pub struct CreateRule {
    #[serde(default)]
    pub name: Option<String>,
    /// One of `>`, `<`, `==`.
    pub condition: String,
    #[serde(default)]
    pub value: Option<ThresholdInput>,
}

/// GET /api/v1/rules
pub async fn list_rules(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let rules = state.simulator.rules().await;
    Ok(Json(DataResponse { data: rules }))
}

/// POST /api/v1/rules
///
/// Append a rule. An empty or missing name becomes `"rule"`; a missing
/// value becomes NaN.
pub async fn create_rule(
    State(state): State<AppState>,
    payload: Result<Json<CreateRule>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;
    let condition: Comparison = input.condition.parse()?;
    let threshold = input
        .value
        .as_ref()
        .map_or(f64::NAN, ThresholdInput::to_threshold);
    let rule = Rule::new(input.name.unwrap_or_default(), condition, threshold)?;

    state.simulator.add_rule(rule.clone()).await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: rule })))
}

/// DELETE /api/v1/rules/{index}
///
/// Delete the rule at the given list position.
pub async fn delete_rule(
    State(state): State<AppState>,
    index: Result<Path<usize>, PathRejection>,
) -> AppResult<impl IntoResponse> {
    let Path(index) = index?;
    let removed = state
        .simulator
        .remove_rule(index)
        .await
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Rule",
                id: index.to_string(),
            })
        })?;

    Ok(Json(DataResponse { data: removed }))
}
