use axum::extract::State;
use axum::Json;
use sensorhub_core::dashboard::DashboardSnapshot;

use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/dashboard
///
/// Full dashboard state: devices, metrics, rules, log and sparkline.
pub async fn get_dashboard(State(state): State<AppState>) -> Json<DataResponse<DashboardSnapshot>> {
    Json(DataResponse {
        data: state.simulator.snapshot().await,
    })
}
