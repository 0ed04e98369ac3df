//! What-if simulation over the fixture dataset.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use foodsight_insights::{simulate, ScenarioInput};
use serde_json::Value;

use super::error_response;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/scenarios/simulate", post(simulate_scenario))
}

/// POST /api/scenarios/simulate
async fn simulate_scenario(
    State(state): State<Arc<AppState>>,
    Json(input): Json<ScenarioInput>,
) -> (StatusCode, Json<Value>) {
    let result = simulate(&state.dataset, &input)
        .and_then(|result| serde_json::to_value(result).map_err(Into::into));
    match result {
        Ok(value) => (StatusCode::OK, Json(value)),
        Err(e) => error_response(e),
    }
}
