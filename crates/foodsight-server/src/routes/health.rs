//! Liveness and dataset snapshot.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use super::error_response;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health))
        .route("/dataset", get(get_dataset))
}

/// GET /api/health
async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "foodsight",
        "version": env!("CARGO_PKG_VERSION"),
        "company": state.dataset.company,
        "store": state.repo.backend(),
        "llmAvailable": state.llm_config.read().is_configured(),
    }))
}

/// GET /api/dataset: the fixture snapshot answers are computed from.
async fn get_dataset(State(state): State<Arc<AppState>>) -> (StatusCode, Json<serde_json::Value>) {
    match serde_json::to_value(state.dataset.as_ref()) {
        Ok(value) => (StatusCode::OK, Json(value)),
        Err(e) => error_response(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{call, state};
    use super::*;

    #[tokio::test]
    async fn test_health() {
        let (_dir, state) = state();
        let (status, body) = call(&state, "GET", "/api/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["store"], "memory");
        assert_eq!(body["llmAvailable"], false);
    }

    #[tokio::test]
    async fn test_dataset_snapshot() {
        let (_dir, state) = state();
        let (status, body) = call(&state, "GET", "/api/dataset", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["company"], "Alimentos del Valle");
        assert_eq!(
            body["products"].as_array().unwrap().len(),
            state.dataset.products.len()
        );
    }
}
