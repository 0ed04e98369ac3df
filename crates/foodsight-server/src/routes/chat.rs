//! LLM provider status and configuration.
//! API keys are write-only: responses report whether a key is set, never the key.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use foodsight_chat::providers;
use foodsight_chat::types::*;
use serde_json::{json, Value};
use tracing::warn;

use super::error_response;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/chat/status", get(get_status))
        .route("/chat/config", get(get_config).put(update_config))
        .route("/chat/config/test", post(test_key))
}

// ---------------------------------------------------------------
// Status
// ---------------------------------------------------------------

async fn get_status(State(state): State<Arc<AppState>>) -> Json<ChatStatus> {
    let config = state.llm_config.read();
    let resolved = config.resolve_provider();
    Json(ChatStatus {
        llm_available: resolved.is_some(),
        llm_provider: resolved.as_ref().map(|r| r.provider.to_string()),
        default_model: resolved.map(|r| r.model),
        available_models: config.available_models(),
    })
}

// ---------------------------------------------------------------
// Config
// ---------------------------------------------------------------

async fn get_config(State(state): State<Arc<AppState>>) -> Json<LLMConfigResponse> {
    Json(state.llm_config.read().to_response())
}

async fn update_config(
    State(state): State<Arc<AppState>>,
    Json(update): Json<LLMConfigUpdate>,
) -> (StatusCode, Json<Value>) {
    // The live config only changes once the update is on disk.
    let mut config = state.llm_config.write();
    let mut updated = config.clone();
    updated.apply_update(&update);

    if let Err(e) = updated.save() {
        return error_response(e);
    }
    *config = updated;

    match serde_json::to_value(config.to_response()) {
        Ok(value) => (StatusCode::OK, Json(value)),
        Err(e) => error_response(e.into()),
    }
}

async fn test_key(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TestKeyRequest>,
) -> (StatusCode, Json<Value>) {
    let Some(provider) = LLMProvider::parse(&req.provider) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "success": false,
                "error": format!("Unknown provider: {}", req.provider),
            })),
        );
    };

    match providers::test_api_key(&state.http, provider, &req.api_key).await {
        Ok(()) => (StatusCode::OK, Json(json!({ "success": true }))),
        Err(e) => {
            warn!(%provider, "API key test failed: {}", e);
            (
                StatusCode::OK,
                Json(json!({ "success": false, "error": e.to_string() })),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{call, state};
    use super::*;

    #[tokio::test]
    async fn test_status_without_keys() {
        let (_dir, state) = state();
        let (status, body) = call(&state, "GET", "/api/chat/status", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["llmAvailable"], false);
        assert!(body["llmProvider"].is_null());
        assert_eq!(body["availableModels"], json!([]));
    }

    #[tokio::test]
    async fn test_update_config_persists_and_masks_key() {
        let (_dir, state) = state();
        let (status, body) = call(
            &state,
            "PUT",
            "/api/chat/config",
            Some(json!({ "preferredProvider": "groq", "groqApiKey": "gsk-secret" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["groqConfigured"], true);
        assert_eq!(body["activeProvider"], "groq");
        assert!(!body.to_string().contains("gsk-secret"));

        let saved =
            std::fs::read_to_string(&state.config.data_paths.llm_config_file).unwrap();
        assert!(saved.contains("gsk-secret"));

        // The engine's fallback shares the same config handle.
        assert!(state.engine.fallback().is_configured());

        let (_, status_body) = call(&state, "GET", "/api/chat/status", None).await;
        assert_eq!(status_body["llmAvailable"], true);
        assert_eq!(status_body["llmProvider"], "groq");
    }

    #[tokio::test]
    async fn test_failed_save_leaves_live_config_untouched() {
        let (dir, state) = state();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();
        state.llm_config.write().config_path = blocker.join("llm-config.json");

        let (status, body) = call(
            &state,
            "PUT",
            "/api/chat/config",
            Some(json!({ "preferredProvider": "groq", "groqApiKey": "gsk-unsaved" })),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].is_string());

        assert!(!state.engine.fallback().is_configured());
        let (_, config) = call(&state, "GET", "/api/chat/config", None).await;
        assert_eq!(config["groqConfigured"], false);
        assert_eq!(config["preferredProvider"], "auto");
    }

    #[tokio::test]
    async fn test_unknown_provider_is_rejected() {
        let (_dir, state) = state();
        let (status, body) = call(
            &state,
            "POST",
            "/api/chat/config/test",
            Some(json!({ "provider": "mystery", "apiKey": "k" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }
}
