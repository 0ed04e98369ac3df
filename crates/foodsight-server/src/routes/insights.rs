//! Direct access to the insight engine, outside any conversation.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use foodsight_insights::{is_spanish, Classification, InsightAnswer};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/insights", post(ask))
        .route("/insights/classify", post(classify))
}

#[derive(Debug, Deserialize)]
struct QuestionRequest {
    question: String,
}

#[derive(Debug, Serialize)]
struct ClassifyResponse {
    #[serde(flatten)]
    classification: Classification,
    spanish: bool,
}

/// POST /api/insights: always answers, even without an LLM.
async fn ask(
    State(state): State<Arc<AppState>>,
    Json(req): Json<QuestionRequest>,
) -> Json<InsightAnswer> {
    Json(state.engine.get_business_insights(&req.question).await)
}

/// POST /api/insights/classify
async fn classify(
    State(state): State<Arc<AppState>>,
    Json(req): Json<QuestionRequest>,
) -> Json<ClassifyResponse> {
    Json(ClassifyResponse {
        classification: state.engine.classify(&req.question),
        spanish: is_spanish(&req.question),
    })
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{call, state};
    use axum::http::StatusCode;
    use foodsight_chat::fallback::CONFIG_APOLOGY_EN;
    use serde_json::json;

    #[tokio::test]
    async fn test_template_answer() {
        let (_dir, state) = state();
        let (status, body) = call(
            &state,
            "POST",
            "/api/insights",
            Some(json!({ "question": "Which clients have overdue payments?" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["source"], "template");
        assert_eq!(body["classification"]["type"], "OVERDUE_CLIENTS");
        assert!(body["answer"].as_str().unwrap().contains("$306,700"));
    }

    #[tokio::test]
    async fn test_spanish_overview() {
        let (_dir, state) = state();
        let (_, body) = call(
            &state,
            "POST",
            "/api/insights",
            Some(json!({ "question": "¿Cómo van las ventas?" })),
        )
        .await;
        assert_eq!(body["source"], "overview");
        assert!(body["answer"]
            .as_str()
            .unwrap()
            .contains("Análisis exhaustivo"));
    }

    #[tokio::test]
    async fn test_open_question_without_llm_apologises() {
        let (_dir, state) = state();
        let (status, body) = call(
            &state,
            "POST",
            "/api/insights",
            Some(json!({ "question": "Tell me a joke about llamas" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["source"], "llm");
        assert_eq!(body["answer"], CONFIG_APOLOGY_EN);
    }

    #[tokio::test]
    async fn test_classify_reports_language() {
        let (_dir, state) = state();
        let (status, body) = call(
            &state,
            "POST",
            "/api/insights/classify",
            Some(json!({ "question": "¿Qué productos tienen faltantes de inventario?" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["spanish"], true);
        assert!(body["type"].is_string());
        assert!(body["confidence"].is_number());
    }
}
