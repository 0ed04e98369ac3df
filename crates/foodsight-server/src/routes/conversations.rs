//! Conversation and message routes.
//!
//! Posting a user message also stores the assistant's answer to it.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use foodsight_core::Error;
use foodsight_store::{NewMessage, Role};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use super::error_response;
use crate::state::AppState;

type ApiResponse = (StatusCode, Json<Value>);

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/conversations",
            get(list_conversations).post(create_conversation),
        )
        .route(
            "/conversations/{id}",
            get(get_conversation).delete(delete_conversation),
        )
        .route(
            "/conversations/{id}/messages",
            get(list_messages).post(post_message),
        )
}

#[derive(Debug, Deserialize)]
struct CreateConversationRequest {
    title: String,
}

#[derive(Debug, Deserialize)]
struct PostMessageRequest {
    role: Role,
    content: String,
}

fn ok(status: StatusCode, value: impl serde::Serialize) -> ApiResponse {
    match serde_json::to_value(value) {
        Ok(value) => (status, Json(value)),
        Err(e) => error_response(e.into()),
    }
}

fn not_found(id: i64) -> ApiResponse {
    error_response(Error::NotFound(format!("conversation {}", id)))
}

/// GET /api/conversations: most recently active first.
async fn list_conversations(State(state): State<Arc<AppState>>) -> ApiResponse {
    match state.repo.get_conversations() {
        Ok(list) => ok(StatusCode::OK, list),
        Err(e) => error_response(e),
    }
}

/// POST /api/conversations
async fn create_conversation(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateConversationRequest>,
) -> ApiResponse {
    match state.repo.create_conversation(&req.title) {
        Ok(conversation) => {
            info!(id = conversation.id, "Conversation created");
            ok(StatusCode::CREATED, conversation)
        }
        Err(e) => error_response(e),
    }
}

async fn get_conversation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResponse {
    match state.repo.get_conversation(id) {
        Ok(Some(conversation)) => ok(StatusCode::OK, conversation),
        Ok(None) => not_found(id),
        Err(e) => error_response(e),
    }
}

async fn delete_conversation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResponse {
    match state.repo.delete_conversation(id) {
        Ok(true) => (StatusCode::OK, Json(json!({ "deleted": true, "id": id }))),
        Ok(false) => not_found(id),
        Err(e) => error_response(e),
    }
}

/// GET /api/conversations/{id}/messages: oldest first.
async fn list_messages(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> ApiResponse {
    match state.repo.get_messages(id) {
        Ok(messages) => ok(StatusCode::OK, messages),
        Err(e) => error_response(e),
    }
}

/// POST /api/conversations/{id}/messages
///
/// Stores the posted message. For a user message the insight engine answers
/// it and the answer is stored as an assistant message and returned as
/// `reply`.
async fn post_message(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<PostMessageRequest>,
) -> ApiResponse {
    let message = match state.repo.create_message(NewMessage {
        conversation_id: id,
        role: req.role,
        content: req.content,
    }) {
        Ok(message) => message,
        Err(e) => return error_response(e),
    };

    if message.role != Role::User {
        return ok(StatusCode::CREATED, json!({ "message": message, "reply": null }));
    }

    let insight = state.engine.get_business_insights(&message.content).await;
    info!(
        conversation = id,
        category = %insight.classification.category,
        source = ?insight.source,
        "Answered user message"
    );

    // The conversation may have been deleted while the answer was computed.
    match state.repo.create_message(NewMessage {
        conversation_id: id,
        role: Role::Assistant,
        content: insight.answer,
    }) {
        Ok(reply) => ok(
            StatusCode::CREATED,
            json!({ "message": message, "reply": reply }),
        ),
        Err(e) => error_response(e),
    }
}
