/// Session and chat REST API endpoints
///
/// Backend initialization, model choices, message submission through a saved
/// workflow, and the conversation history operations.

use crate::{
    api::{ApiJson, AppState, HttpError},
    session::SubmitReply,
};
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

/// Request body for backend initialization
#[derive(Debug, Deserialize)]
pub struct InitializeRequest {
    pub api_key: String,
    #[serde(default)]
    pub api_base: Option<String>,
}

/// Request body for message submission
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub message: String,
    #[serde(default)]
    pub workflow: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

pub fn create_chat_routes() -> Router<AppState> {
    Router::new()
        .route("/api/session/initialize", post(initialize))
        .route("/api/models", get(list_models))
        .route("/api/chat", post(submit_message).delete(clear_conversation))
        .route("/api/chat/history", get(conversation_history))
        .route("/api/chat/export", post(export_conversation))
}

/// Configure the completion backend
///
/// POST /api/session/initialize
/// Body: { "api_key": "...", "api_base": "https://..." }
async fn initialize(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<InitializeRequest>,
) -> Result<Json<Value>, HttpError> {
    state
        .session
        .initialize(&payload.api_key, payload.api_base.as_deref())
        .map_err(|e| HttpError::bad_request(format!("Initialization failed: {}", e)))?;

    Ok(Json(json!({ "status": "System initialized successfully" })))
}

/// GET /api/models
async fn list_models(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "models": state.session.models(),
        "default": state.session.settings().default_model,
    }))
}

/// Run a message through a saved workflow
///
/// POST /api/chat
/// Body: { "message": "...", "workflow": "name", "model": "..." }
///
/// Workflow failures are part of the conversation: they come back as a normal
/// reply whose `error` field is set and whose transcript records the failure.
async fn submit_message(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<SubmitRequest>,
) -> Json<SubmitReply> {
    let reply = state
        .session
        .submit(&payload.message, payload.workflow.as_deref(), payload.model.as_deref())
        .await;
    Json(reply)
}

/// DELETE /api/chat
async fn clear_conversation(State(state): State<AppState>) -> Json<Value> {
    state.session.clear_conversation().await;
    Json(json!({ "message": "Conversation cleared" }))
}

/// GET /api/chat/history
async fn conversation_history(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "history": state.session.formatted_history().await }))
}

/// Write the conversation history to a timestamped text file
///
/// POST /api/chat/export
async fn export_conversation(State(state): State<AppState>) -> Result<Json<Value>, HttpError> {
    let path = state.session.export_conversation().await.map_err(|e| {
        tracing::error!("❌ Failed to export conversation: {:#}", e);
        HttpError::new(StatusCode::INTERNAL_SERVER_ERROR, format!("Export failed: {}", e))
    })?;

    Ok(Json(json!({ "path": path.display().to_string() })))
}
