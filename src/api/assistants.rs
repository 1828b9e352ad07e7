/// Assistant management REST API endpoints
///
/// CRUD over the assistant store plus the "Name (Role)" labels used to fill
/// choice widgets. Every mutation rewrites the assistant config file.

use crate::{
    api::{ApiJson, AppState, HttpError},
    assistant::{Assistant, AssistantUpdate},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

/// Request body for assistant creation
#[derive(Debug, Deserialize)]
pub struct CreateAssistantRequest {
    pub name: String,
    pub role: String,
    pub prompt: String,
}

pub fn create_assistant_routes() -> Router<AppState> {
    Router::new()
        .route("/api/assistants", get(list_assistants).post(create_assistant))
        .route("/api/assistants/choices", get(assistant_choices))
        .route(
            "/api/assistants/{id}",
            get(get_assistant).put(update_assistant).delete(delete_assistant),
        )
}

/// GET /api/assistants
async fn list_assistants(State(state): State<AppState>) -> Json<Value> {
    let assistants = state.session.list_assistants().await;
    Json(json!({ "assistants": assistants }))
}

/// GET /api/assistants/choices
async fn assistant_choices(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "choices": state.session.assistant_choices().await }))
}

/// Create a new assistant
///
/// POST /api/assistants
/// Body: { "name": "...", "role": "...", "prompt": "..." }
async fn create_assistant(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateAssistantRequest>,
) -> Result<(StatusCode, Json<Assistant>), HttpError> {
    if payload.role.trim().is_empty() || payload.prompt.trim().is_empty() {
        return Err(HttpError::bad_request("name, role and prompt are all required"));
    }

    let assistant = state
        .session
        .assistants()
        .write()
        .await
        .add(&payload.name, &payload.role, &payload.prompt)?;

    Ok((StatusCode::CREATED, Json(assistant)))
}

/// GET /api/assistants/{id}
async fn get_assistant(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Assistant>, HttpError> {
    state
        .session
        .assistants()
        .read()
        .await
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| HttpError::new(StatusCode::NOT_FOUND, format!("assistant not found: {}", id)))
}

/// Update an assistant's name, role or prompt
///
/// PUT /api/assistants/{id}
/// Body: any subset of { "name", "role", "prompt" }; other fields are rejected
async fn update_assistant(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(update): ApiJson<AssistantUpdate>,
) -> Result<Json<Assistant>, HttpError> {
    let updated = state.session.assistants().write().await.update(&id, update)?;
    Ok(Json(updated))
}

/// DELETE /api/assistants/{id}
async fn delete_assistant(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, HttpError> {
    state.session.assistants().write().await.delete(&id)?;
    Ok(Json(json!({ "message": format!("Assistant '{}' deleted", id) })))
}
