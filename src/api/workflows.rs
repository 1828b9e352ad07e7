/// Workflow management REST API endpoints
///
/// Saved workflows are read and deleted by name. New workflows are built in the
/// draft: steps are appended one at a time, then the whole draft is saved under
/// a name. Loading a saved workflow copies its steps back into the draft.

use crate::{
    api::{ApiJson, AppState, HttpError},
    workflow::{StepView, Workflow, WorkflowStep},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Request body for appending a step to the draft
#[derive(Debug, Deserialize)]
pub struct AddStepRequest {
    pub assistants: Vec<String>,
    #[serde(default)]
    pub is_parallel: bool,
}

/// Request body for saving the draft
#[derive(Debug, Deserialize)]
pub struct SaveDraftRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Request body for loading a saved workflow into the draft
#[derive(Debug, Deserialize)]
pub struct LoadDraftRequest {
    pub name: String,
}

/// Draft contents: raw steps plus their display rows
#[derive(Debug, Serialize)]
pub struct DraftResponse {
    pub steps: Vec<WorkflowStep>,
    pub view: Vec<StepView>,
}

/// Create workflow and draft routes
pub fn create_workflow_routes() -> Router<AppState> {
    Router::new()
        .route("/api/workflows", get(list_workflows))
        .route("/api/workflows/{name}", get(get_workflow).delete(delete_workflow))
        .route("/api/draft", get(get_draft).delete(clear_draft))
        .route("/api/draft/steps", post(add_step))
        .route("/api/draft/save", post(save_draft))
        .route("/api/draft/load", post(load_draft))
}

/// List saved workflow names, sorted
///
/// GET /api/workflows
async fn list_workflows(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "workflows": state.session.list_workflows().await }))
}

/// GET /api/workflows/{name}
async fn get_workflow(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Workflow>, HttpError> {
    state
        .session
        .workflows()
        .read()
        .await
        .get(&name)
        .cloned()
        .map(Json)
        .ok_or_else(|| HttpError::new(StatusCode::NOT_FOUND, format!("workflow not found: {}", name)))
}

/// DELETE /api/workflows/{name}
async fn delete_workflow(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Value>, HttpError> {
    state.session.workflows().write().await.delete(&name)?;
    Ok(Json(json!({ "message": format!("Workflow '{}' deleted", name) })))
}

async fn draft_response(state: &AppState) -> DraftResponse {
    let assistants = state.session.assistants().read().await;
    let workflows = state.session.workflows().read().await;
    DraftResponse {
        steps: workflows.draft().to_vec(),
        view: workflows.render(&assistants),
    }
}

/// GET /api/draft
async fn get_draft(State(state): State<AppState>) -> Json<DraftResponse> {
    Json(draft_response(&state).await)
}

/// DELETE /api/draft
async fn clear_draft(State(state): State<AppState>) -> Json<DraftResponse> {
    state.session.workflows().write().await.clear_draft();
    Json(draft_response(&state).await)
}

/// Append a step to the draft
///
/// POST /api/draft/steps
/// Body: { "assistants": ["id", ...], "is_parallel": false }
async fn add_step(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<AddStepRequest>,
) -> Result<(StatusCode, Json<DraftResponse>), HttpError> {
    state
        .session
        .workflows()
        .write()
        .await
        .add_step(&payload.assistants, payload.is_parallel)?;

    Ok((StatusCode::CREATED, Json(draft_response(&state).await)))
}

/// Save the draft as a named workflow, replacing any workflow with that name
///
/// POST /api/draft/save
/// Body: { "name": "...", "description": "..." }
async fn save_draft(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<SaveDraftRequest>,
) -> Result<Json<Value>, HttpError> {
    let name = payload.name.trim().to_string();
    state
        .session
        .workflows()
        .write()
        .await
        .save_draft_as(&name, &payload.description)?;

    Ok(Json(json!({ "message": format!("Workflow '{}' saved", name) })))
}

/// POST /api/draft/load
async fn load_draft(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoadDraftRequest>,
) -> Result<Json<DraftResponse>, HttpError> {
    state.session.workflows().write().await.load_into_draft(payload.name.trim())?;
    Ok(Json(draft_response(&state).await))
}
