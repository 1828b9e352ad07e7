/// HTTP API Layer
///
/// This module exposes the chat session over REST endpoints. It handles:
/// - Assistant CRUD and choice lists
/// - Saved workflows and the editable draft
/// - Backend initialization, message submission and conversation export

// Assistant management endpoints
pub mod assistants;

// Saved workflow and draft endpoints
pub mod workflows;

// Session initialization and chat endpoints
pub mod chat;

use crate::{error::StoreError, session::ChatSession};
use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    Router,
};
use serde_json::json;
use std::sync::Arc;

// Re-export router builders
pub use assistants::create_assistant_routes;
pub use chat::create_chat_routes;
pub use workflows::create_workflow_routes;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    /// Stores, engine and transcript for the single session
    pub session: Arc<ChatSession>,
}

/// Error response carrying a short status string
///
/// Serialized as `{ "error": "..." }`.
#[derive(Debug)]
pub struct HttpError {
    pub status: StatusCode,
    pub message: String,
}

impl HttpError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl From<StoreError> for HttpError {
    fn from(err: StoreError) -> Self {
        let status = match &err {
            StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
            StoreError::DuplicateId(_) => StatusCode::CONFLICT,
            StoreError::EmptySelection | StoreError::EmptyName | StoreError::EmptyDraft => {
                StatusCode::BAD_REQUEST
            }
            StoreError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.to_string())
    }
}

impl From<JsonRejection> for HttpError {
    fn from(rejection: JsonRejection) -> Self {
        // Bodies that parse but do not fit the request type are validation failures
        let status = match &rejection {
            JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => StatusCode::BAD_REQUEST,
            other => other.status(),
        };
        Self::new(status, rejection.body_text())
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// JSON request body whose rejections use the `{ "error": "..." }` shape
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// All API routes, ready to receive the application state
pub fn create_api_routes() -> Router<AppState> {
    Router::new()
        .merge(create_assistant_routes())
        .merge(create_workflow_routes())
        .merge(create_chat_routes())
}
