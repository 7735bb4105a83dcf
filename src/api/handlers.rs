//! HTTP request handlers

use super::sse::sse_stream;
use super::types::{ChatRequest, ErrorResponse, ModelInfo};
use super::AppState;
use crate::runtime::SessionSnapshot;
use crate::state_machine::TransitionError;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Session view
        .route("/api/session", get(get_session))
        // SSE streaming
        .route("/api/session/stream", get(stream_session))
        // User actions
        .route("/api/session/start", post(start_session))
        .route("/api/session/chat", post(send_chat))
        .route("/api/session/finalize", post(finalize_session))
        // Model info
        .route("/api/model", get(get_model))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Session View
// ============================================================

async fn get_session(State(state): State<AppState>) -> Json<SessionSnapshot> {
    Json(state.runtime.snapshot().await)
}

async fn stream_session(State(state): State<AppState>) -> impl IntoResponse {
    let (snapshot, broadcast_rx) = state.runtime.subscribe().await;
    sse_stream(snapshot, broadcast_rx)
}

// ============================================================
// User Actions
// ============================================================

async fn start_session(
    State(state): State<AppState>,
) -> Result<Json<SessionSnapshot>, AppError> {
    Ok(Json(state.runtime.start().await?))
}

/// Responds once the reply has been appended or the completion has failed
async fn send_chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<SessionSnapshot>, AppError> {
    Ok(Json(state.runtime.send(req.text).await?))
}

async fn finalize_session(
    State(state): State<AppState>,
) -> Result<Json<SessionSnapshot>, AppError> {
    Ok(Json(state.runtime.finalize().await?))
}

// ============================================================
// Model Info and Version
// ============================================================

async fn get_model(State(state): State<AppState>) -> Json<ModelInfo> {
    Json(state.model.clone())
}

async fn get_version() -> &'static str {
    concat!("socratic-dialogue ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    Conflict(String),
    Internal(String),
}

impl From<TransitionError> for AppError {
    fn from(err: TransitionError) -> Self {
        match err {
            TransitionError::EmptyMessage => AppError::BadRequest(err.to_string()),
            TransitionError::AlreadyStarted
            | TransitionError::NotStarted
            | TransitionError::Busy => AppError::Conflict(err.to_string()),
            TransitionError::InvalidTransition(_) => AppError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
