use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use tracing::error;

use super::models::{IssuePatch, NewIssue, Summary};
use super::store::StoreHandle;
use crate::errors::StoreError;

// ── Shared application state ──────────────────────────────────────────

pub struct AppState {
    pub store: StoreHandle,
}

pub type SharedState = Arc<AppState>;

// ── Error handling ────────────────────────────────────────────────────

pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Internal(String),
}

impl ApiError {
    /// Map a store failure onto a response. Anything other than a missing
    /// issue is logged and reported with the generic `context` message.
    fn from_store(err: StoreError, context: &str) -> Self {
        if err.is_not_found() {
            return ApiError::NotFound("Issue not found".into());
        }
        error!(error = %err, "{}", context);
        ApiError::Internal(context.to_string())
    }
}

/// Malformed bodies get the same `{"error": ...}` shape as every other failure.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

/// An empty body is an empty patch. Content type is not checked.
fn parse_patch(body: &[u8]) -> Result<IssuePatch, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(IssuePatch::default());
    }
    serde_json::from_slice(body)
}

/// An id that is not an integer can never match a stored issue.
fn issue_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, ApiError> {
    path.map(|Path(id)| id)
        .map_err(|_| ApiError::NotFound("Issue not found".into()))
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(serde_json::json!({"error": message}))).into_response()
    }
}

// ── Router ────────────────────────────────────────────────────────────

pub fn api_router() -> Router<SharedState> {
    Router::new()
        .route("/api/issues", get(list_issues).post(create_issue))
        .route(
            "/api/issues/{id}",
            get(get_issue).put(update_issue).delete(delete_issue),
        )
        .route("/api/summary", get(get_summary))
        .route("/health", get(health_check))
}

// ── Handlers ──────────────────────────────────────────────────────────

async fn health_check() -> &'static str {
    "ok"
}

async fn list_issues(State(state): State<SharedState>) -> Result<impl IntoResponse, ApiError> {
    let issues = state
        .store
        .call(|store| Ok(store.list()))
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to retrieve issues"))?;
    Ok(Json(issues))
}

async fn create_issue(
    State(state): State<SharedState>,
    payload: Result<Json<NewIssue>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let req = json_body(payload)?;
    let issue = state
        .store
        .call(move |store| store.create(req))
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to create issue"))?;
    Ok((StatusCode::CREATED, Json(issue)))
}

async fn get_issue(
    State(state): State<SharedState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = issue_id(path)?;
    let issue = state
        .store
        .call(move |store| store.get(id))
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to retrieve issue"))?;
    Ok(Json(issue))
}

async fn update_issue(
    State(state): State<SharedState>,
    path: Result<Path<i64>, PathRejection>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let id = issue_id(path)?;
    let patch = parse_patch(&body);
    // A missing issue is reported as 404 before the body is judged.
    let issue = state
        .store
        .call(move |store| match patch {
            Ok(patch) => store.update(id, patch).map(Ok),
            Err(e) => store.get(id).map(|_| Err(e)),
        })
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to update issue"))?
        .map_err(|e| ApiError::BadRequest(format!("Invalid issue update: {}", e)))?;
    Ok(Json(issue))
}

async fn delete_issue(
    State(state): State<SharedState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = issue_id(path)?;
    state
        .store
        .call(move |store| store.delete(id))
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to delete issue"))?;
    Ok(Json(
        serde_json::json!({"message": "Issue deleted successfully"}),
    ))
}

async fn get_summary(State(state): State<SharedState>) -> Result<impl IntoResponse, ApiError> {
    let issues = state
        .store
        .call(|store| Ok(store.list()))
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to retrieve issues"))?;
    let today = chrono::Local::now().date_naive();
    Ok(Json(Summary::from_issues(&issues, today)))
}
