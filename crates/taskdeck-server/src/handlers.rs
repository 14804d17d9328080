// Handlers stay async even without awaits; axum requires the signature.
#![allow(clippy::unused_async)]

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;
use taskdeck_core::Task;
use taskdeck_core::id::TaskId;
use taskdeck_core::validate::{TaskDraft, TaskPatch};
use taskdeck_store::TaskStore;
use tracing::info;

use crate::error::ApiError;
use crate::server::AppState;

/// Raw create payload as received on the wire.
#[derive(Debug, Deserialize)]
pub struct CreateTaskBody {
    /// Unvalidated title.
    pub title: String,
}

/// Raw partial-update payload. Unknown fields are ignored; absent
/// fields leave the task untouched.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTaskBody {
    /// Replacement title, if supplied.
    pub title: Option<String>,
    /// Replacement completion flag, if supplied.
    pub completed: Option<bool>,
}

/// Parse a path id segment. A negative id is a well-formed integer that
/// can never exist, so it reads as unknown rather than malformed.
fn parse_id(segment: &str) -> Result<TaskId, ApiError> {
    segment.parse().map_err(|_| {
        if segment.parse::<i64>().is_ok() {
            ApiError::NotFound
        } else {
            ApiError::InvalidId
        }
    })
}

/// `GET /api/tasks`: the full collection, 200 always.
pub async fn list_tasks(State(state): State<Arc<AppState>>) -> Json<Vec<Task>> {
    Json(state.store.read().list())
}

/// `POST /api/tasks`: validate, insert, 201 with the created task.
pub async fn create_task(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CreateTaskBody>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let Json(body) = body.map_err(|_| ApiError::invalid_task_data())?;
    let draft = TaskDraft::validate(&body.title).map_err(ApiError::invalid_task_fields)?;

    let task = state.store.write().create(draft);
    info!(id = %task.id, "task created");
    Ok((StatusCode::CREATED, Json(task)))
}

/// `PATCH /api/tasks/{id}`: partial update, 200 with the new record.
pub async fn update_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<UpdateTaskBody>, JsonRejection>,
) -> Result<Json<Task>, ApiError> {
    let id = parse_id(&id)?;
    let Json(body) = body.map_err(|_| ApiError::invalid_update_data())?;
    let patch = TaskPatch::validate(body.title.as_deref(), body.completed)
        .map_err(ApiError::invalid_update_fields)?;

    let task = state
        .store
        .write()
        .update(id, patch)
        .map_err(|_| ApiError::NotFound)?;
    info!(%id, "task updated");
    Ok(Json(task))
}

/// `DELETE /api/tasks/{id}`: 204 on success, 404 for unknown ids.
pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    if !state.store.write().delete(id) {
        return Err(ApiError::NotFound);
    }
    info!(%id, "task deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/tasks/clear-completed`: 204 always, idempotent.
pub async fn clear_completed(State(state): State<Arc<AppState>>) -> StatusCode {
    state.store.write().clear_completed();
    info!("completed tasks cleared");
    StatusCode::NO_CONTENT
}
