//! Route handlers for the task service.
//!
//! Five thin routes over the document store; no business logic beyond
//! pass-through persistence calls. Store I/O runs on the blocking pool so
//! handlers never block the async executor.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;
use taskdeck_core::{Task, TaskDraft, TaskId, TaskPatch};
use taskdeck_store_json::{JsonStore, StoreError};

use crate::AppState;
use crate::error::ApiError;

/// Fixed payload returned by the greeting probe.
#[derive(Debug, Serialize)]
pub struct Greeting {
    /// Static greeting text.
    pub response: &'static str,
}

/// Body of a successful delete.
#[derive(Debug, Serialize)]
pub struct DeleteOutcome {
    /// Always true; failures use the error body instead.
    pub success: bool,
}

async fn with_store<T, F>(state: Arc<AppState>, op: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&JsonStore) -> Result<T, StoreError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || op(&state.store))
        .await
        .map_err(|err| ApiError::internal(format!("store task join error: {err}")))?
        .map_err(ApiError::from)
}

/// Liveness probe for `GET /will`, returning the fixed greeting payload.
pub async fn greeting() -> Json<Greeting> {
    Json(Greeting {
        response: "Hello World",
    })
}

/// Handles `GET /api/tasks`: every task, newest-created first.
pub async fn list_tasks(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Task>>, ApiError> {
    let tasks = with_store(state, JsonStore::list).await?;
    Ok(Json(tasks))
}

/// Handles `POST /api/tasks`: create a task from a draft.
pub async fn create_task(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<TaskDraft>,
) -> Result<Json<Task>, ApiError> {
    let task = with_store(state, move |store| store.insert(draft)).await?;
    Ok(Json(task))
}

/// Handles `PUT /api/tasks/{id}`: partial-field update.
pub async fn update_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TaskId>,
    Json(patch): Json<TaskPatch>,
) -> Result<Json<Task>, ApiError> {
    let task = with_store(state, move |store| store.update(id, &patch)).await?;
    Ok(Json(task))
}

/// Handles `DELETE /api/tasks/{id}`: remove a task document.
pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TaskId>,
) -> Result<Json<DeleteOutcome>, ApiError> {
    with_store(state, move |store| store.delete(id)).await?;
    Ok(Json(DeleteOutcome { success: true }))
}
