pub mod types;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use log::info;
use std::sync::Arc;
use uuid::Uuid;

pub use types::*;

use crate::core::error::{ColonyError, ColonyResult};
use crate::core::shared::state::{acting_permissions, AppState};
use crate::core::urls::ApiUrls;

/// How many pending tasks a single bulk assignment hands out by default.
pub const DEFAULT_BULK_ASSIGN_LIMIT: usize = 5;

pub fn pending_count(tasks: &[Task]) -> usize {
    tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Pending)
        .count()
}

/// Hands the first `limit` pending tasks to `agent_id` and starts them.
/// Returns the ids that changed, in collection order.
pub fn bulk_assign(tasks: &mut [Task], agent_id: Uuid, limit: usize) -> Vec<Uuid> {
    tasks
        .iter_mut()
        .filter(|t| t.status == TaskStatus::Pending)
        .take(limit)
        .map(|task| {
            task.agent_id = Some(agent_id);
            task.status = TaskStatus::InProgress;
            task.id
        })
        .collect()
}

pub fn validate_new_task(req: &CreateTaskRequest) -> ColonyResult<()> {
    if req.title.trim().is_empty() {
        return Err(ColonyError::InvalidInput("task title is required".to_string()));
    }
    Ok(())
}

// HTTP Handlers

pub async fn list_tasks(State(state): State<Arc<AppState>>) -> Json<Vec<Task>> {
    let store = state.store.read().await;
    Json(store.tasks.list().to_vec())
}

pub async fn create_task(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Task>), ColonyError> {
    if !acting_permissions(&headers).can_edit_tasks {
        return Err(ColonyError::Forbidden("only managers create tasks".to_string()));
    }
    validate_new_task(&req)?;
    let task = req.into_task();
    task.due_day()?;

    let mut store = state.store.write().await;
    let task = store.create_task(task)?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn update_task(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(req): Json<CreateTaskRequest>,
) -> Result<Json<Task>, ColonyError> {
    if !acting_permissions(&headers).can_edit_tasks {
        return Err(ColonyError::Forbidden("only managers edit tasks".to_string()));
    }
    validate_new_task(&req)?;
    req.clone().into_task().due_day()?;

    let mut store = state.store.write().await;
    let task = store.update_task(id, |task| req.apply_to(task))?;
    Ok(Json(task))
}

pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ColonyError> {
    if !acting_permissions(&headers).can_edit_tasks {
        return Err(ColonyError::Forbidden("only managers edit tasks".to_string()));
    }
    let mut store = state.store.write().await;
    store.delete_task(id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn update_task_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(update): Json<TaskStatusUpdate>,
) -> Result<Json<Task>, ColonyError> {
    if !acting_permissions(&headers).can_edit_tasks {
        return Err(ColonyError::Forbidden("only managers change task status".to_string()));
    }
    let mut store = state.store.write().await;
    let task = store.update_task(id, |task| task.status = update.status)?;
    Ok(Json(task))
}

pub async fn bulk_assign_tasks(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<BulkAssignRequest>,
) -> Result<Json<BulkAssignResponse>, ColonyError> {
    if !acting_permissions(&headers).can_edit_tasks {
        return Err(ColonyError::Forbidden("only managers assign tasks".to_string()));
    }
    let limit = req.limit.unwrap_or(DEFAULT_BULK_ASSIGN_LIMIT);
    let mut store = state.store.write().await;
    let assigned = store.bulk_assign_tasks(req.agent_id, limit)?;
    info!("Bulk-assigned {} task(s) to {}", assigned.len(), req.agent_id);
    Ok(Json(BulkAssignResponse { assigned }))
}

pub fn configure_tasks_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(ApiUrls::TASKS, get(list_tasks).post(create_task))
        .route(ApiUrls::TASK_BY_ID, put(update_task).delete(delete_task))
        .route(ApiUrls::TASK_STATUS, put(update_task_status))
        .route(ApiUrls::TASKS_BULK_ASSIGN, post(bulk_assign_tasks))
}
