use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use super::identity::Identity;
use super::validation::{
    ApiQuery, ValidJson, ValidPatch, ensure_owner_exists, parse_choice, require_owner,
};
use super::{ApiError, ApiResponse, AppState, DeletedDto};
use crate::entities::{tasks, types::TaskStatus};
use crate::models::task::{NewTask, TaskFilter, TaskPatch};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskListQuery {
    pub owner_id: Option<String>,
    pub project_id: Option<String>,
    pub status: Option<String>,
}

pub async fn list_tasks(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<TaskListQuery>,
) -> Result<Json<ApiResponse<Vec<tasks::Model>>>, ApiError> {
    let owner_id = require_owner(query.owner_id.as_deref())?;
    let filter = TaskFilter {
        project_id: query.project_id.filter(|id| !id.trim().is_empty()),
        status: parse_choice("status", query.status.as_deref(), TaskStatus::VALUES)?,
    };

    let tasks = state.store().list_tasks(owner_id, filter).await?;
    Ok(Json(ApiResponse::success(tasks)))
}

pub async fn get_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<tasks::Model>>, ApiError> {
    let task = state
        .store()
        .get_task(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Task", &id))?;
    Ok(Json(ApiResponse::success(task)))
}

pub async fn create_task(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    ValidJson(payload): ValidJson<NewTask>,
) -> Result<Json<ApiResponse<tasks::Model>>, ApiError> {
    ensure_owner_exists(state.store(), &payload.user_id).await?;

    let task = state.store().create_task(payload).await?;
    info!(task_id = %task.id, actor = identity.actor(), "Task created");
    Ok(Json(ApiResponse::success(task)))
}

pub async fn update_task(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path(id): Path<String>,
    ValidPatch(patch): ValidPatch<TaskPatch>,
) -> Result<Json<ApiResponse<tasks::Model>>, ApiError> {
    let task = state
        .store()
        .update_task(&id, patch)
        .await?
        .ok_or_else(|| ApiError::not_found("Task", &id))?;
    info!(task_id = %id, actor = identity.actor(), "Task updated");
    Ok(Json(ApiResponse::success(task)))
}

pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DeletedDto>>, ApiError> {
    if !state.store().delete_task(&id).await? {
        return Err(ApiError::not_found("Task", &id));
    }
    info!(task_id = %id, actor = identity.actor(), "Task deleted");
    Ok(Json(ApiResponse::success(DeletedDto { id, deleted: true })))
}
