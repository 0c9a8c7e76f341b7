use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use super::identity::Identity;
use super::validation::{ApiQuery, ValidJson, ValidPatch, ensure_owner_exists, require_owner};
use super::{ApiError, ApiResponse, AppState, DeletedDto};
use crate::entities::projects;
use crate::models::project::{NewProject, ProjectPatch};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectListQuery {
    pub owner_id: Option<String>,
}

pub async fn list_projects(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<ProjectListQuery>,
) -> Result<Json<ApiResponse<Vec<projects::Model>>>, ApiError> {
    let owner_id = require_owner(query.owner_id.as_deref())?;
    let projects = state.store().list_projects(owner_id).await?;
    Ok(Json(ApiResponse::success(projects)))
}

pub async fn get_project(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<projects::Model>>, ApiError> {
    let project = state
        .store()
        .get_project(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Project", &id))?;
    Ok(Json(ApiResponse::success(project)))
}

pub async fn create_project(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    ValidJson(payload): ValidJson<NewProject>,
) -> Result<Json<ApiResponse<projects::Model>>, ApiError> {
    ensure_owner_exists(state.store(), &payload.user_id).await?;

    let project = state.store().create_project(payload).await?;
    info!(project_id = %project.id, actor = identity.actor(), "Project created");
    Ok(Json(ApiResponse::success(project)))
}

pub async fn update_project(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path(id): Path<String>,
    ValidPatch(patch): ValidPatch<ProjectPatch>,
) -> Result<Json<ApiResponse<projects::Model>>, ApiError> {
    let project = state
        .store()
        .update_project(&id, patch)
        .await?
        .ok_or_else(|| ApiError::not_found("Project", &id))?;
    info!(project_id = %id, actor = identity.actor(), "Project updated");
    Ok(Json(ApiResponse::success(project)))
}

pub async fn delete_project(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DeletedDto>>, ApiError> {
    if !state.store().delete_project(&id).await? {
        return Err(ApiError::not_found("Project", &id));
    }
    info!(project_id = %id, actor = identity.actor(), "Project deleted");
    Ok(Json(ApiResponse::success(DeletedDto { id, deleted: true })))
}
