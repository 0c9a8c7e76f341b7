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
use crate::entities::notes;
use crate::models::note::{NewNote, NotePatch};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteListQuery {
    pub owner_id: Option<String>,
}

pub async fn list_notes(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<NoteListQuery>,
) -> Result<Json<ApiResponse<Vec<notes::Model>>>, ApiError> {
    let owner_id = require_owner(query.owner_id.as_deref())?;
    let notes = state.store().list_notes(owner_id).await?;
    Ok(Json(ApiResponse::success(notes)))
}

pub async fn get_note(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<notes::Model>>, ApiError> {
    let note = state
        .store()
        .get_note(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Note", &id))?;
    Ok(Json(ApiResponse::success(note)))
}

pub async fn create_note(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    ValidJson(payload): ValidJson<NewNote>,
) -> Result<Json<ApiResponse<notes::Model>>, ApiError> {
    ensure_owner_exists(state.store(), &payload.user_id).await?;

    let note = state.store().create_note(payload).await?;
    info!(note_id = %note.id, actor = identity.actor(), "Note created");
    Ok(Json(ApiResponse::success(note)))
}

pub async fn update_note(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path(id): Path<String>,
    ValidPatch(patch): ValidPatch<NotePatch>,
) -> Result<Json<ApiResponse<notes::Model>>, ApiError> {
    let note = state
        .store()
        .update_note(&id, patch)
        .await?
        .ok_or_else(|| ApiError::not_found("Note", &id))?;
    info!(note_id = %id, actor = identity.actor(), "Note updated");
    Ok(Json(ApiResponse::success(note)))
}

pub async fn delete_note(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DeletedDto>>, ApiError> {
    if !state.store().delete_note(&id).await? {
        return Err(ApiError::not_found("Note", &id));
    }
    info!(note_id = %id, actor = identity.actor(), "Note deleted");
    Ok(Json(ApiResponse::success(DeletedDto { id, deleted: true })))
}
