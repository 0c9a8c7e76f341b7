use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use super::identity::Identity;
use super::validation::{ApiQuery, ValidJson, ensure_owner_exists, require_owner, validate_limit};
use super::{ApiError, ApiResponse, AppState};
use crate::entities::mood_entries;
use crate::models::mood::NewMoodEntry;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodListQuery {
    pub owner_id: Option<String>,
    pub limit: Option<i64>,
}

/// `GET /api/mood?ownerId=&limit=`
///
/// Newest entries first.
pub async fn list_mood_entries(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<MoodListQuery>,
) -> Result<Json<ApiResponse<Vec<mood_entries::Model>>>, ApiError> {
    let owner_id = require_owner(query.owner_id.as_deref())?;
    let limit = validate_limit(query.limit)?;
    let entries = state.store().list_mood_entries(owner_id, limit).await?;
    Ok(Json(ApiResponse::success(entries)))
}

pub async fn get_mood_entry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<mood_entries::Model>>, ApiError> {
    let entry = state
        .store()
        .get_mood_entry(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Mood entry", &id))?;
    Ok(Json(ApiResponse::success(entry)))
}

pub async fn create_mood_entry(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    ValidJson(payload): ValidJson<NewMoodEntry>,
) -> Result<Json<ApiResponse<mood_entries::Model>>, ApiError> {
    ensure_owner_exists(state.store(), &payload.user_id).await?;

    let entry = state.store().create_mood_entry(payload).await?;
    info!(mood_entry_id = %entry.id, actor = identity.actor(), "Mood entry recorded");
    Ok(Json(ApiResponse::success(entry)))
}
