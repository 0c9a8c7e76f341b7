use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Local;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use super::identity::Identity;
use super::validation::{
    ApiQuery, ValidJson, ValidPatch, ensure_owner_exists, require_owner, validate_within_days,
};
use super::{ApiError, ApiResponse, AppState, DeletedDto};
use crate::entities::assets;
use crate::models::asset::{AssetPatch, NewAsset};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetListQuery {
    pub owner_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpiringAssetsQuery {
    pub owner_id: Option<String>,
    pub within_days: Option<i64>,
}

pub async fn list_assets(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<AssetListQuery>,
) -> Result<Json<ApiResponse<Vec<assets::Model>>>, ApiError> {
    let owner_id = require_owner(query.owner_id.as_deref())?;
    let assets = state.store().list_assets(owner_id).await?;
    Ok(Json(ApiResponse::success(assets)))
}

/// `GET /api/assets/expiring?ownerId=&withinDays=`
///
/// Assets whose warranty or insurance ends within the window (default 30
/// days). Already-expired coverage is not included.
pub async fn list_expiring_assets(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<ExpiringAssetsQuery>,
) -> Result<Json<ApiResponse<Vec<assets::Model>>>, ApiError> {
    let owner_id = require_owner(query.owner_id.as_deref())?;
    let within_days = validate_within_days(query.within_days)?;
    let today = Local::now().date_naive();

    let assets = state
        .store()
        .list_expiring_assets(owner_id, today, within_days)
        .await?;
    Ok(Json(ApiResponse::success(assets)))
}

pub async fn get_asset(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<assets::Model>>, ApiError> {
    let asset = state
        .store()
        .get_asset(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Asset", &id))?;
    Ok(Json(ApiResponse::success(asset)))
}

pub async fn create_asset(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    ValidJson(payload): ValidJson<NewAsset>,
) -> Result<Json<ApiResponse<assets::Model>>, ApiError> {
    ensure_owner_exists(state.store(), &payload.user_id).await?;

    let asset = state.store().create_asset(payload).await?;
    info!(asset_id = %asset.id, actor = identity.actor(), "Asset created");
    Ok(Json(ApiResponse::success(asset)))
}

pub async fn update_asset(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path(id): Path<String>,
    ValidPatch(patch): ValidPatch<AssetPatch>,
) -> Result<Json<ApiResponse<assets::Model>>, ApiError> {
    let asset = state
        .store()
        .update_asset(&id, patch)
        .await?
        .ok_or_else(|| ApiError::not_found("Asset", &id))?;
    info!(asset_id = %id, actor = identity.actor(), "Asset updated");
    Ok(Json(ApiResponse::success(asset)))
}

pub async fn delete_asset(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DeletedDto>>, ApiError> {
    if !state.store().delete_asset(&id).await? {
        return Err(ApiError::not_found("Asset", &id));
    }
    info!(asset_id = %id, actor = identity.actor(), "Asset deleted");
    Ok(Json(ApiResponse::success(DeletedDto { id, deleted: true })))
}
