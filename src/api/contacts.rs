use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Local;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use super::identity::Identity;
use super::validation::{ApiQuery, ValidJson, ValidPatch, ensure_owner_exists, require_owner};
use super::{ApiError, ApiResponse, AppState, DeletedDto};
use crate::entities::contacts;
use crate::models::contact::{ContactPatch, NewContact};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactListQuery {
    pub owner_id: Option<String>,
}

pub async fn list_contacts(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<ContactListQuery>,
) -> Result<Json<ApiResponse<Vec<contacts::Model>>>, ApiError> {
    let owner_id = require_owner(query.owner_id.as_deref())?;
    let contacts = state.store().list_contacts(owner_id).await?;
    Ok(Json(ApiResponse::success(contacts)))
}

/// `GET /api/contacts/due?ownerId=`
///
/// Contacts whose next contact date is today or already past.
pub async fn list_due_contacts(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<ContactListQuery>,
) -> Result<Json<ApiResponse<Vec<contacts::Model>>>, ApiError> {
    let owner_id = require_owner(query.owner_id.as_deref())?;
    let today = Local::now().date_naive();
    let contacts = state.store().list_due_contacts(owner_id, today).await?;
    Ok(Json(ApiResponse::success(contacts)))
}

pub async fn get_contact(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<contacts::Model>>, ApiError> {
    let contact = state
        .store()
        .get_contact(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Contact", &id))?;
    Ok(Json(ApiResponse::success(contact)))
}

pub async fn create_contact(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    ValidJson(payload): ValidJson<NewContact>,
) -> Result<Json<ApiResponse<contacts::Model>>, ApiError> {
    ensure_owner_exists(state.store(), &payload.user_id).await?;

    let contact = state.store().create_contact(payload).await?;
    info!(contact_id = %contact.id, actor = identity.actor(), "Contact created");
    Ok(Json(ApiResponse::success(contact)))
}

pub async fn update_contact(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path(id): Path<String>,
    ValidPatch(patch): ValidPatch<ContactPatch>,
) -> Result<Json<ApiResponse<contacts::Model>>, ApiError> {
    let contact = state
        .store()
        .update_contact(&id, patch)
        .await?
        .ok_or_else(|| ApiError::not_found("Contact", &id))?;
    info!(contact_id = %id, actor = identity.actor(), "Contact updated");
    Ok(Json(ApiResponse::success(contact)))
}

/// `POST /api/contacts/{id}/contacted`
///
/// Records that the contact was reached today and schedules the next one.
pub async fn mark_contacted(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<contacts::Model>>, ApiError> {
    let today = Local::now().date_naive();
    let contact = state
        .store()
        .mark_contacted(&id, today)
        .await?
        .ok_or_else(|| ApiError::not_found("Contact", &id))?;
    info!(
        contact_id = %id,
        actor = identity.actor(),
        next_contact_due = contact.next_contact_due.as_deref(),
        "Contact marked as contacted"
    );
    Ok(Json(ApiResponse::success(contact)))
}

pub async fn delete_contact(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DeletedDto>>, ApiError> {
    if !state.store().delete_contact(&id).await? {
        return Err(ApiError::not_found("Contact", &id));
    }
    info!(contact_id = %id, actor = identity.actor(), "Contact deleted");
    Ok(Json(ApiResponse::success(DeletedDto { id, deleted: true })))
}
