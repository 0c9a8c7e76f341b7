use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;
use tracing::info;

use super::identity::Identity;
use super::validation::ValidJson;
use super::{ApiError, ApiResponse, AppState};
use crate::models::user::{NewUser, UserDto};

/// `POST /api/users`
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    ValidJson(payload): ValidJson<NewUser>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    payload.check_credentials()?;

    let username = payload.username.trim().to_string();
    if state.store().get_user_by_username(&username).await?.is_some() {
        return Err(username_taken(&username));
    }

    // A concurrent signup can still win the race; the unique index decides.
    let user = state
        .store()
        .create_user(payload, &state.config().security)
        .await?
        .ok_or_else(|| username_taken(&username))?;
    info!(user_id = %user.id, username = %user.username, "User created");
    Ok(Json(ApiResponse::success(user)))
}

/// `GET /api/users/me`
///
/// The user named by the `X-User-Id` header.
pub async fn get_current_user(
    State(state): State<Arc<AppState>>,
    identity: Identity,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let user_id = identity.require()?;
    let user = state
        .store()
        .get_user(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User", user_id))?;
    Ok(Json(ApiResponse::success(user)))
}

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let user = state
        .store()
        .get_user(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("User", &id))?;
    Ok(Json(ApiResponse::success(user)))
}

fn username_taken(username: &str) -> ApiError {
    ApiError::Conflict(format!("Username '{username}' is already taken"))
}
