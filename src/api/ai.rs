//! AI proxy endpoints.
//!
//! Input is validated like any other payload. Once valid, these handlers
//! always answer 200: upstream failures turn into the fallback reply inside
//! [`crate::services::AssistantService`].

use axum::{Json, extract::State};
use std::sync::Arc;

use super::identity::Identity;
use super::validation::ValidJson;
use super::{ApiError, ApiResponse, AppState};
use crate::models::assistant::{
    CaptionRequest, Captions, ChatReply, ChatRequest, ProjectAnalysis, ProjectAnalysisRequest,
    TimeSuggestionRequest, TimeSuggestions,
};

pub async fn time_suggestions(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    ValidJson(request): ValidJson<TimeSuggestionRequest>,
) -> Result<Json<ApiResponse<TimeSuggestions>>, ApiError> {
    tracing::debug!(actor = identity.actor(), "Time suggestions requested");
    let reply = state.assistant().time_suggestions(&request).await;
    Ok(Json(ApiResponse::success(reply)))
}

pub async fn project_analysis(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    ValidJson(request): ValidJson<ProjectAnalysisRequest>,
) -> Result<Json<ApiResponse<ProjectAnalysis>>, ApiError> {
    tracing::debug!(actor = identity.actor(), "Project analysis requested");
    let reply = state.assistant().project_analysis(&request).await;
    Ok(Json(ApiResponse::success(reply)))
}

pub async fn social_media_captions(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    ValidJson(request): ValidJson<CaptionRequest>,
) -> Result<Json<ApiResponse<Captions>>, ApiError> {
    tracing::debug!(actor = identity.actor(), "Captions requested");
    let reply = state.assistant().captions(&request).await;
    Ok(Json(ApiResponse::success(reply)))
}

pub async fn chat(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    ValidJson(request): ValidJson<ChatRequest>,
) -> Result<Json<ApiResponse<ChatReply>>, ApiError> {
    tracing::debug!(actor = identity.actor(), turns = request.history.len(), "Chat message");
    let reply = state.assistant().chat(&request).await;
    Ok(Json(ApiResponse::success(reply)))
}
