//! Per-user state endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use mynah_core::types::{Profile, Turn};

use super::chat::parse_user_id;
use crate::error::ApiResult;
use crate::state::AppState;

/// Response listing a user's memory notes.
#[derive(Debug, Serialize)]
pub struct MemoriesResponse {
    pub results: Vec<String>,
}

/// Response listing a user's conversation window.
#[derive(Debug, Serialize)]
pub struct ConversationResponse {
    pub turns: Vec<Turn>,
}

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub message: String,
}

/// Get a user's profile.
/// GET /users/:user_id/profile
pub async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<Profile>> {
    let user = parse_user_id(&user_id)?;
    Ok(Json(state.orchestrator.profile(&user).await?))
}

/// Get a user's memory notes in insertion order.
/// GET /users/:user_id/memories
pub async fn get_memories(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<MemoriesResponse>> {
    let user = parse_user_id(&user_id)?;
    let results = state.orchestrator.memories(&user).await?;
    Ok(Json(MemoriesResponse { results }))
}

/// Get a user's conversation window, oldest turn first.
/// GET /users/:user_id/conversation
pub async fn get_conversation(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<ConversationResponse>> {
    let user = parse_user_id(&user_id)?;
    let turns = state.orchestrator.conversation(&user).await?;
    Ok(Json(ConversationResponse { turns }))
}

/// Clear a user's conversation window.
/// DELETE /users/:user_id/conversation
pub async fn clear_conversation(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<ClearResponse>> {
    let user = parse_user_id(&user_id)?;
    state.orchestrator.clear_conversation(&user).await?;
    Ok(Json(ClearResponse {
        message: "Conversation cleared".to_string(),
    }))
}
