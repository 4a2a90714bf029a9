//! Chat endpoint.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use mynah_core::types::{Reply, UserId};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// A sender id as transports deliver it: chat platforms often use integers.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawUserId {
    Text(String),
    Number(i64),
}

/// Request body for one chat turn.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Stable identifier of the sender.
    pub user_id: RawUserId,
    /// The message text. May be empty.
    #[serde(default)]
    pub message: String,
    /// When the message was sent; defaults to the time it was received.
    pub timestamp: Option<DateTime<Utc>>,
}

/// Handle one message and return the reply.
/// POST /chat
///
/// Backend and store failures still produce a 200 with an error-kind reply.
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> ApiResult<Json<Reply>> {
    let user = match &request.user_id {
        RawUserId::Text(raw) => parse_user_id(raw)?,
        RawUserId::Number(id) => UserId::from(*id),
    };
    let now = request.timestamp.unwrap_or_else(Utc::now);

    let reply = state.orchestrator.handle(&user, &request.message, now).await;
    Ok(Json(reply))
}

/// Reject blank user identifiers.
pub(crate) fn parse_user_id(raw: &str) -> ApiResult<UserId> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("user_id must not be empty"));
    }
    Ok(UserId::from(trimmed))
}
