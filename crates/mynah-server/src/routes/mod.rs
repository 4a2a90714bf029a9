//! Route definitions for the REST API.

mod chat;
mod health;
mod users;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Chat turns
        .route("/chat", post(chat::chat))
        // Per-user state
        .route("/users/:user_id/profile", get(users::get_profile))
        .route("/users/:user_id/memories", get(users::get_memories))
        .route(
            "/users/:user_id/conversation",
            get(users::get_conversation).delete(users::clear_conversation),
        )
        // Attach state
        .with_state(state)
}

pub use chat::*;
pub use health::*;
pub use users::*;
