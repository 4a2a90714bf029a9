//! Per-user state store traits.
//!
//! The orchestrator only talks to these traits, so the in-memory store can be
//! swapped for an externally backed one. Reads on an unknown user return empty
//! values; they never fail because the user is absent.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::MynahResult;
use crate::types::{Profile, Turn, UserId};

/// Name, birthdate and last-seen per user. Writes are last-write-wins overwrites.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Get the profile, or an empty default when the user is unknown.
    async fn get_profile(&self, user: &UserId) -> MynahResult<Profile>;

    async fn set_name(&self, user: &UserId, name: &str) -> MynahResult<()>;

    async fn set_birthdate(&self, user: &UserId, birthdate: &str) -> MynahResult<()>;

    /// Advance `last_seen`; never moves it backwards.
    async fn touch_last_seen(&self, user: &UserId, now: DateTime<Utc>) -> MynahResult<()>;
}

/// Ordered free-text notes per user.
#[async_trait]
pub trait MemoryStore: Send + Sync {
    async fn append_note(&self, user: &UserId, note: &str) -> MynahResult<()>;

    /// All notes in insertion order; empty when none.
    async fn list_notes(&self, user: &UserId) -> MynahResult<Vec<String>>;
}

/// Bounded rolling conversation per user.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    async fn push_turn(&self, user: &UserId, turn: Turn) -> MynahResult<()>;

    /// At most the last N turns, oldest first.
    async fn window(&self, user: &UserId) -> MynahResult<Vec<Turn>>;

    async fn clear_conversation(&self, user: &UserId) -> MynahResult<()>;
}

/// Everything the orchestrator needs from storage.
pub trait StateStore: ProfileStore + MemoryStore + ConversationStore {}

impl<T: ProfileStore + MemoryStore + ConversationStore> StateStore for T {}
