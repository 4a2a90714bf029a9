//! Process-local state store.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use super::window::ConversationWindow;
use crate::config::{MemoryCapacity, SessionConfig};
use crate::error::MynahResult;
use crate::traits::{ConversationStore, MemoryStore, ProfileStore};
use crate::types::{Profile, Turn, UserId};

/// Everything kept for one user.
#[derive(Debug)]
struct UserState {
    profile: Profile,
    notes: VecDeque<String>,
    window: ConversationWindow,
}

impl UserState {
    fn new(window_size: usize) -> Self {
        Self {
            profile: Profile::default(),
            notes: VecDeque::new(),
            window: ConversationWindow::new(window_size),
        }
    }
}

/// In-memory profile, memory and conversation store.
///
/// State is partitioned per user: the outer map lock is only held long enough
/// to find or create a user's slot, and each slot has its own lock. Users never
/// wait on each other. A user's slot is created on first write; reads on an
/// unknown user return empty values without creating anything.
pub struct InMemoryStateStore {
    users: RwLock<HashMap<UserId, Arc<Mutex<UserState>>>>,
    window_size: usize,
    memory_capacity: MemoryCapacity,
}

impl Default for InMemoryStateStore {
    fn default() -> Self {
        Self::from_config(&SessionConfig::default())
    }
}

impl InMemoryStateStore {
    pub fn new(window_size: usize, memory_capacity: MemoryCapacity) -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            window_size,
            memory_capacity,
        }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(config.window_size, config.memory_capacity)
    }

    /// Number of users with any stored state.
    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }

    async fn existing(&self, user: &UserId) -> Option<Arc<Mutex<UserState>>> {
        self.users.read().await.get(user).cloned()
    }

    async fn slot(&self, user: &UserId) -> Arc<Mutex<UserState>> {
        if let Some(state) = self.existing(user).await {
            return state;
        }

        let mut users = self.users.write().await;
        users
            .entry(user.clone())
            .or_insert_with(|| {
                debug!(user_id = %user, "Creating user state");
                Arc::new(Mutex::new(UserState::new(self.window_size)))
            })
            .clone()
    }
}

#[async_trait]
impl ProfileStore for InMemoryStateStore {
    async fn get_profile(&self, user: &UserId) -> MynahResult<Profile> {
        Ok(match self.existing(user).await {
            Some(state) => state.lock().await.profile.clone(),
            None => Profile::default(),
        })
    }

    async fn set_name(&self, user: &UserId, name: &str) -> MynahResult<()> {
        let slot = self.slot(user).await;
        slot.lock().await.profile.name = Some(name.to_string());
        Ok(())
    }

    async fn set_birthdate(&self, user: &UserId, birthdate: &str) -> MynahResult<()> {
        let slot = self.slot(user).await;
        slot.lock().await.profile.birthdate = Some(birthdate.to_string());
        Ok(())
    }

    async fn touch_last_seen(&self, user: &UserId, now: DateTime<Utc>) -> MynahResult<()> {
        let slot = self.slot(user).await;
        slot.lock().await.profile.touch(now);
        Ok(())
    }
}

#[async_trait]
impl MemoryStore for InMemoryStateStore {
    async fn append_note(&self, user: &UserId, note: &str) -> MynahResult<()> {
        let slot = self.slot(user).await;
        let mut state = slot.lock().await;
        state.notes.push_back(note.to_string());

        if let MemoryCapacity::MaxNotes(max) = self.memory_capacity {
            while state.notes.len() > max.max(1) {
                if let Some(dropped) = state.notes.pop_front() {
                    debug!(user_id = %user, note = %dropped, "Evicted oldest memory note");
                }
            }
        }
        Ok(())
    }

    async fn list_notes(&self, user: &UserId) -> MynahResult<Vec<String>> {
        Ok(match self.existing(user).await {
            Some(state) => state.lock().await.notes.iter().cloned().collect(),
            None => Vec::new(),
        })
    }
}

#[async_trait]
impl ConversationStore for InMemoryStateStore {
    async fn push_turn(&self, user: &UserId, turn: Turn) -> MynahResult<()> {
        let slot = self.slot(user).await;
        if let Some(evicted) = slot.lock().await.window.push(turn) {
            debug!(user_id = %user, role = ?evicted.role, "Turn left the conversation window");
        }
        Ok(())
    }

    async fn window(&self, user: &UserId) -> MynahResult<Vec<Turn>> {
        Ok(match self.existing(user).await {
            Some(state) => state.lock().await.window.turns(),
            None => Vec::new(),
        })
    }

    async fn clear_conversation(&self, user: &UserId) -> MynahResult<()> {
        if let Some(state) = self.existing(user).await {
            state.lock().await.window.clear();
        }
        Ok(())
    }
}
