//! mynah-core - Core library for mynah.
//!
//! This crate provides the types, traits and session orchestration for the
//! mynah chat assistant: structured intent matching, per-user profile, memory
//! and conversation state, and language-steered completion requests.
//!
//! # Example
//!
//! ```ignore
//! use mynah_core::{InMemoryStateStore, SessionOrchestrator, UserId};
//!
//! let store = Arc::new(InMemoryStateStore::default());
//! let orchestrator = SessionOrchestrator::new(llm, store);
//!
//! let reply = orchestrator
//!     .handle(&UserId::from(42_i64), "my name is asha", chrono::Utc::now())
//!     .await;
//! ```

pub mod config;
pub mod error;
pub mod intent;
pub mod language;
pub mod session;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use config::{
    LanguageConfig, LanguageStrategy, LlmProvider, LlmProviderConfig, MemoryCapacity,
    MynahConfig, SessionConfig,
};
pub use error::{ErrorCode, MynahError, MynahResult};
pub use intent::IntentMatcher;
pub use language::{create_language_adapter, HeuristicAdapter, StaticAdapter};
pub use session::{ConversationWindow, InMemoryStateStore, SessionOrchestrator};
pub use traits::{
    ConversationStore, GenerationOptions, LanguageAdapter, Llm, LlmConfig, LlmResponse,
    MemoryStore, ProfileStore, StateStore,
};
pub use types::{
    Intent, IntentKind, Language, Message, MessageRole, Profile, Reply, ReplyKind, Turn,
    TurnRole, UserId,
};
