//! Per-user session state and the orchestrator that drives it.

mod in_memory;
mod orchestrator;
mod replies;
mod window;

pub use in_memory::InMemoryStateStore;
pub use orchestrator::SessionOrchestrator;
pub use replies::Template;
pub use window::ConversationWindow;
