//! Language/style adapter trait.

use crate::types::Language;

/// Chooses the system instruction that steers reply language and tone.
///
/// Called on every fallback request; results are never cached because the
/// user may switch language mid-conversation.
pub trait LanguageAdapter: Send + Sync {
    /// Best guess at the message's language, or `None` when this strategy
    /// leaves detection to the backend.
    fn detect(&self, message: &str) -> Option<Language>;

    /// Build the system instruction for a single completion request.
    fn build_system_instruction(&self, message: &str) -> String;

    /// Strategy name, for logs and health output.
    fn name(&self) -> &'static str;
}
