//! Static strategy: one instruction for every message.

use super::instructions::MIRROR_INSTRUCTION;
use crate::traits::LanguageAdapter;
use crate::types::Language;

/// Always emits the same instruction and leaves language detection to the backend.
#[derive(Debug, Clone)]
pub struct StaticAdapter {
    instruction: String,
}

impl Default for StaticAdapter {
    fn default() -> Self {
        Self::new(MIRROR_INSTRUCTION)
    }
}

impl StaticAdapter {
    pub fn new(instruction: impl Into<String>) -> Self {
        Self {
            instruction: instruction.into(),
        }
    }
}

impl LanguageAdapter for StaticAdapter {
    fn detect(&self, _message: &str) -> Option<Language> {
        None
    }

    fn build_system_instruction(&self, _message: &str) -> String {
        self.instruction.clone()
    }

    fn name(&self) -> &'static str {
        "static"
    }
}
