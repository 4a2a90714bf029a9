//! Replies returned to the transport.

use serde::{Deserialize, Serialize};

use super::{IntentKind, Language};

/// How a reply was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyKind {
    /// Templated answer to a structured intent; no backend call was made.
    Structured,
    /// The message needs more content before anything can be done.
    Clarification,
    /// Text generated by the completion backend.
    Completion,
    /// Something failed; the text apologises in the user's language.
    Error,
}

/// The textual answer to one inbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub text: String,
    pub kind: ReplyKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<IntentKind>,
    pub language: Language,
}

impl Reply {
    pub fn structured(text: impl Into<String>, intent: IntentKind, language: Language) -> Self {
        Self {
            text: text.into(),
            kind: ReplyKind::Structured,
            intent: Some(intent),
            language,
        }
    }

    pub fn clarification(
        text: impl Into<String>,
        intent: Option<IntentKind>,
        language: Language,
    ) -> Self {
        Self {
            text: text.into(),
            kind: ReplyKind::Clarification,
            intent,
            language,
        }
    }

    pub fn completion(text: impl Into<String>, language: Language) -> Self {
        Self {
            text: text.into(),
            kind: ReplyKind::Completion,
            intent: None,
            language,
        }
    }

    pub fn error(text: impl Into<String>, intent: Option<IntentKind>, language: Language) -> Self {
        Self {
            text: text.into(),
            kind: ReplyKind::Error,
            intent,
            language,
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == ReplyKind::Error
    }
}
