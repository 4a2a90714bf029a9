//! Message types for LLM interactions and conversation turns.

use serde::{Deserialize, Serialize};

/// Role of a message sent to the completion backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

/// A message in a completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }

    /// Create a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }
}

/// Who spoke a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

/// One role-tagged entry of a user's conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: TurnRole,
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            text: text.into(),
        }
    }
}

impl From<&Turn> for Message {
    fn from(turn: &Turn) -> Self {
        match turn.role {
            TurnRole::User => Message::user(turn.text.clone()),
            TurnRole::Assistant => Message::assistant(turn.text.clone()),
        }
    }
}

/// Everything the completion backend needs for one fallback turn.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Language/style steering for this request only.
    pub system_instruction: String,
    /// Prior turns, oldest first, excluding `message`.
    pub history: Vec<Turn>,
    /// The user's new message.
    pub message: String,
}

impl CompletionRequest {
    /// Flatten into the message list sent on the wire: system, history, then the new message.
    pub fn to_messages(&self) -> Vec<Message> {
        let mut messages = Vec::with_capacity(self.history.len() + 2);
        messages.push(Message::system(self.system_instruction.clone()));
        messages.extend(self.history.iter().map(Message::from));
        messages.push(Message::user(self.message.clone()));
        messages
    }
}

/// Format messages into a plain transcript (used in debug logging).
pub fn format_messages(messages: &[Message]) -> String {
    messages
        .iter()
        .map(|msg| format!("{}: {}", msg.role.as_str(), msg.content))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_message_order() {
        let request = CompletionRequest {
            system_instruction: "be brief".to_string(),
            history: vec![Turn::user("hi"), Turn::assistant("hello!")],
            message: "how are you?".to_string(),
        };

        let messages = request.to_messages();
        let roles: Vec<MessageRole> = messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![
                MessageRole::System,
                MessageRole::User,
                MessageRole::Assistant,
                MessageRole::User
            ]
        );
        assert_eq!(messages.last().unwrap().content, "how are you?");
        assert_eq!(
            format_messages(&messages[..2]),
            "system: be brief\nuser: hi"
        );
    }
}
