//! Structured intents detected before falling back to free-form completion.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

/// Tag of a structured intent, without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum IntentKind {
    SaveName,
    SaveBirthdate,
    SaveMemory,
    RecallName,
    RecallBirthdate,
    RecallLastSeen,
    RecallMemory,
}

/// Outcome of classifying one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    SaveName(String),
    SaveBirthdate(String),
    SaveMemory(String),
    RecallName,
    RecallBirthdate,
    RecallLastSeen,
    RecallMemory,
    /// A save pattern matched but captured nothing usable; ask the user for content.
    MissingPayload(IntentKind),
    /// No structured intent; hand the message to the completion backend.
    None,
}

impl Intent {
    /// Build an intent from its tag and extracted payload.
    ///
    /// Save tags need a payload; recall tags ignore it.
    pub fn from_parts(kind: IntentKind, payload: Option<String>) -> Self {
        let missing = Intent::MissingPayload(kind);
        match kind {
            IntentKind::SaveName => payload.map_or(missing, Intent::SaveName),
            IntentKind::SaveBirthdate => payload.map_or(missing, Intent::SaveBirthdate),
            IntentKind::SaveMemory => payload.map_or(missing, Intent::SaveMemory),
            IntentKind::RecallName => Intent::RecallName,
            IntentKind::RecallBirthdate => Intent::RecallBirthdate,
            IntentKind::RecallLastSeen => Intent::RecallLastSeen,
            IntentKind::RecallMemory => Intent::RecallMemory,
        }
    }

    /// The tag of this intent, or `None` for the fallback path.
    pub fn kind(&self) -> Option<IntentKind> {
        match self {
            Intent::SaveName(_) => Some(IntentKind::SaveName),
            Intent::SaveBirthdate(_) => Some(IntentKind::SaveBirthdate),
            Intent::SaveMemory(_) => Some(IntentKind::SaveMemory),
            Intent::RecallName => Some(IntentKind::RecallName),
            Intent::RecallBirthdate => Some(IntentKind::RecallBirthdate),
            Intent::RecallLastSeen => Some(IntentKind::RecallLastSeen),
            Intent::RecallMemory => Some(IntentKind::RecallMemory),
            Intent::MissingPayload(kind) => Some(*kind),
            Intent::None => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Intent::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_parts() {
        assert_eq!(
            Intent::from_parts(IntentKind::SaveMemory, Some("buy milk".into())),
            Intent::SaveMemory("buy milk".into())
        );
        assert_eq!(
            Intent::from_parts(IntentKind::SaveMemory, None),
            Intent::MissingPayload(IntentKind::SaveMemory)
        );
        assert_eq!(
            Intent::from_parts(IntentKind::RecallName, Some("ignored".into())),
            Intent::RecallName
        );
        assert_eq!(IntentKind::RecallLastSeen.to_string(), "recall_last_seen");
    }
}
