//! Declarative intent rules.
//!
//! Each rule maps one surface pattern (in any language or script) to an intent
//! tag plus an extractor for the payload. The built-in table is ordered by
//! priority group: name-save, birthdate-save, name-recall, birthdate-recall,
//! last-seen-recall, memory-recall, memory-save.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{MynahError, MynahResult};
use crate::types::IntentKind;

/// Group order the built-in rules follow. Earlier groups win.
pub const PRIORITY: [IntentKind; 7] = [
    IntentKind::SaveName,
    IntentKind::SaveBirthdate,
    IntentKind::RecallName,
    IntentKind::RecallBirthdate,
    IntentKind::RecallLastSeen,
    IntentKind::RecallMemory,
    IntentKind::SaveMemory,
];

// Captured "names" that are really the start of a question or negation.
const NOT_A_NAME: &[&str] = &["what", "not", "kya", "kaun", "क्या", "कौन"];

/// How to turn the first capture group into a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extractor {
    /// The rule carries no payload.
    None,
    /// Trimmed free text; empty text means the user gave nothing to save.
    Text,
    /// A single name, title-cased. Question words mean the rule does not apply.
    Name,
    /// A date as typed, trimmed.
    Date,
}

/// What applying one rule to a message produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    NoMatch,
    /// The pattern matched; `None` means the payload came out empty.
    Matched(Option<String>),
}

/// One surface pattern mapped to an intent.
#[derive(Debug, Clone)]
pub struct IntentRule {
    pub kind: IntentKind,
    pub pattern: Regex,
    pub extractor: Extractor,
}

impl IntentRule {
    /// Compile a rule. Patterns are searched anywhere in the message.
    pub fn new(kind: IntentKind, pattern: &str, extractor: Extractor) -> MynahResult<Self> {
        let pattern = Regex::new(pattern).map_err(|e| {
            MynahError::Configuration(format!("Invalid intent pattern for {}: {}", kind, e))
        })?;
        Ok(Self {
            kind,
            pattern,
            extractor,
        })
    }

    /// Try this rule against a message.
    pub fn apply(&self, message: &str) -> RuleOutcome {
        let Some(captures) = self.pattern.captures(message) else {
            return RuleOutcome::NoMatch;
        };
        let captured = captures.get(1).map(|m| m.as_str()).unwrap_or("");

        match self.extractor {
            Extractor::None => RuleOutcome::Matched(None),
            Extractor::Text | Extractor::Date => {
                let text = captured
                    .trim()
                    .trim_start_matches([':', '-'])
                    .trim();
                RuleOutcome::Matched(non_empty(text))
            }
            Extractor::Name => {
                let name = captured.trim();
                if NOT_A_NAME.iter().any(|w| w.eq_ignore_ascii_case(name)) {
                    RuleOutcome::NoMatch
                } else {
                    RuleOutcome::Matched(non_empty(&title_case(name)))
                }
            }
        }
    }
}

fn non_empty(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Uppercase the first letter of each word and lowercase the rest.
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn builtin(kind: IntentKind, pattern: &str, extractor: Extractor) -> IntentRule {
    IntentRule::new(kind, pattern, extractor).unwrap()
}

static DEFAULT_RULES: Lazy<Vec<IntentRule>> = Lazy::new(|| {
    use Extractor as E;
    use IntentKind::*;

    vec![
        // Name save
        builtin(SaveName, r"(?i)\bmy name is\b\s*([\p{L}\p{M}]*)", E::Name),
        builtin(SaveName, r"मेरा नाम\s*([\p{L}\p{M}]*)\s*है", E::Name),
        builtin(SaveName, r"(?i)\bmera naam\s*([\p{L}\p{M}]*)\s*hai\b", E::Name),
        // Birthdate save
        builtin(SaveBirthdate, r"(?i)\bmy birth ?(?:date|day) is\b\s*([\d\-/.]*)", E::Date),
        builtin(SaveBirthdate, r"मेरा जन्मदिन\s+(\d[\d\-/.]*)", E::Date),
        builtin(SaveBirthdate, r"^\s*मेरा जन्मदिन\s*(?:है)?\s*[।.!]?\s*$", E::Date),
        // Name recall
        builtin(RecallName, r"(?i)\bwhat(?:'s| is) my name\b", E::None),
        builtin(RecallName, r"(?i)\bdo you (?:know|remember) my name\b", E::None),
        builtin(RecallName, r"मेरा नाम क्या है", E::None),
        builtin(RecallName, r"(?i)\bmera naam kya hai\b", E::None),
        // Birthdate recall
        builtin(RecallBirthdate, r"(?i)\bwhat(?:'?s| is) my birth ?date\b", E::None),
        builtin(RecallBirthdate, r"(?i)\bwhen is my birthday\b", E::None),
        builtin(RecallBirthdate, r"मेरा जन्मदिन कब है", E::None),
        // Last-seen recall
        builtin(RecallLastSeen, r"(?i)\bwhen did we last talk\b", E::None),
        builtin(RecallLastSeen, r"(?i)\blast time we talked\b", E::None),
        builtin(RecallLastSeen, r"हमने आखिरी बार कब बात की थी", E::None),
        // Memory recall
        builtin(RecallMemory, r"(?i)\bwhat did i ask you to remember\b", E::None),
        builtin(RecallMemory, r"(?i)\bmy notes\b", E::None),
        builtin(RecallMemory, r"(?i)\bshow (?:my )?memor(?:y|ies)\b", E::None),
        builtin(RecallMemory, r"क्या याद है", E::None),
        builtin(RecallMemory, r"क्या तुमने कुछ याद रखा है", E::None),
        builtin(RecallMemory, r"मेरी यादें", E::None),
        builtin(RecallMemory, r"याद दिलाओ", E::None),
        // Memory save
        builtin(SaveMemory, r"(?is)\bremember\b[:\-]?\s*(.*)", E::Text),
        builtin(SaveMemory, r"(?is)\bremind me\b[:\-]?\s*(.*)", E::Text),
        builtin(SaveMemory, r"(?is)\bsave this\b[:\-]?\s*(.*)", E::Text),
        builtin(SaveMemory, r"(?s)याद रखो[:\-]?\s*(.*)", E::Text),
        builtin(SaveMemory, r"(?s)ये याद रखना[:\-]?\s*(.*)", E::Text),
        builtin(SaveMemory, r"(?s)मुझे याद दिलाना[:\-]?\s*(.*)", E::Text),
    ]
});

/// The built-in rule table, in priority order.
pub fn default_rules() -> Vec<IntentRule> {
    DEFAULT_RULES.clone()
}
