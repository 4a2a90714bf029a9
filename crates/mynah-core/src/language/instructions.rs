//! System instruction table keyed by language.

use std::collections::HashMap;

use strum::IntoEnumIterator;

use crate::types::Language;

/// Instruction for the static strategy: let the backend mirror the user.
pub const MIRROR_INSTRUCTION: &str = "You are a witty and natural human assistant. \
Always reply in the exact same language and style as the user (Hindi, English, Hinglish, Marathi, Gujarati, Tamil, etc). \
If the user mixes languages, you also mix naturally. \
Never reply in English if the user uses Hindi or Hinglish. \
Focus on the main point and keep answers concise. \
Never translate the user's message unless they explicitly ask you to translate it.";

/// Built-in instruction for a detected language.
pub fn builtin_instruction(language: Language) -> &'static str {
    match language {
        Language::Hindi => {
            "You are a helpful AI assistant. Respond in Hindi only. Be natural and conversational \
             like a human friend. Use casual Hindi with some English words mixed in if needed."
        }
        Language::Hinglish => {
            "You are a helpful AI assistant. Respond in Hinglish (Hindi mixed with English). Be \
             natural and conversational like a human friend. Mix Hindi and English naturally."
        }
        Language::English => {
            "You are a helpful AI assistant. Respond in English only. Be natural and \
             conversational like a human friend."
        }
        Language::Marathi => {
            "You are a helpful AI assistant. Respond in Marathi only. Be natural and \
             conversational like a human friend."
        }
        Language::Gujarati => {
            "You are a helpful AI assistant. Respond in Gujarati only. Be natural and \
             conversational like a human friend."
        }
        Language::Tamil => {
            "You are a helpful AI assistant. Respond in Tamil only. Be natural and \
             conversational like a human friend."
        }
    }
}

/// Language → instruction lookup with a default-language fallback.
#[derive(Debug, Clone)]
pub struct InstructionTable {
    entries: HashMap<Language, String>,
    default_language: Language,
}

impl InstructionTable {
    /// Built-in entries for every language, replaced where `overrides` has one.
    pub fn new(default_language: Language, overrides: &HashMap<Language, String>) -> Self {
        let mut entries: HashMap<Language, String> = Language::iter()
            .map(|lang| (lang, builtin_instruction(lang).to_string()))
            .collect();
        entries.extend(overrides.iter().map(|(lang, text)| (*lang, text.clone())));
        Self {
            entries,
            default_language,
        }
    }

    /// Only the given entries; no built-ins.
    pub fn with_entries(default_language: Language, entries: HashMap<Language, String>) -> Self {
        Self {
            entries,
            default_language,
        }
    }

    pub fn default_language(&self) -> Language {
        self.default_language
    }

    /// Instruction for `language`, else the default language's, else built-in English.
    pub fn instruction_for(&self, language: Language) -> &str {
        self.entries
            .get(&language)
            .or_else(|| self.entries.get(&self.default_language))
            .map(String::as_str)
            .unwrap_or_else(|| builtin_instruction(Language::English))
    }
}

impl Default for InstructionTable {
    fn default() -> Self {
        Self::new(Language::default(), &HashMap::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_entries() {
        let table = InstructionTable::default();
        assert!(table.instruction_for(Language::Tamil).contains("Tamil"));
        assert!(table.instruction_for(Language::Hinglish).contains("Hinglish"));
    }

    #[test]
    fn test_override_replaces_builtin() {
        let mut overrides = HashMap::new();
        overrides.insert(Language::Hindi, "Sirf Hindi mein jawab do.".to_string());
        let table = InstructionTable::new(Language::English, &overrides);

        assert_eq!(table.instruction_for(Language::Hindi), "Sirf Hindi mein jawab do.");
        assert!(table.instruction_for(Language::English).contains("English only"));
    }

    #[test]
    fn test_missing_entry_falls_back_to_default_language() {
        let mut entries = HashMap::new();
        entries.insert(Language::Hindi, "hindi instruction".to_string());
        let table = InstructionTable::with_entries(Language::Hindi, entries);

        assert_eq!(table.instruction_for(Language::Gujarati), "hindi instruction");
    }

    #[test]
    fn test_empty_table_uses_builtin_english() {
        let table = InstructionTable::with_entries(Language::Tamil, HashMap::new());
        assert_eq!(
            table.instruction_for(Language::Marathi),
            builtin_instruction(Language::English)
        );
    }
}
