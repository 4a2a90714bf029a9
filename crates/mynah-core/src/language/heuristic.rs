//! Marker-count language detection.
//!
//! Every language has a set of marker patterns: script ranges, pronouns,
//! auxiliaries and question words. A message scores one point per pattern
//! match. The highest score wins, ties go to the language declared first, and
//! a message with no markers at all gets the configured default.

use once_cell::sync::Lazy;
use regex::Regex;
use strum::IntoEnumIterator;
use tracing::debug;

use super::instructions::InstructionTable;
use crate::config::LanguageConfig;
use crate::traits::LanguageAdapter;
use crate::types::Language;

static MARKERS: Lazy<Vec<(Language, Vec<Regex>)>> = Lazy::new(|| {
    let set = |patterns: &[&str]| -> Vec<Regex> {
        patterns.iter().map(|p| Regex::new(p).unwrap()).collect()
    };

    vec![
        (
            Language::Hindi,
            set(&[
                r"[क-ह]",
                r"[ा-ौ]",
                r"[ं-ः]",
                r"\b(है|हूं|कर|दे|ले|जा|आ|गया|आया|किया|दिया)\b",
                r"\b(क्या|कैसे|कहाँ|कब|कौन|कौनसा)\b",
                r"\b(मैं|तुम|आप|हम|वह|यह|वो|ये)\b",
            ]),
        ),
        (
            Language::Hinglish,
            set(&[
                r"(?i)\b(ok|okay|yes|no|good|bad|nice|cool|awesome)\b",
                r"(?i)\b(thanks|thank you|please|sorry|excuse)\b",
                r"(?i)\b(kya|hai|hain|haan|nahi|nahin|mera|meri|mujhe|tum|tera|aap|kaise|kaisa|acha|accha|theek|yaar|bhai|kuch|bahut|karo|chalo|abhi)\b",
                r"[क-ह].*[a-zA-Z]|[a-zA-Z].*[क-ह]",
            ]),
        ),
        (
            Language::English,
            set(&[
                r"(?i)\b(what|how|when|where|why|who|which)\b",
                r"(?i)\b(is|are|was|were|am|be|been|being)\b",
                r"(?i)\b(i|you|he|she|it|we|they|me|him|her|us|them)\b",
            ]),
        ),
        (
            Language::Marathi,
            set(&[
                r"[क-ह]",
                r"[ा-ौ]",
                r"[ं-ः]",
                r"\b(आहे|आहोत|करतो|करते|जातो|जाते)\b",
                r"\b(मी|तू|तुम्ही|आम्ही|तो|ती|ते)\b",
            ]),
        ),
        (
            Language::Gujarati,
            set(&[
                r"[ક-હ]",
                r"[ા-ૌ]",
                r"[ં-ઃ]",
                r"\b(છે|છું|કરું|દેઉં|જાઉં|આવું)\b",
                r"\b(હું|તું|તમે|આપણે|તે|આ|એ)\b",
            ]),
        ),
        (
            Language::Tamil,
            set(&[
                r"[அ-ஹ]",
                r"[ா-ௌ]",
                r"[ஂ-ஃ]",
                r"\b(உள்ளது|உள்ளேன்|செய்கிறேன்|போகிறேன்)\b",
                r"\b(நான்|நீ|நீங்கள்|நாம்|அவன்|அவள்|அது)\b",
            ]),
        ),
    ]
});

/// Picks a language from marker counts and emits that language's instruction.
#[derive(Debug, Clone, Default)]
pub struct HeuristicAdapter {
    table: InstructionTable,
}

impl HeuristicAdapter {
    pub fn new(table: InstructionTable) -> Self {
        Self { table }
    }

    pub fn from_config(config: &LanguageConfig) -> Self {
        Self::new(InstructionTable::new(
            config.default_language,
            &config.instructions,
        ))
    }

    /// Marker count for every language, in declared order.
    pub fn scores(&self, message: &str) -> Vec<(Language, usize)> {
        Language::iter()
            .map(|lang| {
                let score: usize = MARKERS
                    .iter()
                    .filter(|(l, _)| *l == lang)
                    .flat_map(|(_, patterns)| patterns.iter())
                    .map(|p| p.find_iter(message).count())
                    .sum();
                (lang, score)
            })
            .collect()
    }

    /// The winning language, or the default when nothing scored.
    pub fn classify(&self, message: &str) -> Language {
        let mut best = (self.table.default_language(), 0);
        // Strictly greater keeps the earlier language on ties.
        for (lang, score) in self.scores(message) {
            if score > best.1 {
                best = (lang, score);
            }
        }
        best.0
    }
}

impl LanguageAdapter for HeuristicAdapter {
    fn detect(&self, message: &str) -> Option<Language> {
        Some(self.classify(message))
    }

    fn build_system_instruction(&self, message: &str) -> String {
        let language = self.classify(message);
        debug!(language = %language, "Selected reply language");
        self.table.instruction_for(language).to_string()
    }

    fn name(&self) -> &'static str {
        "heuristic"
    }
}
