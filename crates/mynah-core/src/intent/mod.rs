//! Intent matching for structured commands.
//!
//! Messages that save or recall profile facts and notes are answered from
//! state; everything else falls through to the completion backend.

mod matcher;
mod rules;

pub use matcher::IntentMatcher;
pub use rules::{default_rules, title_case, Extractor, IntentRule, RuleOutcome, PRIORITY};
