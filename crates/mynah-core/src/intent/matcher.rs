//! Rule-driven intent classification.

use tracing::debug;

use super::rules::{default_rules, IntentRule, RuleOutcome};
use crate::types::Intent;

/// Classifies a message into at most one intent.
///
/// Rules are tried in order and the first one that matches wins. Matching is
/// pure: no state is read or written here.
#[derive(Debug, Clone)]
pub struct IntentMatcher {
    rules: Vec<IntentRule>,
}

impl Default for IntentMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentMatcher {
    /// Matcher with the built-in English and Hindi rule table.
    pub fn new() -> Self {
        Self {
            rules: default_rules(),
        }
    }

    /// Matcher with a caller-supplied rule table, already in priority order.
    pub fn with_rules(rules: Vec<IntentRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[IntentRule] {
        &self.rules
    }

    pub fn classify(&self, message: &str) -> Intent {
        for rule in &self.rules {
            if let RuleOutcome::Matched(payload) = rule.apply(message) {
                let intent = Intent::from_parts(rule.kind, payload);
                debug!(kind = %rule.kind, pattern = rule.pattern.as_str(), "Intent matched");
                return intent;
            }
        }
        Intent::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::rules::Extractor;
    use crate::types::IntentKind;

    fn classify(message: &str) -> Intent {
        IntentMatcher::new().classify(message)
    }

    #[test]
    fn test_save_name_english() {
        assert_eq!(classify("Hi, my name is asha"), Intent::SaveName("Asha".into()));
        assert_eq!(classify("MY NAME IS Ravi!"), Intent::SaveName("Ravi".into()));
    }

    #[test]
    fn test_save_name_hindi() {
        assert_eq!(classify("मेरा नाम राहुल है"), Intent::SaveName("राहुल".into()));
        assert_eq!(classify("mera naam priya hai"), Intent::SaveName("Priya".into()));
    }

    #[test]
    fn test_hindi_name_question_is_recall() {
        assert_eq!(classify("मेरा नाम क्या है?"), Intent::RecallName);
        assert_eq!(classify("mera naam kya hai"), Intent::RecallName);
    }

    #[test]
    fn test_save_birthdate() {
        assert_eq!(
            classify("my birthday is 12-05-1990"),
            Intent::SaveBirthdate("12-05-1990".into())
        );
        assert_eq!(
            classify("My birth date is 1990/05/12"),
            Intent::SaveBirthdate("1990/05/12".into())
        );
        assert_eq!(
            classify("मेरा जन्मदिन 12/05/1990 है"),
            Intent::SaveBirthdate("12/05/1990".into())
        );
    }

    #[test]
    fn test_recalls() {
        assert_eq!(classify("What is my name?"), Intent::RecallName);
        assert_eq!(classify("when is my birthday"), Intent::RecallBirthdate);
        assert_eq!(classify("मेरा जन्मदिन कब है"), Intent::RecallBirthdate);
        assert_eq!(classify("When did we last talk?"), Intent::RecallLastSeen);
        assert_eq!(classify("हमने आखिरी बार कब बात की थी"), Intent::RecallLastSeen);
        assert_eq!(classify("show my memories"), Intent::RecallMemory);
        assert_eq!(classify("क्या याद है"), Intent::RecallMemory);
    }

    #[test]
    fn test_save_memory() {
        assert_eq!(
            classify("remember to buy milk"),
            Intent::SaveMemory("to buy milk".into())
        );
        assert_eq!(
            classify("Remind me: call mom on Sunday"),
            Intent::SaveMemory("call mom on Sunday".into())
        );
        assert_eq!(
            classify("याद रखो दवाई 9 बजे"),
            Intent::SaveMemory("दवाई 9 बजे".into())
        );
    }

    #[test]
    fn test_empty_memory_payload() {
        assert_eq!(
            classify("remember"),
            Intent::MissingPayload(IntentKind::SaveMemory)
        );
        assert_eq!(
            classify("save this:   "),
            Intent::MissingPayload(IntentKind::SaveMemory)
        );
    }

    #[test]
    fn test_empty_profile_payloads() {
        assert_eq!(
            classify("my name is"),
            Intent::MissingPayload(IntentKind::SaveName)
        );
        assert_eq!(
            classify("मेरा नाम है"),
            Intent::MissingPayload(IntentKind::SaveName)
        );
        assert_eq!(
            classify("my birth date is"),
            Intent::MissingPayload(IntentKind::SaveBirthdate)
        );
        assert_eq!(
            classify("मेरा जन्मदिन"),
            Intent::MissingPayload(IntentKind::SaveBirthdate)
        );
        // Question words are not names, and "isn't" is not "is".
        assert_eq!(classify("my name is what?"), Intent::None);
        assert_eq!(classify("my name isn't important"), Intent::None);
    }

    #[test]
    fn test_recall_beats_memory_save() {
        // Both "remember" and the name question match; name recall ranks higher.
        assert_eq!(classify("remember, what is my name?"), Intent::RecallName);
        assert_eq!(classify("do you remember my name"), Intent::RecallName);
    }

    #[test]
    fn test_name_save_beats_memory_save() {
        assert_eq!(
            classify("remember that my name is kiran"),
            Intent::SaveName("Kiran".into())
        );
    }

    #[test]
    fn test_no_intent() {
        assert_eq!(classify("Tell me a joke about cats"), Intent::None);
        assert_eq!(classify(""), Intent::None);
    }

    #[test]
    fn test_custom_rules() {
        let rules = vec![IntentRule::new(
            IntentKind::RecallLastSeen,
            r"(?i)\bkab mile the\b",
            Extractor::None,
        )
        .unwrap()];
        let matcher = IntentMatcher::with_rules(rules);

        assert_eq!(matcher.classify("hum kab mile the?"), Intent::RecallLastSeen);
        assert_eq!(matcher.classify("what is my name"), Intent::None);
    }
}
