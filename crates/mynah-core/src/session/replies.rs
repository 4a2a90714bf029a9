//! Templated replies for structured intents and failures.
//!
//! English, Hindi and Hinglish have their own wording; every other language
//! renders the English text.

use chrono::{DateTime, Utc};

use crate::types::{IntentKind, Language};

const LAST_SEEN_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A reply that does not come from the completion backend.
#[derive(Debug, Clone, PartialEq)]
pub enum Template<'a> {
    NameSaved(&'a str),
    NameKnown(&'a str),
    NameUnknown,
    BirthdateSaved(&'a str),
    BirthdateKnown(&'a str),
    BirthdateUnknown,
    LastSeen(DateTime<Utc>),
    LastSeenUnknown,
    Memories(&'a [String]),
    NoMemories,
    MemorySaved(&'a str),
    /// A save intent matched with nothing to save.
    AskForContent(IntentKind),
    EmptyMessage,
    BackendError,
    StoreError,
}

impl Template<'_> {
    pub fn render(&self, language: Language) -> String {
        match language {
            Language::Hindi => self.hindi(),
            Language::Hinglish => self.hinglish(),
            _ => self.english(),
        }
    }

    fn english(&self) -> String {
        match self {
            Template::NameSaved(name) => format!("Got it! I'll remember your name is {}.", name),
            Template::NameKnown(name) => format!("Of course! Your name is {}.", name),
            Template::NameUnknown => {
                "Hmm... I don't know your name yet! Tell me: 'My name is ...'".to_string()
            }
            Template::BirthdateSaved(date) => format!("Birthday saved as {}!", date),
            Template::BirthdateKnown(date) => format!("Your birthday is {}!", date),
            Template::BirthdateUnknown => {
                "I don't know your birthday yet! Tell me: 'My birth date is ...'".to_string()
            }
            Template::LastSeen(at) => {
                format!("We last talked on {}.", at.format(LAST_SEEN_FORMAT))
            }
            Template::LastSeenUnknown => "I don't remember when we last talked!".to_string(),
            Template::Memories(notes) => {
                format!("Here's what I remember for you:\n{}", bullets(notes))
            }
            Template::NoMemories => {
                "I haven't remembered anything for you yet. Want me to?".to_string()
            }
            Template::MemorySaved(note) => format!("Saved! I won't forget: '{}'", note),
            Template::AskForContent(kind) => match kind {
                IntentKind::SaveName => "What's your name?".to_string(),
                IntentKind::SaveBirthdate => "What's your birth date?".to_string(),
                _ => "What should I remember? Tell me something!".to_string(),
            },
            Template::EmptyMessage => "I didn't catch that. Could you say it again?".to_string(),
            Template::BackendError => {
                "Sorry, I can't answer right now. Please try again in a moment.".to_string()
            }
            Template::StoreError => {
                "Sorry, I couldn't get to your saved details right now.".to_string()
            }
        }
    }

    fn hindi(&self) -> String {
        match self {
            Template::NameSaved(name) => format!("ठीक है! मैं याद रखूँगा कि आपका नाम {} है।", name),
            Template::NameKnown(name) => format!("बिल्कुल! आपका नाम {} है।", name),
            Template::NameUnknown => {
                "मुझे अभी आपका नाम नहीं पता! बताइए: 'मेरा नाम ... है'".to_string()
            }
            Template::BirthdateSaved(date) => format!("जन्मदिन {} सेव कर लिया!", date),
            Template::BirthdateKnown(date) => format!("आपका जन्मदिन {} है!", date),
            Template::BirthdateUnknown => {
                "मुझे अभी आपका जन्मदिन नहीं पता! बताइए: 'मेरा जन्मदिन ...'".to_string()
            }
            Template::LastSeen(at) => {
                format!("हमने आखिरी बार {} को बात की थी।", at.format(LAST_SEEN_FORMAT))
            }
            Template::LastSeenUnknown => "मुझे याद नहीं कि हमने आखिरी बार कब बात की थी!".to_string(),
            Template::Memories(notes) => {
                format!("मुझे आपके लिए ये याद है:\n{}", bullets(notes))
            }
            Template::NoMemories => {
                "अभी तक कुछ भी याद नहीं रखा गया है! बोलो तो याद कर लूँ?".to_string()
            }
            Template::MemorySaved(note) => {
                format!("याद कर लिया! अब मैं ये नहीं भूलूँगा: '{}'", note)
            }
            Template::AskForContent(kind) => match kind {
                IntentKind::SaveName => "आपका नाम क्या है?".to_string(),
                IntentKind::SaveBirthdate => "आपका जन्मदिन कब है?".to_string(),
                _ => "क्या याद रखना है? कुछ तो बताओ!".to_string(),
            },
            Template::EmptyMessage => "मैं समझ नहीं पाया। फिर से कहिए?".to_string(),
            Template::BackendError => {
                "माफ़ कीजिए, अभी जवाब नहीं दे पा रहा हूँ। थोड़ी देर में फिर कोशिश करें।".to_string()
            }
            Template::StoreError => {
                "माफ़ कीजिए, अभी आपकी सेव की हुई जानकारी तक नहीं पहुँच पा रहा हूँ।".to_string()
            }
        }
    }

    fn hinglish(&self) -> String {
        match self {
            Template::NameSaved(name) => {
                format!("Done! Main yaad rakhunga ki aapka naam {} hai.", name)
            }
            Template::NameKnown(name) => format!("Bilkul! Aapka naam {} hai.", name),
            Template::NameUnknown => {
                "Mujhe abhi aapka naam nahi pata! Batao: 'Mera naam ... hai'".to_string()
            }
            Template::BirthdateSaved(date) => format!("Birthday {} save kar liya!", date),
            Template::BirthdateKnown(date) => format!("Aapka birthday {} hai!", date),
            Template::BirthdateUnknown => {
                "Mujhe abhi aapka birthday nahi pata! Batao: 'My birth date is ...'".to_string()
            }
            Template::LastSeen(at) => {
                format!("Humne last baar {} ko baat ki thi.", at.format(LAST_SEEN_FORMAT))
            }
            Template::LastSeenUnknown => "Yaad nahi ki humne last baar kab baat ki thi!".to_string(),
            Template::Memories(notes) => {
                format!("Mujhe aapke liye ye yaad hai:\n{}", bullets(notes))
            }
            Template::NoMemories => "Abhi tak kuch bhi yaad nahi rakha! Bolo toh yaad kar loon?"
                .to_string(),
            Template::MemorySaved(note) => {
                format!("Yaad kar liya! Ab main ye nahi bhoolunga: '{}'", note)
            }
            Template::AskForContent(kind) => match kind {
                IntentKind::SaveName => "Aapka naam kya hai?".to_string(),
                IntentKind::SaveBirthdate => "Aapka birthday kab hai?".to_string(),
                _ => "Kya yaad rakhna hai? Kuch toh batao!".to_string(),
            },
            Template::EmptyMessage => "Samajh nahi aaya. Phir se bolo?".to_string(),
            Template::BackendError => {
                "Sorry yaar, abhi reply nahi kar pa raha. Thodi der mein try karo.".to_string()
            }
            Template::StoreError => {
                "Sorry, abhi aapki saved details tak nahi pahunch pa raha.".to_string()
            }
        }
    }
}

fn bullets(notes: &[String]) -> String {
    notes
        .iter()
        .map(|note| format!("• {}", note))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_name_templates_include_name() {
        assert!(Template::NameKnown("Asha")
            .render(Language::English)
            .contains("Asha"));
        assert!(Template::NameKnown("Asha").render(Language::Hindi).contains("Asha"));
    }

    #[test]
    fn test_memory_list_preserves_order() {
        let notes = vec!["buy milk".to_string(), "call mom".to_string()];
        let text = Template::Memories(&notes).render(Language::English);
        let milk = text.find("buy milk").unwrap();
        let mom = text.find("call mom").unwrap();
        assert!(milk < mom);
    }

    #[test]
    fn test_last_seen_format() {
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(
            Template::LastSeen(at).render(Language::English),
            "We last talked on 2024-01-02 03:04:05."
        );
    }

    #[test]
    fn test_unsupported_languages_render_english() {
        assert_eq!(
            Template::NameUnknown.render(Language::Tamil),
            Template::NameUnknown.render(Language::English)
        );
    }

    #[test]
    fn test_ask_for_content_in_hindi() {
        assert_eq!(
            Template::AskForContent(IntentKind::SaveMemory).render(Language::Hindi),
            "क्या याद रखना है? कुछ तो बताओ!"
        );
    }
}
