//! Configuration system for mynah.
//!
//! Loaded once at process start and treated as immutable afterwards.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use strum::{Display, EnumString};

use crate::error::{MynahError, MynahResult};
use crate::traits::LlmConfig;
use crate::types::Language;

/// Completion backend type.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LlmProvider {
    /// OpenRouter or any other OpenAI-compatible chat completions endpoint.
    #[default]
    OpenRouter,
    OpenAI,
    Anthropic,
}

impl LlmProvider {
    /// Environment variable holding this provider's credential.
    pub fn api_key_env(&self) -> &'static str {
        match self {
            LlmProvider::OpenRouter => "OPENROUTER_API_KEY",
            LlmProvider::OpenAI => "OPENAI_API_KEY",
            LlmProvider::Anthropic => "ANTHROPIC_API_KEY",
        }
    }
}

/// Provider configuration with type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LlmProviderConfig {
    /// Provider type.
    #[serde(default)]
    pub provider: LlmProvider,
    /// Provider-specific configuration.
    #[serde(flatten)]
    pub config: LlmConfig,
}

/// How many free-text notes each user may keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryCapacity {
    /// Keep every note for the life of the process.
    Unbounded,
    /// Keep at most this many notes; the oldest is dropped first.
    MaxNotes(usize),
}

impl Default for MemoryCapacity {
    fn default() -> Self {
        MemoryCapacity::MaxNotes(100)
    }
}

/// Per-user session settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Number of turns kept in the conversation window (N).
    pub window_size: usize,
    /// Deadline for one completion call, in seconds.
    pub completion_timeout_secs: u64,
    /// Capacity policy for memory notes.
    pub memory_capacity: MemoryCapacity,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            window_size: 10,
            completion_timeout_secs: 30,
            memory_capacity: MemoryCapacity::default(),
        }
    }
}

/// Which language adapter strategy to use.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LanguageStrategy {
    /// Score the message against per-language markers and pick an instruction.
    #[default]
    Heuristic,
    /// Always send one instruction asking the model to mirror the user.
    Static,
}

/// Language steering settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LanguageConfig {
    pub strategy: LanguageStrategy,
    /// Used when detection finds nothing and for replies when detection is off.
    pub default_language: Language,
    /// Overrides for the built-in per-language instructions.
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub instructions: HashMap<Language, String>,
}

/// Main mynah configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MynahConfig {
    /// Completion backend configuration.
    pub llm: LlmProviderConfig,
    /// Session and state settings.
    pub session: SessionConfig,
    /// Language adapter settings.
    pub language: LanguageConfig,
}

impl MynahConfig {
    /// Default location of the config file: `~/.mynah/config.toml`.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .map(|h| h.join(".mynah"))
            .unwrap_or_else(|| PathBuf::from(".mynah"))
            .join("config.toml")
    }

    /// Load configuration from a file (TOML, JSON, or YAML).
    pub fn from_file(path: impl AsRef<Path>) -> MynahResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let ext = path.as_ref().extension().and_then(|e| e.to_str());

        match ext {
            Some("toml") => {
                toml::from_str(&content).map_err(|e| MynahError::Configuration(e.to_string()))
            }
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| MynahError::Configuration(e.to_string())),
            Some("yaml" | "yml") => serde_yaml::from_str(&content)
                .map_err(|e| MynahError::Configuration(e.to_string())),
            _ => Err(MynahError::Configuration(
                "Unsupported config file format. Use .toml, .json, or .yaml".to_string(),
            )),
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> MynahResult<Self> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Load configuration the way the server does at startup.
    ///
    /// Reads the file named by `MYNAH_CONFIG`, else `~/.mynah/config.toml` when it
    /// exists, else defaults; environment variables are applied on top.
    pub fn load() -> MynahResult<Self> {
        let base = match std::env::var("MYNAH_CONFIG") {
            Ok(path) => Self::from_file(path)?,
            Err(_) => {
                let path = Self::default_path();
                if path.exists() {
                    Self::from_file(path)?
                } else {
                    Self::default()
                }
            }
        };
        let config = base.with_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (normally the process environment).
    ///
    /// Reads:
    /// - `MYNAH_LLM_PROVIDER`, `MYNAH_LLM_MODEL`, `MYNAH_LLM_BASE_URL`
    /// - `MYNAH_LLM_API_KEY`, falling back to the provider's own key variable
    /// - `MYNAH_WINDOW_SIZE`, `MYNAH_COMPLETION_TIMEOUT_SECS`, `MYNAH_MAX_MEMORY_NOTES`
    ///   (`0` means unbounded)
    /// - `MYNAH_LANGUAGE_STRATEGY`, `MYNAH_DEFAULT_LANGUAGE`
    pub fn with_overrides<F>(mut self, lookup: F) -> MynahResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(provider) = lookup("MYNAH_LLM_PROVIDER") {
            self.llm.provider = LlmProvider::from_str(&provider).map_err(|_| {
                MynahError::UnsupportedProvider {
                    provider: provider.clone(),
                }
            })?;
        }
        if let Some(model) = lookup("MYNAH_LLM_MODEL") {
            self.llm.config.model = model;
        }
        if let Some(base_url) = lookup("MYNAH_LLM_BASE_URL") {
            self.llm.config.base_url = Some(base_url);
        }
        if let Some(api_key) =
            lookup("MYNAH_LLM_API_KEY").or_else(|| lookup(self.llm.provider.api_key_env()))
        {
            self.llm.config.api_key = Some(api_key);
        }

        if let Some(size) = lookup("MYNAH_WINDOW_SIZE") {
            self.session.window_size = parse_number("MYNAH_WINDOW_SIZE", &size)?;
        }
        if let Some(secs) = lookup("MYNAH_COMPLETION_TIMEOUT_SECS") {
            self.session.completion_timeout_secs =
                parse_number("MYNAH_COMPLETION_TIMEOUT_SECS", &secs)?;
        }
        if let Some(max) = lookup("MYNAH_MAX_MEMORY_NOTES") {
            self.session.memory_capacity =
                match parse_number::<usize>("MYNAH_MAX_MEMORY_NOTES", &max)? {
                    0 => MemoryCapacity::Unbounded,
                    n => MemoryCapacity::MaxNotes(n),
                };
        }

        if let Some(strategy) = lookup("MYNAH_LANGUAGE_STRATEGY") {
            self.language.strategy = LanguageStrategy::from_str(&strategy).map_err(|_| {
                MynahError::Configuration(format!("Unknown language strategy: {}", strategy))
            })?;
        }
        if let Some(language) = lookup("MYNAH_DEFAULT_LANGUAGE") {
            self.language.default_language = Language::from_str(&language).map_err(|_| {
                MynahError::Configuration(format!("Unknown language: {}", language))
            })?;
        }

        Ok(self)
    }

    /// Reject values the session cannot run with.
    pub fn validate(&self) -> MynahResult<()> {
        if self.session.window_size == 0 {
            return Err(MynahError::Configuration(
                "session.window_size must be at least 1".to_string(),
            ));
        }
        if self.session.completion_timeout_secs == 0 {
            return Err(MynahError::Configuration(
                "session.completion_timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.session.memory_capacity == MemoryCapacity::MaxNotes(0) {
            return Err(MynahError::Configuration(
                "session.memory_capacity.max_notes must be at least 1; use \"unbounded\" to disable the cap"
                    .to_string(),
            ));
        }
        if self.llm.config.model.trim().is_empty() {
            return Err(MynahError::missing("llm.model"));
        }
        Ok(())
    }

    /// Build configuration using builder pattern.
    pub fn builder() -> MynahConfigBuilder {
        MynahConfigBuilder::default()
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> MynahResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| MynahError::Configuration(format!("{} must be a number, got '{}'", key, value)))
}

/// Builder for MynahConfig.
#[derive(Default)]
pub struct MynahConfigBuilder {
    config: MynahConfig,
}

impl MynahConfigBuilder {
    /// Set LLM configuration.
    pub fn llm(mut self, config: LlmProviderConfig) -> Self {
        self.config.llm = config;
        self
    }

    /// Set the model identifier.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.llm.config.model = model.into();
        self
    }

    /// Set the conversation window size.
    pub fn window_size(mut self, size: usize) -> Self {
        self.config.session.window_size = size;
        self
    }

    /// Set the completion deadline.
    pub fn completion_timeout_secs(mut self, secs: u64) -> Self {
        self.config.session.completion_timeout_secs = secs;
        self
    }

    /// Set the memory note capacity policy.
    pub fn memory_capacity(mut self, capacity: MemoryCapacity) -> Self {
        self.config.session.memory_capacity = capacity;
        self
    }

    /// Set the language strategy.
    pub fn language_strategy(mut self, strategy: LanguageStrategy) -> Self {
        self.config.language.strategy = strategy;
        self
    }

    /// Set the default language.
    pub fn default_language(mut self, language: Language) -> Self {
        self.config.language.default_language = language;
        self
    }

    /// Override the instruction used for one language.
    pub fn instruction(mut self, language: Language, instruction: impl Into<String>) -> Self {
        self.config
            .language
            .instructions
            .insert(language, instruction.into());
        self
    }

    /// Build the configuration.
    pub fn build(self) -> MynahConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = MynahConfig::default();
        assert_eq!(config.llm.provider, LlmProvider::OpenRouter);
        assert_eq!(config.llm.config.model, "mistralai/mistral-7b-instruct");
        assert_eq!(config.session.window_size, 10);
        assert_eq!(config.session.completion_timeout_secs, 30);
        assert_eq!(config.session.memory_capacity, MemoryCapacity::MaxNotes(100));
        assert_eq!(config.language.strategy, LanguageStrategy::Heuristic);
        assert_eq!(config.language.default_language, Language::English);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let config = MynahConfig::default()
            .with_overrides(lookup_from(&[
                ("MYNAH_LLM_PROVIDER", "Anthropic"),
                ("ANTHROPIC_API_KEY", "sk-ant"),
                ("OPENROUTER_API_KEY", "sk-or"),
                ("MYNAH_WINDOW_SIZE", "8"),
                ("MYNAH_MAX_MEMORY_NOTES", "0"),
                ("MYNAH_LANGUAGE_STRATEGY", "static"),
                ("MYNAH_DEFAULT_LANGUAGE", "hindi"),
            ]))
            .unwrap();

        assert_eq!(config.llm.provider, LlmProvider::Anthropic);
        assert_eq!(config.llm.config.api_key.as_deref(), Some("sk-ant"));
        assert_eq!(config.session.window_size, 8);
        assert_eq!(config.session.memory_capacity, MemoryCapacity::Unbounded);
        assert_eq!(config.language.strategy, LanguageStrategy::Static);
        assert_eq!(config.language.default_language, Language::Hindi);
    }

    #[test]
    fn test_bad_env_values() {
        let err = MynahConfig::default()
            .with_overrides(lookup_from(&[("MYNAH_WINDOW_SIZE", "ten")]))
            .unwrap_err();
        assert!(err.to_string().contains("MYNAH_WINDOW_SIZE"));

        let err = MynahConfig::default()
            .with_overrides(lookup_from(&[("MYNAH_LLM_PROVIDER", "carrier-pigeon")]))
            .unwrap_err();
        assert!(matches!(err, MynahError::UnsupportedProvider { .. }));
    }

    #[test]
    fn test_validate_rejects_zero_window() {
        let config = MynahConfig::builder().window_size(0).build();
        assert!(matches!(
            config.validate(),
            Err(MynahError::Configuration(_))
        ));

        let config = MynahConfig::builder()
            .memory_capacity(MemoryCapacity::MaxNotes(0))
            .build();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[llm]
provider = "openai"
model = "gpt-4o-mini"
temperature = 0.8

[session]
window_size = 8
memory_capacity = "unbounded"

[language]
strategy = "static"
default_language = "hinglish"

[language.instructions]
tamil = "Reply in Tamil, briefly."
"#
        )
        .unwrap();

        let config = MynahConfig::from_file(file.path()).unwrap();
        assert_eq!(config.llm.provider, LlmProvider::OpenAI);
        assert_eq!(config.llm.config.model, "gpt-4o-mini");
        assert_eq!(config.llm.config.max_tokens, 1000);
        assert_eq!(config.session.window_size, 8);
        assert_eq!(config.session.completion_timeout_secs, 30);
        assert_eq!(config.session.memory_capacity, MemoryCapacity::Unbounded);
        assert_eq!(config.language.default_language, Language::Hinglish);
        assert_eq!(
            config.language.instructions.get(&Language::Tamil).map(String::as_str),
            Some("Reply in Tamil, briefly.")
        );
    }

    #[test]
    fn test_from_json_file_with_capped_memory() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{"session": {{"memory_capacity": {{"max_notes": 5}}}}}}"#
        )
        .unwrap();

        let config = MynahConfig::from_file(file.path()).unwrap();
        assert_eq!(config.session.memory_capacity, MemoryCapacity::MaxNotes(5));
        assert_eq!(config.session.window_size, 10);
    }

    #[test]
    fn test_unsupported_extension() {
        let file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
        assert!(MynahConfig::from_file(file.path()).is_err());
    }
}
