//! Factory for creating completion clients.

use std::sync::Arc;

use mynah_core::config::{LlmProvider, LlmProviderConfig};
use mynah_core::error::MynahResult;
use mynah_core::traits::{Llm, LlmConfig};

use crate::anthropic::AnthropicLlm;
use crate::openai::OpenAIProvider;
use crate::openrouter::OpenRouterLlm;

/// Factory for creating completion clients.
pub struct LlmFactory;

impl LlmFactory {
    /// Create a client for the given provider.
    pub fn create(provider: LlmProvider, config: LlmConfig) -> MynahResult<Arc<dyn Llm>> {
        match provider {
            LlmProvider::OpenRouter => Ok(Arc::new(OpenRouterLlm::new(config)?)),
            LlmProvider::OpenAI => Ok(Arc::new(OpenAIProvider::new(config)?)),
            LlmProvider::Anthropic => Ok(Arc::new(AnthropicLlm::new(config)?)),
        }
    }

    /// Create the client described by a provider section of the configuration.
    pub fn from_config(config: &LlmProviderConfig) -> MynahResult<Arc<dyn Llm>> {
        Self::create(config.provider, config.config.clone())
    }

    /// Create an OpenRouter client with default configuration.
    pub fn openrouter() -> MynahResult<Arc<dyn Llm>> {
        Self::create(LlmProvider::OpenRouter, LlmConfig::default())
    }

    /// Create an OpenRouter client for a specific model.
    pub fn openrouter_with_model(model: impl Into<String>) -> MynahResult<Arc<dyn Llm>> {
        let config = LlmConfig {
            model: model.into(),
            ..Default::default()
        };
        Self::create(LlmProvider::OpenRouter, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mynah_core::error::ErrorCode;

    fn keyed(model: &str) -> LlmConfig {
        LlmConfig {
            model: model.to_string(),
            api_key: Some("sk-test".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_each_provider() {
        let llm = LlmFactory::create(LlmProvider::OpenRouter, keyed("meta-llama/llama-3-8b-instruct"))
            .unwrap();
        assert_eq!(llm.model_name(), "meta-llama/llama-3-8b-instruct");

        let llm = LlmFactory::create(LlmProvider::Anthropic, keyed("claude-3-5-sonnet-20240620"))
            .unwrap();
        assert_eq!(llm.model_name(), "claude-3-5-sonnet-20240620");

        let llm = LlmFactory::create(LlmProvider::OpenAI, keyed("gpt-4o")).unwrap();
        assert_eq!(llm.model_name(), "gpt-4o");
    }

    #[test]
    fn test_blank_key_is_missing_configuration() {
        let config = LlmProviderConfig {
            provider: LlmProvider::OpenRouter,
            config: LlmConfig {
                api_key: Some(String::new()),
                ..Default::default()
            },
        };
        match LlmFactory::from_config(&config) {
            Err(err) => assert_eq!(err.code(), ErrorCode::CfgMissing),
            Ok(_) => panic!("expected a missing-configuration error"),
        }
    }
}
