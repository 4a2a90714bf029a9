//! OpenAI provider implementation.

use async_trait::async_trait;

use mynah_core::error::{MynahError, MynahResult};
use mynah_core::traits::{GenerationOptions, Llm, LlmConfig, LlmResponse};
use mynah_core::types::Message;

use crate::credentials::resolve_api_key;

#[cfg(feature = "openai")]
use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestAssistantMessage, ChatCompletionRequestAssistantMessageContent,
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
        ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage,
        ChatCompletionRequestUserMessageContent, CreateChatCompletionRequest,
    },
    Client,
};
#[cfg(feature = "openai")]
use mynah_core::traits::TokenUsage;
#[cfg(feature = "openai")]
use mynah_core::types::MessageRole;

const API_KEY_ENV: &str = "OPENAI_API_KEY";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// OpenAI provider.
pub struct OpenAIProvider {
    #[cfg(feature = "openai")]
    client: Client<OpenAIConfig>,
    config: LlmConfig,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider.
    pub fn new(config: LlmConfig) -> MynahResult<Self> {
        let api_key = resolve_api_key(config.api_key.as_deref(), API_KEY_ENV)?;

        #[cfg(feature = "openai")]
        let client = {
            let openai_config = match config.base_url {
                Some(ref base_url) => OpenAIConfig::new()
                    .with_api_key(api_key)
                    .with_api_base(base_url),
                None => OpenAIConfig::new().with_api_key(api_key),
            };
            Client::with_config(openai_config)
        };
        #[cfg(not(feature = "openai"))]
        let _ = api_key;

        let mut config = config;
        // The shared default model is an OpenRouter slug.
        if config.model.is_empty() || config.model.contains('/') {
            config.model = DEFAULT_MODEL.to_string();
        }

        Ok(Self {
            #[cfg(feature = "openai")]
            client,
            config,
        })
    }

    #[cfg(feature = "openai")]
    fn message_to_openai(msg: &Message) -> ChatCompletionRequestMessage {
        match msg.role {
            MessageRole::System => {
                ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage {
                    content: ChatCompletionRequestSystemMessageContent::Text(msg.content.clone()),
                    name: None,
                })
            }
            MessageRole::User => {
                ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
                    content: ChatCompletionRequestUserMessageContent::Text(msg.content.clone()),
                    name: None,
                })
            }
            MessageRole::Assistant => {
                ChatCompletionRequestMessage::Assistant(ChatCompletionRequestAssistantMessage {
                    content: Some(ChatCompletionRequestAssistantMessageContent::Text(
                        msg.content.clone(),
                    )),
                    name: None,
                    ..Default::default()
                })
            }
        }
    }
}

#[async_trait]
impl Llm for OpenAIProvider {
    #[cfg(feature = "openai")]
    async fn generate(
        &self,
        messages: &[Message],
        options: Option<GenerationOptions>,
    ) -> MynahResult<LlmResponse> {
        let options = options.unwrap_or_default();

        let request = CreateChatCompletionRequest {
            model: self.config.model.clone(),
            messages: messages.iter().map(Self::message_to_openai).collect(),
            temperature: Some(options.temperature.unwrap_or(self.config.temperature)),
            top_p: options.top_p.or(self.config.top_p),
            max_tokens: Some(options.max_tokens.unwrap_or(self.config.max_tokens)),
            ..Default::default()
        };

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| MynahError::llm(format!("OpenAI API error: {}", e)))?;

        let choice = response
            .choices
            .first()
            .ok_or_else(|| MynahError::invalid_response("No response choices returned"))?;

        let usage = response.usage.map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        Ok(LlmResponse {
            content: choice.message.content.clone(),
            usage,
        })
    }

    #[cfg(not(feature = "openai"))]
    async fn generate(
        &self,
        _messages: &[Message],
        _options: Option<GenerationOptions>,
    ) -> MynahResult<LlmResponse> {
        Err(MynahError::Configuration(
            "OpenAI feature not enabled. Enable the 'openai' feature.".to_string(),
        ))
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
