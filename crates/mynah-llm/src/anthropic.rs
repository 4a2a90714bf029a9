//! Anthropic (Claude) provider implementation.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use mynah_core::error::{MynahError, MynahResult};
use mynah_core::traits::{GenerationOptions, Llm, LlmConfig, LlmResponse, TokenUsage};
use mynah_core::types::{Message, MessageRole};

use crate::credentials::resolve_api_key;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";
const DEFAULT_MODEL: &str = "claude-3-5-haiku-20241022";

/// Anthropic provider.
pub struct AnthropicLlm {
    client: Client,
    config: LlmConfig,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<AnthropicMessage>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContent>,
    #[serde(default)]
    usage: Option<AnthropicUsage>,
}

#[derive(Debug, Deserialize)]
struct AnthropicContent {
    #[serde(rename = "type")]
    content_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    input_tokens: u32,
    output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorDetail,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorDetail {
    message: String,
}

impl AnthropicLlm {
    /// Create a new Anthropic provider.
    pub fn new(config: LlmConfig) -> MynahResult<Self> {
        let api_key = resolve_api_key(config.api_key.as_deref(), API_KEY_ENV)?;

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "x-api-key",
            api_key
                .parse()
                .map_err(|_| MynahError::Configuration("Invalid API key format".to_string()))?,
        );
        headers.insert(
            "anthropic-version",
            reqwest::header::HeaderValue::from_static(ANTHROPIC_VERSION),
        );

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| {
                MynahError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| ANTHROPIC_API_URL.to_string());

        let mut config = config;
        // The shared default model is an OpenRouter slug.
        if config.model.is_empty() || config.model.contains('/') {
            config.model = DEFAULT_MODEL.to_string();
        }

        Ok(Self {
            client,
            config,
            base_url,
        })
    }

    fn build_request(&self, messages: &[Message], options: &GenerationOptions) -> AnthropicRequest {
        // Separate system message from conversation messages
        let system = messages
            .iter()
            .find(|m| m.role == MessageRole::System)
            .map(|m| m.content.clone());

        let messages = messages
            .iter()
            .filter(|m| m.role != MessageRole::System)
            .map(|m| AnthropicMessage {
                role: m.role.as_str(),
                content: m.content.clone(),
            })
            .collect();

        AnthropicRequest {
            model: self.config.model.clone(),
            max_tokens: options.max_tokens.unwrap_or(self.config.max_tokens),
            temperature: Some(options.temperature.unwrap_or(self.config.temperature)),
            top_p: options.top_p.or(self.config.top_p),
            system,
            messages,
        }
    }
}

#[async_trait]
impl Llm for AnthropicLlm {
    async fn generate(
        &self,
        messages: &[Message],
        options: Option<GenerationOptions>,
    ) -> MynahResult<LlmResponse> {
        let options = options.unwrap_or_default();
        let request = self.build_request(messages, &options);

        let response = self
            .client
            .post(format!("{}/messages", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| MynahError::llm_connection("Anthropic API request failed", e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| MynahError::llm_connection("Failed to read response body", e))?;

        if !status.is_success() {
            let message = serde_json::from_str::<AnthropicError>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| body.clone());
            return Err(MynahError::from_http_status(status.as_u16(), &message));
        }

        let response: AnthropicResponse = serde_json::from_str(&body).map_err(|e| {
            MynahError::invalid_response(format!("Failed to parse response: {}", e))
        })?;

        let content = response
            .content
            .iter()
            .find(|c| c.content_type == "text")
            .and_then(|c| c.text.clone());

        let usage = response.usage.map(|u| TokenUsage {
            prompt_tokens: u.input_tokens,
            completion_tokens: u.output_tokens,
            total_tokens: u.input_tokens + u.output_tokens,
        });

        Ok(LlmResponse { content, usage })
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_instruction_moves_to_top_level() {
        let llm = AnthropicLlm::new(LlmConfig {
            api_key: Some("sk-ant-test".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(llm.model_name(), DEFAULT_MODEL);

        let messages = vec![
            Message::system("Respond in Hindi only."),
            Message::user("hi"),
            Message::assistant("नमस्ते"),
            Message::user("kaise ho"),
        ];
        let request = llm.build_request(&messages, &GenerationOptions::default());

        assert_eq!(request.system.as_deref(), Some("Respond in Hindi only."));
        assert_eq!(request.messages.len(), 3);
        assert_eq!(request.messages[1].role, "assistant");
        assert_eq!(request.max_tokens, 1000);
    }
}
