//! OpenRouter (OpenAI-compatible chat completions) provider implementation.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use mynah_core::error::{MynahError, MynahResult};
use mynah_core::traits::{GenerationOptions, Llm, LlmConfig, LlmResponse, TokenUsage};
use mynah_core::types::Message;

use crate::credentials::resolve_api_key;

const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1";
const API_KEY_ENV: &str = "OPENROUTER_API_KEY";
const APP_REFERER: &str = "https://github.com/mynah-chat/mynah";
const APP_TITLE: &str = "Mynah";

/// OpenRouter provider. Works with any endpoint that speaks the OpenAI chat
/// completions protocol when `base_url` is set.
pub struct OpenRouterLlm {
    client: Client,
    config: LlmConfig,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
    // OpenRouter can report upstream failures inside a 200 response.
    #[serde(default)]
    error: Option<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl OpenRouterLlm {
    /// Create a new OpenRouter provider.
    ///
    /// Fails with a missing-configuration error when no API key is configured
    /// and `OPENROUTER_API_KEY` is unset.
    pub fn new(config: LlmConfig) -> MynahResult<Self> {
        let api_key = resolve_api_key(config.api_key.as_deref(), API_KEY_ENV)?;

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::AUTHORIZATION,
            format!("Bearer {}", api_key)
                .parse()
                .map_err(|_| MynahError::Configuration("Invalid API key format".to_string()))?,
        );
        headers.insert(
            "HTTP-Referer",
            reqwest::header::HeaderValue::from_static(APP_REFERER),
        );
        headers.insert("X-Title", reqwest::header::HeaderValue::from_static(APP_TITLE));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| {
                MynahError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| OPENROUTER_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            client,
            config,
            base_url,
        })
    }

    fn build_request<'a>(
        &'a self,
        messages: &'a [Message],
        options: &GenerationOptions,
    ) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.config.model,
            messages: messages
                .iter()
                .map(|m| ChatMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            temperature: Some(options.temperature.unwrap_or(self.config.temperature)),
            max_tokens: Some(options.max_tokens.unwrap_or(self.config.max_tokens)),
            top_p: options.top_p.or(self.config.top_p),
        }
    }
}

/// Turn a response body into text, surfacing provider-reported errors.
fn parse_response(body: &str) -> MynahResult<LlmResponse> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| MynahError::invalid_response(format!("Failed to parse response: {}", e)))?;

    if let Some(error) = response.error {
        return Err(MynahError::llm(format!("OpenRouter error: {}", error.message)));
    }

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| MynahError::invalid_response("No response choices returned"))?;

    let usage = response.usage.map(|u| TokenUsage {
        prompt_tokens: u.prompt_tokens,
        completion_tokens: u.completion_tokens,
        total_tokens: u.total_tokens,
    });

    Ok(LlmResponse {
        content: choice.message.content,
        usage,
    })
}

/// Map a non-success status to an error, preferring the provider's message.
fn status_error(status: u16, body: &str) -> MynahError {
    let message = serde_json::from_str::<ApiError>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string());
    MynahError::from_http_status(status, &message)
}

#[async_trait]
impl Llm for OpenRouterLlm {
    async fn generate(
        &self,
        messages: &[Message],
        options: Option<GenerationOptions>,
    ) -> MynahResult<LlmResponse> {
        let options = options.unwrap_or_default();
        let request = self.build_request(messages, &options);

        debug!(model = %self.config.model, messages = messages.len(), "Sending chat completion");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| MynahError::llm_connection("OpenRouter request failed", e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| MynahError::llm_connection("Failed to read response body", e))?;

        if !status.is_success() {
            return Err(status_error(status.as_u16(), &body));
        }

        parse_response(&body)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mynah_core::error::ErrorCode;

    fn llm() -> OpenRouterLlm {
        OpenRouterLlm::new(LlmConfig {
            api_key: Some("sk-test".to_string()),
            base_url: Some("http://localhost:9999/v1/".to_string()),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_base_url_trailing_slash() {
        assert_eq!(llm().base_url, "http://localhost:9999/v1");
        assert_eq!(llm().model_name(), "mistralai/mistral-7b-instruct");
    }

    #[test]
    fn test_request_body() {
        let llm = llm();
        let messages = vec![Message::system("be nice"), Message::user("hello")];
        let options = GenerationOptions {
            temperature: Some(0.2),
            ..Default::default()
        };

        let body = serde_json::to_value(llm.build_request(&messages, &options)).unwrap();
        assert_eq!(body["model"], "mistralai/mistral-7b-instruct");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "hello");
        assert_eq!(body["max_tokens"], 1000);
        assert!((body["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);
        assert!(body.get("top_p").is_none());
    }

    #[test]
    fn test_parse_response() {
        let body = r#"{
            "choices": [{"message": {"role": "assistant", "content": "Namaste!"}}],
            "usage": {"prompt_tokens": 10, "completion_tokens": 3, "total_tokens": 13}
        }"#;
        let response = parse_response(body).unwrap();
        assert_eq!(response.content.as_deref(), Some("Namaste!"));
        assert_eq!(response.usage.unwrap().total_tokens, 13);
    }

    #[test]
    fn test_parse_inline_error() {
        let body = r#"{"error": {"message": "upstream overloaded", "code": 502}}"#;
        let err = parse_response(body).unwrap_err();
        assert!(err.to_string().contains("upstream overloaded"));
    }

    #[test]
    fn test_parse_no_choices() {
        let err = parse_response(r#"{"choices": []}"#).unwrap_err();
        assert_eq!(err.code(), ErrorCode::LlmInvalidResponse);
    }

    #[test]
    fn test_status_error_uses_provider_message() {
        let err = status_error(401, r#"{"error": {"message": "No auth credentials found"}}"#);
        assert_eq!(err.code(), ErrorCode::AuthInvalidKey);
        assert!(err.to_string().contains("No auth credentials found"));

        let err = status_error(502, "Bad Gateway");
        assert_eq!(err.code(), ErrorCode::LlmConnectionFailed);
    }
}
