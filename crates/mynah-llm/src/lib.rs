//! mynah-llm - Completion backend clients for mynah.
//!
//! Every client implements the core [`Llm`] trait so the session orchestrator
//! never sees the wire protocol.
//!
//! # Supported Providers
//!
//! - **OpenRouter** - any model on openrouter.ai, or any OpenAI-compatible
//!   endpoint through `base_url`
//! - **OpenAI** (feature: `openai`) - through `async-openai`
//! - **Anthropic** - Claude models through the Messages API
//!
//! # Example
//!
//! ```ignore
//! use mynah_llm::LlmFactory;
//!
//! // Reads OPENROUTER_API_KEY
//! let llm = LlmFactory::openrouter()?;
//!
//! // Or with a specific model
//! let llm = LlmFactory::openrouter_with_model("meta-llama/llama-3-8b-instruct")?;
//! ```

mod anthropic;
mod credentials;
mod factory;
mod openai;
mod openrouter;

pub use anthropic::AnthropicLlm;
pub use factory::LlmFactory;
pub use openai::OpenAIProvider;
pub use openrouter::OpenRouterLlm;

// Re-export core types for convenience
pub use mynah_core::config::LlmProvider;
pub use mynah_core::traits::{GenerationOptions, Llm, LlmConfig, LlmResponse};
