//! Factory for creating the session orchestrator from configuration.

use mynah_core::config::MynahConfig;
use mynah_core::error::MynahResult;
use mynah_core::session::SessionOrchestrator;
use mynah_llm::LlmFactory;
use tracing::info;

/// Create the completion client and a session orchestrator around it.
///
/// Fails when the backend credential is missing; the server treats that as fatal.
pub fn create_orchestrator(config: &MynahConfig) -> MynahResult<SessionOrchestrator> {
    let llm = LlmFactory::from_config(&config.llm)?;
    info!(
        provider = %config.llm.provider,
        model = %llm.model_name(),
        window_size = config.session.window_size,
        language_strategy = %config.language.strategy,
        "Completion client ready"
    );
    SessionOrchestrator::from_config(config, llm)
}
