//! Server state management.

use std::sync::Arc;

use mynah_core::config::MynahConfig;
use mynah_core::error::MynahResult;
use mynah_core::session::SessionOrchestrator;

use crate::factory::create_orchestrator;

/// Shared application state.
///
/// The orchestrator partitions state per user internally, so handlers share
/// it without any outer lock.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<SessionOrchestrator>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(orchestrator: SessionOrchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
        }
    }

    /// Build the completion client and orchestrator described by `config`.
    pub fn from_config(config: &MynahConfig) -> MynahResult<Self> {
        Ok(Self::new(create_orchestrator(config)?))
    }
}
