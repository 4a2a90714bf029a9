//! Language/style adapter strategies.

mod fixed;
mod heuristic;
mod instructions;

use std::sync::Arc;

pub use fixed::StaticAdapter;
pub use heuristic::HeuristicAdapter;
pub use instructions::{builtin_instruction, InstructionTable, MIRROR_INSTRUCTION};

use crate::config::{LanguageConfig, LanguageStrategy};
use crate::traits::LanguageAdapter;

/// Build the adapter selected by configuration.
pub fn create_language_adapter(config: &LanguageConfig) -> Arc<dyn LanguageAdapter> {
    match config.strategy {
        LanguageStrategy::Heuristic => Arc::new(HeuristicAdapter::from_config(config)),
        LanguageStrategy::Static => Arc::new(StaticAdapter::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_selects_strategy() {
        let mut config = LanguageConfig::default();
        assert_eq!(create_language_adapter(&config).name(), "heuristic");

        config.strategy = LanguageStrategy::Static;
        assert_eq!(create_language_adapter(&config).name(), "static");
    }
}
