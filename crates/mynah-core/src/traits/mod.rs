//! Core traits for mynah collaborators.

mod language;
mod llm;
mod store;

pub use language::*;
pub use llm::*;
pub use store::*;
