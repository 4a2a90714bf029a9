//! Core data types.

mod intent;
mod language;
mod message;
mod profile;
mod reply;

pub use intent::*;
pub use language::*;
pub use message::*;
pub use profile::*;
pub use reply::*;
