//! Languages the assistant can steer replies into.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// A reply language/register.
///
/// Variant order is the tie-break priority used by heuristic detection.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Language {
    Hindi,
    /// Hindi and English mixed, usually romanized.
    Hinglish,
    #[default]
    English,
    Marathi,
    Gujarati,
    Tamil,
}
