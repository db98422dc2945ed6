//! Decoder configuration.

use serde::{Deserialize, Serialize};

/// Knobs for [`Decoder`](crate::agtype::Decoder).
///
/// Deserializable with defaults for every missing field, so it can sit
/// inside whatever configuration file the embedding application uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Maximum nesting of arrays and objects in one literal.
    pub max_depth: usize,
    /// Report `::unknown` suffixes as errors. Off by default: the suffix is
    /// logged and the value decodes as its untyped form.
    pub strict_suffixes: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_depth: 128,
            strict_suffixes: false,
        }
    }
}
