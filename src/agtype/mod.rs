//! # agtype decoding
//!
//! Turns the text of one agtype result column into an [`Entity`].
//!
//! ```text
//! text → lexer → tokens → parser → syntax tree → unmarshal → Entity
//! ```
//!
//! Every stage reports into one [`Diagnostics`] sink. A call either returns
//! a complete entity or a [`DecodeError`] listing every problem found.

pub mod ast;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod unmarshal;

use tracing::debug;

use crate::config::DecoderConfig;
use crate::model::Entity;
use ast::Node;
use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use unmarshal::Unmarshaler;

pub use diagnostics::DecodeError;

/// Lexer, parser, unmarshaller and error sink bundled for reuse.
///
/// State lives for exactly one [`decode`](Decoder::decode) call: the vertex
/// cache and the error list are cleared on entry and on exit. A decoder is
/// `&mut`-only, so sharing one across threads needs one instance per thread.
#[derive(Debug)]
pub struct Decoder {
    config: DecoderConfig,
    diags: Diagnostics,
    unmarshaler: Unmarshaler,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder {
    pub fn new() -> Self {
        Self::with_config(DecoderConfig::default())
    }

    pub fn with_config(config: DecoderConfig) -> Self {
        let unmarshaler = Unmarshaler::new(config.strict_suffixes);
        Self { config, diags: Diagnostics::new(), unmarshaler }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decode one literal. Empty or all-whitespace text is `Null`.
    pub fn decode(&mut self, text: &str) -> Result<Entity, DecodeError> {
        self.diags.clear();
        self.unmarshaler.reset();

        if text.trim().is_empty() {
            return Ok(Entity::Null);
        }

        let tree = self.parse_tree(text);
        let entity = tree.and_then(|node| self.unmarshaler.visit(&node, &mut self.diags));
        self.unmarshaler.reset();

        if let Some(err) = self.diags.finish(text) {
            debug!(input_len = text.len(), problems = err.diagnostics.len(), "agtype decode failed");
            return Err(err);
        }

        entity.ok_or_else(|| DecodeError {
            input: text.to_owned(),
            diagnostics: vec![Diagnostic {
                kind: DiagnosticKind::Syntax,
                span: None,
                message: "no value could be decoded".into(),
            }],
        })
    }

    /// Lex and parse only, returning the syntax tree.
    pub fn parse(&mut self, text: &str) -> Result<Node, DecodeError> {
        self.diags.clear();
        let tree = self.parse_tree(text);
        if let Some(err) = self.diags.finish(text) {
            return Err(err);
        }
        tree.ok_or_else(|| DecodeError {
            input: text.to_owned(),
            diagnostics: vec![Diagnostic {
                kind: DiagnosticKind::Syntax,
                span: None,
                message: "expected a value".into(),
            }],
        })
    }

    fn parse_tree(&mut self, text: &str) -> Option<Node> {
        let tokens = lexer::tokenize(text, &mut self.diags);
        parser::parse_literal(&tokens, self.config.max_depth, &mut self.diags)
    }
}

/// Decode one literal with a fresh default decoder.
pub fn decode(text: &str) -> Result<Entity, DecodeError> {
    Decoder::new().decode(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_empty_is_null() {
        assert_eq!(decode("").unwrap(), Entity::Null);
        assert_eq!(decode("  \n").unwrap(), Entity::Null);
    }

    #[test]
    fn test_state_does_not_leak_between_calls() {
        let mut decoder = Decoder::new();
        assert!(decoder.decode("[1, 2").is_err());
        assert_eq!(decoder.decode("[1, 2]").unwrap(), Entity::from(vec![1, 2]));
        assert_eq!(decoder.unmarshaler.cached_vertices(), 0);
    }

    #[test]
    fn test_cache_is_per_call() {
        let mut decoder = Decoder::new();
        let text = r#"{"id": 1, "label": "A", "properties": {}}::vertex"#;
        let a = decoder.decode(text).unwrap();
        let b = decoder.decode(text).unwrap();
        assert_eq!(a, b);
        assert!(!Arc::ptr_eq(a.as_vertex().unwrap(), b.as_vertex().unwrap()));
    }

    #[test]
    fn test_unknown_suffix_decodes_as_map_by_default() {
        let entity = decode(r#"{"a": 1}::mystery"#).unwrap();
        assert_eq!(entity.as_map().unwrap().len(), 1);
    }

    #[test]
    fn test_strict_suffixes_reject_unknown_suffix() {
        let mut decoder = Decoder::with_config(DecoderConfig {
            strict_suffixes: true,
            ..Default::default()
        });
        let err = decoder.decode(r#"{"a": 1}::mystery"#).unwrap_err();
        assert!(err.has_kind(DiagnosticKind::UnknownSuffix));
    }

    #[test]
    fn test_parse_tree_only() {
        let mut decoder = Decoder::new();
        let node = decoder.parse("[1]::path").unwrap();
        assert_eq!(node.suffix().unwrap().name, "path");
    }
}
