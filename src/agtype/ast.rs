//! Concrete syntax tree for one agtype literal.
//!
//! The tree is untyped: a `{...}::vertex` is still an `Object` carrying a
//! suffix. Giving it meaning is the unmarshaller's job.

use super::lexer::Span;

/// One parsed value.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Scalar {
        literal: Literal,
        suffix: Option<Suffix>,
        span: Span,
    },
    Object {
        pairs: Vec<Pair>,
        suffix: Option<Suffix>,
        span: Span,
    },
    Array {
        items: Vec<Node>,
        suffix: Option<Suffix>,
        span: Span,
    },
}

impl Node {
    pub fn span(&self) -> Span {
        match self {
            Node::Scalar { span, .. } | Node::Object { span, .. } | Node::Array { span, .. } => *span,
        }
    }

    pub fn suffix(&self) -> Option<&Suffix> {
        match self {
            Node::Scalar { suffix, .. } | Node::Object { suffix, .. } | Node::Array { suffix, .. } => {
                suffix.as_ref()
            }
        }
    }

    /// Short description used in error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            Node::Scalar { literal, .. } => literal.describe(),
            Node::Object { suffix: Some(s), .. } if s.name == "vertex" => "vertex",
            Node::Object { suffix: Some(s), .. } if s.name == "edge" => "edge",
            Node::Object { .. } => "object",
            Node::Array { suffix: Some(s), .. } if s.name == "path" => "path",
            Node::Array { .. } => "array",
        }
    }
}

/// `"key": value` inside an object.
#[derive(Debug, Clone, PartialEq)]
pub struct Pair {
    pub key: String,
    pub key_span: Span,
    pub value: Node,
}

/// `::name` following a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suffix {
    pub name: String,
    pub span: Span,
}

/// Scalar literal as written.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    /// Digits without a fraction or exponent.
    Integer(String),
    /// Digits with a fraction and/or exponent.
    Float(String),
    Bool(bool),
    Null,
    NaN,
    Infinity,
    NegInfinity,
}

impl Literal {
    pub fn describe(&self) -> &'static str {
        match self {
            Literal::String(_) => "string",
            Literal::Integer(_) => "integer",
            Literal::Float(_) | Literal::NaN | Literal::Infinity | Literal::NegInfinity => "float",
            Literal::Bool(_) => "boolean",
            Literal::Null => "null",
        }
    }
}
