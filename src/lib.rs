//! # age-rs: Apache AGE result decoding in Rust
//!
//! Decodes the `agtype` text that Apache AGE returns for each column of a
//! `cypher(...)` query into typed graph values.
//!
//! ## Design Principles
//!
//! 1. **Closed sum type**: every decoded value is an [`Entity`]; consumers match exhaustively
//! 2. **Report everything**: one decode call collects every defect in the literal
//! 3. **Parser owns nothing**: text → tokens → syntax tree is a pure pipeline
//! 4. **Database-agnostic cursor**: rows come from any [`RowSource`]
//!
//! ## Quick Start
//!
//! ```rust
//! use age_rs::{decode, Entity};
//!
//! # fn example() -> age_rs::Result<()> {
//! let text = r#"{"id": 844424930131969, "label": "Person", "properties": {"name": "Joe"}}::vertex"#;
//! let entity = decode(text)?;
//!
//! let person = entity.as_vertex()?;
//! assert_eq!(person.label, "Person");
//! assert_eq!(person.prop::<String>("name")?, "Joe");
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Row Sources
//!
//! | Source | Description |
//! |--------|-------------|
//! | [`MemoryRows`] | Rows held in a `Vec`, for tests and replays |
//! | [`IterRows`] | Any iterator of row results, e.g. a database driver's stream |
//! | `ChannelRows` | Async rows from a tokio channel (feature `tokio`), read with [`AsyncCursor`] |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod agtype;
pub mod cursor;
pub mod export;
pub mod sql;
pub mod config;

// ============================================================================
// Re-exports: Model
// ============================================================================

pub use model::{
    Entity, EntityKind, FromEntity,
    Vertex, Edge, Path, PathElement,
    GraphId, PropertyMap,
};

// ============================================================================
// Re-exports: Decoding
// ============================================================================

pub use agtype::{decode, Decoder, DecodeError};
pub use agtype::diagnostics::{Diagnostic, DiagnosticKind};
pub use agtype::lexer::Span;
pub use config::DecoderConfig;

// ============================================================================
// Re-exports: Cursors
// ============================================================================

pub use cursor::{Cursor, Incomplete, RowSource};
pub use cursor::rows::{IterRows, MemoryRows};
pub use cursor::mapping::{Mapped, MappingCursor, Projected, TypeRegistry};
pub use cursor::stream::{AsyncCursor, AsyncRowSource};
#[cfg(feature = "tokio")]
pub use cursor::stream::{ChannelRows, RowMessage};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("Row source error: {0}")]
    Row(String),

    #[error("No current row: call next() before get_row(), and get_row() once per row")]
    NoCurrentRow,

    #[error("Type error: expected {expected}, got {got}")]
    TypeError { expected: String, got: String },

    #[error("Index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Missing property: {0}")]
    MissingProperty(String),

    #[error("Cannot project label {label:?}: {message}")]
    Projection { label: String, message: String },

    #[error("Invalid {kind} name {name:?}: {reason}")]
    InvalidName { kind: &'static str, name: String, reason: String },

    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

pub type Result<T> = std::result::Result<T, Error>;
