//! # Entity Model
//!
//! The decoded, strongly-typed representation of agtype result values.
//! Every type here is plain data: no I/O, no parser state, no cursor state.
//!
//! Graph elements are handed out behind `Arc` so that a vertex repeated
//! inside one decoded literal resolves to a single shared instance.

pub mod entity;
pub mod vertex;
pub mod edge;
pub mod path;
pub mod property_map;

pub use entity::{Entity, EntityKind, FromEntity};
pub use vertex::{GraphId, Vertex};
pub use edge::Edge;
pub use path::{Path, PathElement};
pub use property_map::PropertyMap;
