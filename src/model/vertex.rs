//! Vertex in the property graph.

use serde::{Deserialize, Serialize};
use super::{Entity, FromEntity, PropertyMap};
use crate::Result;

/// Graph identifier shared by vertices and edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GraphId(pub i64);

impl std::fmt::Display for GraphId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for GraphId {
    fn from(id: i64) -> Self {
        GraphId(id)
    }
}

impl From<i32> for GraphId {
    fn from(id: i32) -> Self {
        GraphId(i64::from(id))
    }
}

/// A vertex decoded from a `::vertex` literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub id: GraphId,
    pub label: String,
    pub properties: PropertyMap,
}

impl Vertex {
    pub fn new(id: impl Into<GraphId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            properties: PropertyMap::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Entity>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Entity> {
        self.properties.get(key)
    }

    /// Typed property lookup. A missing key is an error unless `T` is an `Option`.
    pub fn prop<T: FromEntity>(&self, key: &str) -> Result<T> {
        match self.properties.get(key) {
            Some(value) => T::from_entity(value),
            None => T::from_missing(key),
        }
    }
}
