//! Edge (directed relationship) in the property graph.

use serde::{Deserialize, Serialize};
use super::{Entity, FromEntity, GraphId, PropertyMap};
use crate::Result;

/// An edge decoded from a `::edge` literal.
///
/// `start_id` and `end_id` are plain references: the vertices they name
/// need not appear anywhere in the same result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: GraphId,
    pub label: String,
    pub start_id: GraphId,
    pub end_id: GraphId,
    pub properties: PropertyMap,
}

impl Edge {
    pub fn new(
        id: impl Into<GraphId>,
        label: impl Into<String>,
        start_id: impl Into<GraphId>,
        end_id: impl Into<GraphId>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            start_id: start_id.into(),
            end_id: end_id.into(),
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

    pub fn prop<T: FromEntity>(&self, key: &str) -> Result<T> {
        match self.properties.get(key) {
            Some(value) => T::from_entity(value),
            None => T::from_missing(key),
        }
    }

    /// The opposite endpoint from the given vertex id.
    pub fn other_end(&self, from: GraphId) -> Option<GraphId> {
        if from == self.start_id { Some(self.end_id) }
        else if from == self.end_id { Some(self.start_id) }
        else { None }
    }
}
