//! Label → native type projection.
//!
//! A [`TypeRegistry`] maps vertex/edge labels to functions that build a
//! caller-side type from the element's properties. [`MappingCursor`] runs
//! every decoded row through the registry, so registered labels come out
//! as `T` and everything else stays a generic [`Entity`].

use std::fmt;

use hashbrown::HashMap;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tracing::debug;

use super::{Cursor, Incomplete, RowSource};
use crate::agtype::Decoder;
use crate::export::properties_json;
use crate::model::*;
use crate::{Error, Result};

type Projector<T> = Box<dyn Fn(&PropertyMap) -> Result<T> + Send + Sync>;

/// Label → projector table.
pub struct TypeRegistry<T> {
    projectors: HashMap<String, Projector<T>>,
}

impl<T> Default for TypeRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for TypeRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.projectors.keys()).finish()
    }
}

impl<T> TypeRegistry<T> {
    pub fn new() -> Self {
        Self { projectors: HashMap::new() }
    }

    /// Project `label` by deserializing its property map into `U`.
    ///
    /// Properties are matched to `U`'s fields by name through serde, so
    /// `#[serde(default)]`, `rename` and friends apply. Registering a label
    /// twice replaces the earlier projector.
    pub fn put_type<U>(&mut self, label: impl Into<String>) -> &mut Self
    where
        U: DeserializeOwned + Into<T>,
    {
        let label = label.into();
        let name = label.clone();
        self.projectors.insert(
            label,
            Box::new(move |props| {
                serde_json::from_value::<U>(JsonValue::Object(properties_json(props)))
                    .map(Into::into)
                    .map_err(|e| Error::Projection { label: name.clone(), message: e.to_string() })
            }),
        );
        self
    }

    /// Project `label` with a hand-written function.
    pub fn put_with<F>(&mut self, label: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(&PropertyMap) -> Result<T> + Send + Sync + 'static,
    {
        self.projectors.insert(label.into(), Box::new(f));
        self
    }

    pub fn contains(&self, label: &str) -> bool {
        self.projectors.contains_key(label)
    }

    pub fn len(&self) -> usize {
        self.projectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projectors.is_empty()
    }

    /// Project one decoded entity.
    ///
    /// Paths always become [`Mapped::Path`]. Arrays and maps become
    /// [`Mapped::Array`] and [`Mapped::Map`] only when something inside
    /// them was projected.
    pub fn project(&self, entity: Entity) -> Result<Mapped<T>> {
        match entity {
            Entity::Vertex(v) => match self.projectors.get(&v.label) {
                Some(f) => Ok(Mapped::Native(Projected {
                    id: v.id,
                    label: v.label.clone(),
                    ends: None,
                    value: f(&v.properties)?,
                })),
                None => Ok(Mapped::Entity(Entity::Vertex(v))),
            },
            Entity::Edge(e) => match self.projectors.get(&e.label) {
                Some(f) => Ok(Mapped::Native(Projected {
                    id: e.id,
                    label: e.label.clone(),
                    ends: Some((e.start_id, e.end_id)),
                    value: f(&e.properties)?,
                })),
                None => Ok(Mapped::Entity(Entity::Edge(e))),
            },
            Entity::Path(p) => p
                .iter()
                .map(|el| self.project(Entity::from(el.clone())))
                .collect::<Result<Vec<_>>>()
                .map(Mapped::Path),
            Entity::Array(items) => {
                let mapped = items
                    .into_iter()
                    .map(|item| self.project(item))
                    .collect::<Result<Vec<_>>>()?;
                if mapped.iter().all(|m| matches!(m, Mapped::Entity(_))) {
                    Ok(Mapped::Entity(Entity::Array(
                        mapped.into_iter().filter_map(Mapped::into_entity).collect(),
                    )))
                } else {
                    Ok(Mapped::Array(mapped))
                }
            }
            Entity::Map(map) => {
                let mapped = map
                    .into_iter()
                    .map(|(key, value)| self.project(value).map(|m| (key, m)))
                    .collect::<Result<HashMap<_, _>>>()?;
                if mapped.values().all(|m| matches!(m, Mapped::Entity(_))) {
                    Ok(Mapped::Entity(Entity::Map(
                        mapped
                            .into_iter()
                            .filter_map(|(key, m)| m.into_entity().map(|e| (key, e)))
                            .collect(),
                    )))
                } else {
                    Ok(Mapped::Map(mapped))
                }
            }
            other => Ok(Mapped::Entity(other)),
        }
    }
}

/// A graph element projected onto a native type.
#[derive(Debug, Clone, PartialEq)]
pub struct Projected<T> {
    pub id: GraphId,
    pub label: String,
    /// `(start_id, end_id)` for edges.
    pub ends: Option<(GraphId, GraphId)>,
    pub value: T,
}

/// Result of running an entity through a [`TypeRegistry`].
#[derive(Debug, Clone, PartialEq)]
pub enum Mapped<T> {
    Native(Projected<T>),
    Entity(Entity),
    Path(Vec<Mapped<T>>),
    Array(Vec<Mapped<T>>),
    Map(HashMap<String, Mapped<T>>),
}

impl<T> Mapped<T> {
    pub fn is_native(&self) -> bool {
        matches!(self, Mapped::Native(_))
    }

    pub fn as_native(&self) -> Option<&T> {
        match self {
            Mapped::Native(p) => Some(&p.value),
            _ => None,
        }
    }

    pub fn into_native(self) -> Option<T> {
        match self {
            Mapped::Native(p) => Some(p.value),
            _ => None,
        }
    }

    pub fn as_entity(&self) -> Option<&Entity> {
        match self {
            Mapped::Entity(e) => Some(e),
            _ => None,
        }
    }

    pub fn into_entity(self) -> Option<Entity> {
        match self {
            Mapped::Entity(e) => Some(e),
            _ => None,
        }
    }

    /// Elements of a `Path` or `Array`.
    pub fn items(&self) -> Option<&[Mapped<T>]> {
        match self {
            Mapped::Path(items) | Mapped::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Entry of a `Map`.
    pub fn get(&self, key: &str) -> Option<&Mapped<T>> {
        match self {
            Mapped::Map(entries) => entries.get(key),
            _ => None,
        }
    }
}

/// [`Cursor`] that projects registered labels onto `T`.
#[derive(Debug)]
pub struct MappingCursor<R, T> {
    cursor: Cursor<R>,
    registry: TypeRegistry<T>,
}

impl<R: RowSource, T> MappingCursor<R, T> {
    pub fn new(source: R) -> Self {
        Self::with_registry(source, TypeRegistry::new())
    }

    pub fn with_registry(source: R, registry: TypeRegistry<T>) -> Self {
        Self { cursor: Cursor::new(source), registry }
    }

    pub fn with_decoder(source: R, decoder: Decoder, registry: TypeRegistry<T>) -> Self {
        Self { cursor: Cursor::with_decoder(source, decoder), registry }
    }

    /// See [`TypeRegistry::put_type`].
    pub fn put_type<U>(&mut self, label: impl Into<String>) -> &mut Self
    where
        U: DeserializeOwned + Into<T>,
    {
        self.registry.put_type::<U>(label);
        self
    }

    pub fn registry(&self) -> &TypeRegistry<T> {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut TypeRegistry<T> {
        &mut self.registry
    }

    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> bool {
        self.cursor.next()
    }

    /// Decode and project the current row.
    pub fn get_row(&mut self) -> Result<Mapped<T>> {
        let entity = self.cursor.get_row()?;
        self.registry.project(entity)
    }

    /// Drain the remaining rows, stopping at the first decode or
    /// projection failure.
    pub fn all(&mut self) -> std::result::Result<Vec<Mapped<T>>, Incomplete<Mapped<T>>> {
        let mut rows = Vec::new();
        while self.next() {
            match self.get_row() {
                Ok(mapped) => rows.push(mapped),
                Err(error) => {
                    debug!(
                        row = self.cursor.position(),
                        decoded = rows.len(),
                        %error,
                        "mapping cursor stopped on failing row"
                    );
                    return Err(Incomplete { rows, error });
                }
            }
        }
        Ok(rows)
    }

    pub fn position(&self) -> usize {
        self.cursor.position()
    }
}
