//! Universal decoded value for agtype literals.

use std::fmt;
use std::sync::Arc;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

use super::{Edge, Path, PropertyMap, Vertex};
use crate::{Error, Result};

/// One decoded agtype value.
///
/// - Scalars: Null, Bool, Int, BigInt, Float, BigFloat, String
/// - Containers: Array, Map
/// - Graph: Vertex, Edge, Path
///
/// `BigInt` and `BigFloat` only appear when the literal does not fit the
/// fixed-width kind without losing precision, or carries `::numeric`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Entity {
    Null,
    Bool(bool),
    Int(i64),
    BigInt(BigInt),
    Float(f64),
    BigFloat(BigDecimal),
    String(String),
    Array(Vec<Entity>),
    Map(PropertyMap),

    // Graph types
    Vertex(Arc<Vertex>),
    Edge(Arc<Edge>),
    Path(Arc<Path>),
}

/// Discriminant of an [`Entity`], for callers that dispatch on kind only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Null,
    Bool,
    Int,
    BigInt,
    Float,
    BigFloat,
    String,
    Array,
    Map,
    Vertex,
    Edge,
    Path,
}

// ============================================================================
// Type checking
// ============================================================================

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Null => EntityKind::Null,
            Entity::Bool(_) => EntityKind::Bool,
            Entity::Int(_) => EntityKind::Int,
            Entity::BigInt(_) => EntityKind::BigInt,
            Entity::Float(_) => EntityKind::Float,
            Entity::BigFloat(_) => EntityKind::BigFloat,
            Entity::String(_) => EntityKind::String,
            Entity::Array(_) => EntityKind::Array,
            Entity::Map(_) => EntityKind::Map,
            Entity::Vertex(_) => EntityKind::Vertex,
            Entity::Edge(_) => EntityKind::Edge,
            Entity::Path(_) => EntityKind::Path,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.kind().name()
    }

    pub fn is_null(&self) -> bool { matches!(self, Entity::Null) }
    pub fn is_numeric(&self) -> bool {
        matches!(self, Entity::Int(_) | Entity::BigInt(_) | Entity::Float(_) | Entity::BigFloat(_))
    }
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Entity::Array(_) | Entity::Map(_) | Entity::Vertex(_) | Entity::Edge(_) | Entity::Path(_))
    }
    pub fn is_graph_element(&self) -> bool {
        matches!(self, Entity::Vertex(_) | Entity::Edge(_) | Entity::Path(_))
    }

    fn mismatch(&self, expected: &str) -> Error {
        Error::TypeError {
            expected: expected.into(),
            got: self.type_name().into(),
        }
    }

    pub fn as_bool(&self) -> Result<bool> {
        match self {
            Entity::Bool(b) => Ok(*b),
            _ => Err(self.mismatch("BOOLEAN")),
        }
    }

    pub fn as_int(&self) -> Result<i64> {
        match self {
            Entity::Int(i) => Ok(*i),
            _ => Err(self.mismatch("INTEGER")),
        }
    }

    /// Any integer kind, widened.
    pub fn as_big_int(&self) -> Result<BigInt> {
        match self {
            Entity::Int(i) => Ok(BigInt::from(*i)),
            Entity::BigInt(b) => Ok(b.clone()),
            _ => Err(self.mismatch("INTEGER")),
        }
    }

    /// Int or Float as f64. Arbitrary-precision kinds are refused rather than rounded.
    pub fn as_float(&self) -> Result<f64> {
        match self {
            Entity::Float(f) => Ok(*f),
            Entity::Int(i) => Ok(*i as f64),
            _ => Err(self.mismatch("FLOAT")),
        }
    }

    /// Any finite numeric kind, widened to an exact decimal.
    pub fn as_big_float(&self) -> Result<BigDecimal> {
        match self {
            Entity::Int(i) => Ok(BigDecimal::from(*i)),
            Entity::BigInt(b) => Ok(BigDecimal::from(b.clone())),
            Entity::BigFloat(d) => Ok(d.clone()),
            Entity::Float(f) => BigDecimal::try_from(*f).map_err(|_| self.mismatch("finite FLOAT")),
            _ => Err(self.mismatch("NUMERIC")),
        }
    }

    pub fn as_str(&self) -> Result<&str> {
        match self {
            Entity::String(s) => Ok(s),
            _ => Err(self.mismatch("STRING")),
        }
    }

    pub fn as_array(&self) -> Result<&[Entity]> {
        match self {
            Entity::Array(items) => Ok(items),
            _ => Err(self.mismatch("ARRAY")),
        }
    }

    pub fn as_map(&self) -> Result<&PropertyMap> {
        match self {
            Entity::Map(m) => Ok(m),
            _ => Err(self.mismatch("MAP")),
        }
    }

    pub fn as_vertex(&self) -> Result<&Arc<Vertex>> {
        match self {
            Entity::Vertex(v) => Ok(v),
            _ => Err(self.mismatch("VERTEX")),
        }
    }

    pub fn as_edge(&self) -> Result<&Arc<Edge>> {
        match self {
            Entity::Edge(e) => Ok(e),
            _ => Err(self.mismatch("EDGE")),
        }
    }

    pub fn as_path(&self) -> Result<&Arc<Path>> {
        match self {
            Entity::Path(p) => Ok(p),
            _ => Err(self.mismatch("PATH")),
        }
    }

    /// Convert into a concrete Rust type.
    pub fn extract<T: FromEntity>(&self) -> Result<T> {
        T::from_entity(self)
    }
}

impl EntityKind {
    pub fn name(self) -> &'static str {
        match self {
            EntityKind::Null => "NULL",
            EntityKind::Bool => "BOOLEAN",
            EntityKind::Int => "INTEGER",
            EntityKind::BigInt => "BIG_INTEGER",
            EntityKind::Float => "FLOAT",
            EntityKind::BigFloat => "NUMERIC",
            EntityKind::String => "STRING",
            EntityKind::Array => "ARRAY",
            EntityKind::Map => "MAP",
            EntityKind::Vertex => "VERTEX",
            EntityKind::Edge => "EDGE",
            EntityKind::Path => "PATH",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Conversions (From impls)
// ============================================================================

impl From<bool> for Entity { fn from(v: bool) -> Self { Entity::Bool(v) } }
impl From<i32> for Entity { fn from(v: i32) -> Self { Entity::Int(v as i64) } }
impl From<i64> for Entity { fn from(v: i64) -> Self { Entity::Int(v) } }
impl From<f64> for Entity { fn from(v: f64) -> Self { Entity::Float(v) } }
impl From<BigInt> for Entity { fn from(v: BigInt) -> Self { Entity::BigInt(v) } }
impl From<BigDecimal> for Entity { fn from(v: BigDecimal) -> Self { Entity::BigFloat(v) } }
impl From<String> for Entity { fn from(v: String) -> Self { Entity::String(v) } }
impl From<&str> for Entity { fn from(v: &str) -> Self { Entity::String(v.to_owned()) } }
impl From<Vertex> for Entity { fn from(v: Vertex) -> Self { Entity::Vertex(Arc::new(v)) } }
impl From<Edge> for Entity { fn from(v: Edge) -> Self { Entity::Edge(Arc::new(v)) } }
impl From<Path> for Entity { fn from(v: Path) -> Self { Entity::Path(Arc::new(v)) } }
impl<T: Into<Entity>> From<Vec<T>> for Entity {
    fn from(v: Vec<T>) -> Self { Entity::Array(v.into_iter().map(Into::into).collect()) }
}
impl<T: Into<Entity>> From<Option<T>> for Entity {
    fn from(v: Option<T>) -> Self { v.map(Into::into).unwrap_or(Entity::Null) }
}

// ============================================================================
// Display (agtype literal text)
// ============================================================================

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::export::write_literal(f, self)
    }
}

// ============================================================================
// Typed extraction
// ============================================================================

/// Convert from an [`Entity`] to a concrete type.
pub trait FromEntity: Sized {
    fn from_entity(val: &Entity) -> Result<Self>;

    /// Called when a property lookup finds no value under `key`.
    fn from_missing(key: &str) -> Result<Self> {
        Err(Error::MissingProperty(key.to_owned()))
    }
}

impl FromEntity for Entity {
    fn from_entity(val: &Entity) -> Result<Self> { Ok(val.clone()) }
}

impl FromEntity for bool {
    fn from_entity(val: &Entity) -> Result<Self> { val.as_bool() }
}

impl FromEntity for i64 {
    fn from_entity(val: &Entity) -> Result<Self> { val.as_int() }
}

impl FromEntity for f64 {
    fn from_entity(val: &Entity) -> Result<Self> { val.as_float() }
}

impl FromEntity for BigInt {
    fn from_entity(val: &Entity) -> Result<Self> { val.as_big_int() }
}

impl FromEntity for BigDecimal {
    fn from_entity(val: &Entity) -> Result<Self> { val.as_big_float() }
}

impl FromEntity for String {
    fn from_entity(val: &Entity) -> Result<Self> { val.as_str().map(str::to_owned) }
}

impl FromEntity for Vec<Entity> {
    fn from_entity(val: &Entity) -> Result<Self> { val.as_array().map(<[Entity]>::to_vec) }
}

impl FromEntity for PropertyMap {
    fn from_entity(val: &Entity) -> Result<Self> { val.as_map().cloned() }
}

impl FromEntity for Arc<Vertex> {
    fn from_entity(val: &Entity) -> Result<Self> { val.as_vertex().cloned() }
}

impl FromEntity for Arc<Edge> {
    fn from_entity(val: &Entity) -> Result<Self> { val.as_edge().cloned() }
}

impl FromEntity for Arc<Path> {
    fn from_entity(val: &Entity) -> Result<Self> { val.as_path().cloned() }
}

impl<T: FromEntity> FromEntity for Option<T> {
    fn from_entity(val: &Entity) -> Result<Self> {
        match val {
            Entity::Null => Ok(None),
            other => T::from_entity(other).map(Some),
        }
    }

    fn from_missing(_key: &str) -> Result<Self> {
        Ok(None)
    }
}
