//! Path: an ordered sequence of vertices and edges.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::{Edge, Entity, GraphId, PropertyMap, Vertex};
use crate::{Error, Result};

/// One step of a path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PathElement {
    Vertex(Arc<Vertex>),
    Edge(Arc<Edge>),
}

impl PathElement {
    pub fn id(&self) -> GraphId {
        match self {
            PathElement::Vertex(v) => v.id,
            PathElement::Edge(e) => e.id,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            PathElement::Vertex(v) => &v.label,
            PathElement::Edge(e) => &e.label,
        }
    }

    pub fn properties(&self) -> &PropertyMap {
        match self {
            PathElement::Vertex(v) => &v.properties,
            PathElement::Edge(e) => &e.properties,
        }
    }

    pub fn is_vertex(&self) -> bool {
        matches!(self, PathElement::Vertex(_))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            PathElement::Vertex(_) => "VERTEX",
            PathElement::Edge(_) => "EDGE",
        }
    }
}

impl From<PathElement> for Entity {
    fn from(el: PathElement) -> Self {
        match el {
            PathElement::Vertex(v) => Entity::Vertex(v),
            PathElement::Edge(e) => Entity::Edge(e),
        }
    }
}

/// A path as returned by the server: vertex, edge, vertex, ... in the order
/// the literal listed them. Alternation is not enforced; a lone vertex is a
/// valid path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PathRepr")]
pub struct Path {
    elements: SmallVec<[PathElement; 3]>,
}

/// Unchecked serde form of [`Path`].
#[derive(Deserialize)]
struct PathRepr {
    elements: Vec<PathElement>,
}

impl TryFrom<PathRepr> for Path {
    type Error = Error;

    fn try_from(repr: PathRepr) -> Result<Self> {
        Path::new(repr.elements)
    }
}

impl Path {
    /// Build a path from its elements. Fails on an empty sequence.
    pub fn new(elements: impl IntoIterator<Item = PathElement>) -> Result<Self> {
        let elements: SmallVec<[PathElement; 3]> = elements.into_iter().collect();
        if elements.is_empty() {
            return Err(Error::TypeError {
                expected: "at least one path element".into(),
                got: "empty path".into(),
            });
        }
        Ok(Self { elements })
    }

    pub fn single(vertex: Arc<Vertex>) -> Self {
        let mut elements = SmallVec::new();
        elements.push(PathElement::Vertex(vertex));
        Self { elements }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Number of edges traversed.
    pub fn hops(&self) -> usize {
        self.edges().count()
    }

    pub fn elements(&self) -> &[PathElement] {
        &self.elements
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathElement> {
        self.elements.iter()
    }

    pub fn get(&self, index: usize) -> Result<&PathElement> {
        self.elements.get(index).ok_or(Error::IndexOutOfRange {
            index,
            len: self.elements.len(),
        })
    }

    /// The element at `index`, which must be a vertex.
    pub fn vertex(&self, index: usize) -> Result<&Arc<Vertex>> {
        match self.get(index)? {
            PathElement::Vertex(v) => Ok(v),
            other => Err(Error::TypeError {
                expected: format!("VERTEX at path index {index}"),
                got: other.type_name().into(),
            }),
        }
    }

    /// The element at `index`, which must be an edge.
    pub fn edge(&self, index: usize) -> Result<&Arc<Edge>> {
        match self.get(index)? {
            PathElement::Edge(e) => Ok(e),
            other => Err(Error::TypeError {
                expected: format!("EDGE at path index {index}"),
                got: other.type_name().into(),
            }),
        }
    }

    pub fn start(&self) -> Result<&Arc<Vertex>> {
        self.vertex(0)
    }

    pub fn end(&self) -> Result<&Arc<Vertex>> {
        self.vertex(self.elements.len().saturating_sub(1))
    }

    pub fn vertices(&self) -> impl Iterator<Item = &Arc<Vertex>> {
        self.elements.iter().filter_map(|el| match el {
            PathElement::Vertex(v) => Some(v),
            PathElement::Edge(_) => None,
        })
    }

    pub fn edges(&self) -> impl Iterator<Item = &Arc<Edge>> {
        self.elements.iter().filter_map(|el| match el {
            PathElement::Edge(e) => Some(e),
            PathElement::Vertex(_) => None,
        })
    }

    /// Extend the path with an edge and the vertex it leads to.
    pub fn append(&mut self, edge: Arc<Edge>, vertex: Arc<Vertex>) {
        self.elements.push(PathElement::Edge(edge));
        self.elements.push(PathElement::Vertex(vertex));
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a PathElement;
    type IntoIter = std::slice::Iter<'a, PathElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}
