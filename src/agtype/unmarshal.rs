//! Syntax tree → [`Entity`].
//!
//! Owns the vertex identity cache for the call in progress: a `::vertex`
//! whose id was already seen in the same literal resolves to the first
//! decoded instance. Edges are never cached.

use std::str::FromStr;
use std::sync::Arc;

use bigdecimal::BigDecimal;
use hashbrown::HashMap;
use num_bigint::BigInt;
use tracing::{trace, warn};

use super::ast::{Literal, Node, Pair, Suffix};
use super::diagnostics::{DiagnosticKind, Diagnostics};
use super::lexer::Span;
use crate::model::{Edge, Entity, GraphId, Path, PathElement, PropertyMap, Vertex};

/// Type suffixes the decoder understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Vertex,
    Edge,
    Path,
    Numeric,
}

impl Tag {
    fn name(self) -> &'static str {
        match self {
            Tag::Vertex => "vertex",
            Tag::Edge => "edge",
            Tag::Path => "path",
            Tag::Numeric => "numeric",
        }
    }
}

/// Walks one syntax tree and materializes entities.
#[derive(Debug)]
pub struct Unmarshaler {
    vcache: HashMap<GraphId, Arc<Vertex>>,
    strict_suffixes: bool,
}

impl Unmarshaler {
    pub fn new(strict_suffixes: bool) -> Self {
        Self { vcache: HashMap::new(), strict_suffixes }
    }

    /// Forget every vertex seen so far.
    pub fn reset(&mut self) {
        self.vcache.clear();
    }

    pub fn cached_vertices(&self) -> usize {
        self.vcache.len()
    }

    /// Build the entity for `node`. Returns `None` when the node could not be
    /// turned into a value; the reason is in `diags`.
    pub fn visit(&mut self, node: &Node, diags: &mut Diagnostics) -> Option<Entity> {
        let tag = self.tag(node.suffix(), diags);
        match node {
            Node::Scalar { literal, span, .. } => match tag {
                None => scalar(literal, *span, diags),
                Some(Tag::Numeric) => numeric(literal, *span, diags),
                Some(t) => {
                    misplaced(t, node, diags);
                    scalar(literal, *span, diags)
                }
            },
            Node::Object { pairs, span, .. } => match tag {
                None => self.map(pairs, diags).map(Entity::Map),
                Some(Tag::Vertex) => self.vertex(pairs, *span, diags),
                Some(Tag::Edge) => self.edge(pairs, *span, diags),
                Some(t) => {
                    misplaced(t, node, diags);
                    self.map(pairs, diags).map(Entity::Map)
                }
            },
            Node::Array { items, span, .. } => match tag {
                None => Some(Entity::Array(self.array(items, diags))),
                Some(Tag::Path) => self.path(items, *span, diags),
                Some(t) => {
                    misplaced(t, node, diags);
                    Some(Entity::Array(self.array(items, diags)))
                }
            },
        }
    }

    fn tag(&self, suffix: Option<&Suffix>, diags: &mut Diagnostics) -> Option<Tag> {
        let suffix = suffix?;
        match suffix.name.as_str() {
            "vertex" => Some(Tag::Vertex),
            "edge" => Some(Tag::Edge),
            "path" => Some(Tag::Path),
            "numeric" => Some(Tag::Numeric),
            other => {
                if self.strict_suffixes {
                    diags.report(
                        DiagnosticKind::UnknownSuffix,
                        Some(suffix.span),
                        format!("unknown type suffix '::{other}'"),
                    );
                } else {
                    warn!(suffix = other, "ignoring unknown agtype suffix");
                }
                None
            }
        }
    }

    // ------------------------------------------------------------------
    // Containers
    // ------------------------------------------------------------------

    fn map(&mut self, pairs: &[Pair], diags: &mut Diagnostics) -> Option<PropertyMap> {
        let mut map = PropertyMap::with_capacity(pairs.len());
        for pair in pairs {
            if let Some(value) = self.visit(&pair.value, diags) {
                map.insert(pair.key.clone(), value);
            }
        }
        Some(map)
    }

    fn array(&mut self, items: &[Node], diags: &mut Diagnostics) -> Vec<Entity> {
        items.iter().filter_map(|item| self.visit(item, diags)).collect()
    }

    // ------------------------------------------------------------------
    // Graph elements
    // ------------------------------------------------------------------

    fn vertex(&mut self, pairs: &[Pair], span: Span, diags: &mut Diagnostics) -> Option<Entity> {
        let fields = Fields { pairs, span, what: "vertex" };
        let id = fields.graph_id("id", diags);
        let label = fields.label(diags);
        let properties = self.properties(&fields, diags);
        let id = id?;

        if let Some(cached) = self.vcache.get(&id) {
            trace!(%id, "vertex cache hit");
            return Some(Entity::Vertex(Arc::clone(cached)));
        }

        let vertex = Arc::new(Vertex { id, label: label?, properties: properties? });
        self.vcache.insert(id, Arc::clone(&vertex));
        Some(Entity::Vertex(vertex))
    }

    fn edge(&mut self, pairs: &[Pair], span: Span, diags: &mut Diagnostics) -> Option<Entity> {
        let fields = Fields { pairs, span, what: "edge" };
        let id = fields.graph_id("id", diags);
        let label = fields.label(diags);
        let start_id = fields.graph_id("start_id", diags);
        let end_id = fields.graph_id("end_id", diags);
        let properties = self.properties(&fields, diags);

        Some(Entity::Edge(Arc::new(Edge {
            id: id?,
            label: label?,
            start_id: start_id?,
            end_id: end_id?,
            properties: properties?,
        })))
    }

    fn properties(&mut self, fields: &Fields<'_>, diags: &mut Diagnostics) -> Option<PropertyMap> {
        let node = fields.require("properties", diags)?;
        match node {
            Node::Object { pairs, suffix: None, .. } => self.map(pairs, diags),
            other => {
                diags.coercion(
                    other.span(),
                    format!("{} \"properties\" must be an object, found {}", fields.what, other.describe()),
                );
                None
            }
        }
    }

    fn path(&mut self, items: &[Node], span: Span, diags: &mut Diagnostics) -> Option<Entity> {
        if items.is_empty() {
            diags.coercion(span, "path must contain at least one element");
            return None;
        }

        let mut elements = Vec::with_capacity(items.len());
        let mut complete = true;
        for (index, item) in items.iter().enumerate() {
            match self.visit(item, diags) {
                Some(Entity::Vertex(v)) => elements.push(PathElement::Vertex(v)),
                Some(Entity::Edge(e)) => elements.push(PathElement::Edge(e)),
                Some(other) => {
                    diags.coercion(
                        item.span(),
                        format!("path element {index} must be a vertex or edge, found {}", other.type_name()),
                    );
                    complete = false;
                }
                None => complete = false,
            }
        }

        if !complete {
            return None;
        }
        Path::new(elements).ok().map(|p| Entity::Path(Arc::new(p)))
    }
}

/// Required-key lookup over an object's pairs.
struct Fields<'n> {
    pairs: &'n [Pair],
    span: Span,
    what: &'static str,
}

impl<'n> Fields<'n> {
    /// Last occurrence wins, matching plain map decoding.
    fn require(&self, key: &str, diags: &mut Diagnostics) -> Option<&'n Node> {
        let found = self.pairs.iter().rev().find(|p| p.key == key).map(|p| &p.value);
        if found.is_none() {
            diags.syntax(self.span, format!("{} is missing required key \"{key}\"", self.what));
        }
        found
    }

    fn graph_id(&self, key: &str, diags: &mut Diagnostics) -> Option<GraphId> {
        let node = self.require(key, diags)?;
        match node {
            Node::Scalar { literal: Literal::Integer(text), suffix: None, span } => match text.parse::<i64>() {
                Ok(id) => Some(GraphId(id)),
                Err(_) => {
                    diags.coercion(
                        *span,
                        format!("{} \"{key}\" {text} does not fit a 64-bit graph id", self.what),
                    );
                    None
                }
            },
            other => {
                diags.coercion(
                    other.span(),
                    format!("{} \"{key}\" must be an integer, found {}", self.what, other.describe()),
                );
                None
            }
        }
    }

    fn label(&self, diags: &mut Diagnostics) -> Option<String> {
        let node = self.require("label", diags)?;
        match node {
            Node::Scalar { literal: Literal::String(s), suffix: None, .. } => Some(s.clone()),
            other => {
                diags.coercion(
                    other.span(),
                    format!("{} \"label\" must be a string, found {}", self.what, other.describe()),
                );
                None
            }
        }
    }
}

fn misplaced(tag: Tag, node: &Node, diags: &mut Diagnostics) {
    let span = node.suffix().map_or(node.span(), |s| s.span);
    diags.syntax(span, format!("'::{}' cannot follow {}", tag.name(), article(node.describe())));
}

fn article(noun: &str) -> String {
    match noun.chars().next() {
        Some('a' | 'e' | 'i' | 'o' | 'u') => format!("an {noun}"),
        _ => format!("a {noun}"),
    }
}

// ============================================================================
// Scalars and numeric precision
// ============================================================================

fn scalar(literal: &Literal, span: Span, diags: &mut Diagnostics) -> Option<Entity> {
    let entity = match literal {
        Literal::String(s) => Entity::String(s.clone()),
        Literal::Bool(b) => Entity::Bool(*b),
        Literal::Null => Entity::Null,
        Literal::NaN => Entity::Float(f64::NAN),
        Literal::Infinity => Entity::Float(f64::INFINITY),
        Literal::NegInfinity => Entity::Float(f64::NEG_INFINITY),
        Literal::Integer(text) => classify_integer(text).or_else(|| bad_number(text, span, diags))?,
        Literal::Float(text) => classify_float(text).or_else(|| bad_number(text, span, diags))?,
    };
    Some(entity)
}

/// `::numeric` always yields the arbitrary-precision decimal kind.
fn numeric(literal: &Literal, span: Span, diags: &mut Diagnostics) -> Option<Entity> {
    match literal {
        Literal::Integer(text) | Literal::Float(text) => match BigDecimal::from_str(text) {
            Ok(d) => Some(Entity::BigFloat(d)),
            Err(_) => bad_number(text, span, diags),
        },
        Literal::NaN | Literal::Infinity | Literal::NegInfinity => scalar(literal, span, diags),
        other => {
            diags.syntax(span, format!("'::numeric' cannot follow {}", article(other.describe())));
            scalar(literal, span, diags)
        }
    }
}

fn bad_number(text: &str, span: Span, diags: &mut Diagnostics) -> Option<Entity> {
    diags.coercion(span, format!("malformed number '{text}'"));
    None
}

/// Int when it fits in i64, BigInt otherwise.
pub(crate) fn classify_integer(text: &str) -> Option<Entity> {
    if let Ok(i) = text.parse::<i64>() {
        return Some(Entity::Int(i));
    }
    BigInt::from_str(text).ok().map(Entity::BigInt)
}

/// Float when an f64 reproduces the literal's decimal value, BigFloat otherwise.
pub(crate) fn classify_float(text: &str) -> Option<Entity> {
    let value: f64 = text.parse().ok()?;
    let (digits, zero) = mantissa_digits(text);

    // Up to 15 significant digits always survive a round trip through a normal f64.
    if digits <= 15 && (value.is_normal() || (value == 0.0 && zero)) {
        return Some(Entity::Float(value));
    }

    let exact = BigDecimal::from_str(text).ok()?;
    if value.is_finite() && BigDecimal::from_str(&value.to_string()).is_ok_and(|d| d == exact) {
        Some(Entity::Float(value))
    } else {
        Some(Entity::BigFloat(exact))
    }
}

/// Significant digit count of the mantissa, and whether they are all zero.
fn mantissa_digits(text: &str) -> (usize, bool) {
    let mantissa = text.split(['e', 'E']).next().unwrap_or(text);
    let digits: Vec<u8> = mantissa.bytes().filter(u8::is_ascii_digit).collect();
    let significant = digits.iter().skip_while(|&&d| d == b'0').count();
    (significant, significant == 0)
}
