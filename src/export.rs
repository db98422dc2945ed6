//! Re-serialization of decoded entities.
//!
//! Two targets:
//!
//! ```text
//! Entity → write_literal() → agtype text (decodes back to an equal Entity)
//! Entity → to_json()       → serde_json::Value (plain JSON for HTTP relays)
//! ```
//!
//! Map keys are written in sorted order so output is stable.

use std::fmt::{self, Write};

use serde_json::{Map as JsonMap, Number, Value as JsonValue};

use crate::model::*;

/// Write `entity` as agtype literal text.
pub fn write_literal<W: Write>(out: &mut W, entity: &Entity) -> fmt::Result {
    match entity {
        Entity::Null => out.write_str("null"),
        Entity::Bool(b) => write!(out, "{b}"),
        Entity::Int(i) => write!(out, "{i}"),
        Entity::BigInt(b) => write!(out, "{b}"),
        Entity::Float(f) => write_float(out, *f),
        Entity::BigFloat(d) => write!(out, "{d}::numeric"),
        Entity::String(s) => write_string(out, s),
        Entity::Array(items) => {
            out.write_char('[')?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 { out.write_str(", ")?; }
                write_literal(out, item)?;
            }
            out.write_char(']')
        }
        Entity::Map(m) => write_map(out, m),
        Entity::Vertex(v) => write_vertex(out, v),
        Entity::Edge(e) => write_edge(out, e),
        Entity::Path(p) => {
            out.write_char('[')?;
            for (i, el) in p.iter().enumerate() {
                if i > 0 { out.write_str(", ")?; }
                match el {
                    PathElement::Vertex(v) => write_vertex(out, v)?,
                    PathElement::Edge(e) => write_edge(out, e)?,
                }
            }
            out.write_str("]::path")
        }
    }
}

/// Convenience wrapper around [`write_literal`].
pub fn to_literal(entity: &Entity) -> String {
    let mut s = String::new();
    // Writing into a String cannot fail.
    let _ = write_literal(&mut s, entity);
    s
}

fn write_vertex<W: Write>(out: &mut W, v: &Vertex) -> fmt::Result {
    write!(out, "{{\"id\": {}, \"label\": ", v.id)?;
    write_string(out, &v.label)?;
    out.write_str(", \"properties\": ")?;
    write_map(out, &v.properties)?;
    out.write_str("}::vertex")
}

fn write_edge<W: Write>(out: &mut W, e: &Edge) -> fmt::Result {
    write!(out, "{{\"id\": {}, \"label\": ", e.id)?;
    write_string(out, &e.label)?;
    write!(out, ", \"end_id\": {}, \"start_id\": {}, \"properties\": ", e.end_id, e.start_id)?;
    write_map(out, &e.properties)?;
    out.write_str("}::edge")
}

fn write_map<W: Write>(out: &mut W, m: &PropertyMap) -> fmt::Result {
    let mut keys: Vec<&String> = m.keys().collect();
    keys.sort();
    out.write_char('{')?;
    for (i, key) in keys.into_iter().enumerate() {
        if i > 0 { out.write_str(", ")?; }
        write_string(out, key)?;
        out.write_str(": ")?;
        write_literal(out, &m[key])?;
    }
    out.write_char('}')
}

/// Floats always carry a `.` or exponent so they do not decode back as integers.
fn write_float<W: Write>(out: &mut W, f: f64) -> fmt::Result {
    if f.is_nan() {
        out.write_str("NaN")
    } else if f.is_infinite() {
        out.write_str(if f > 0.0 { "Infinity" } else { "-Infinity" })
    } else {
        write!(out, "{f:?}")
    }
}

fn write_string<W: Write>(out: &mut W, s: &str) -> fmt::Result {
    out.write_char('"')?;
    for c in s.chars() {
        match c {
            '"' => out.write_str("\\\"")?,
            '\\' => out.write_str("\\\\")?,
            '\n' => out.write_str("\\n")?,
            '\r' => out.write_str("\\r")?,
            '\t' => out.write_str("\\t")?,
            '\u{8}' => out.write_str("\\b")?,
            '\u{c}' => out.write_str("\\f")?,
            c if (c as u32) < 0x20 => write!(out, "\\u{:04x}", c as u32)?,
            c => out.write_char(c)?,
        }
    }
    out.write_char('"')
}

// ============================================================================
// JSON
// ============================================================================

/// Plain JSON view of an entity.
///
/// Arbitrary-precision numbers and non-finite floats become strings, since
/// JSON numbers cannot carry them.
pub fn to_json(entity: &Entity) -> JsonValue {
    match entity {
        Entity::Null => JsonValue::Null,
        Entity::Bool(b) => JsonValue::Bool(*b),
        Entity::Int(i) => JsonValue::from(*i),
        Entity::BigInt(b) => match i64::try_from(b) {
            Ok(i) => JsonValue::from(i),
            Err(_) => JsonValue::String(b.to_string()),
        },
        Entity::Float(f) => match Number::from_f64(*f) {
            Some(n) => JsonValue::Number(n),
            None => JsonValue::String(to_literal(entity)),
        },
        Entity::BigFloat(d) => JsonValue::String(d.to_string()),
        Entity::String(s) => JsonValue::String(s.clone()),
        Entity::Array(items) => JsonValue::Array(items.iter().map(to_json).collect()),
        Entity::Map(m) => JsonValue::Object(properties_json(m)),
        Entity::Vertex(v) => vertex_json(v),
        Entity::Edge(e) => edge_json(e),
        Entity::Path(p) => JsonValue::Array(
            p.iter()
                .map(|el| match el {
                    PathElement::Vertex(v) => vertex_json(v),
                    PathElement::Edge(e) => edge_json(e),
                })
                .collect(),
        ),
    }
}

/// JSON object built from a property map.
pub fn properties_json(props: &PropertyMap) -> JsonMap<String, JsonValue> {
    props.iter().map(|(k, v)| (k.clone(), to_json(v))).collect()
}

fn vertex_json(v: &Vertex) -> JsonValue {
    serde_json::json!({
        "id": v.id.0,
        "label": v.label,
        "properties": properties_json(&v.properties),
    })
}

fn edge_json(e: &Edge) -> JsonValue {
    serde_json::json!({
        "id": e.id.0,
        "label": e.label,
        "start_id": e.start_id.0,
        "end_id": e.end_id.0,
        "properties": properties_json(&e.properties),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use std::sync::Arc;
    use bigdecimal::BigDecimal;

    #[test]
    fn test_format_scalars() {
        assert_eq!(to_literal(&Entity::from("he\"llo")), r#""he\"llo""#);
        assert_eq!(to_literal(&Entity::Int(42)), "42");
        assert_eq!(to_literal(&Entity::Float(3.0)), "3.0");
        assert_eq!(to_literal(&Entity::Float(f64::NEG_INFINITY)), "-Infinity");
        assert_eq!(to_literal(&Entity::Bool(true)), "true");
        assert_eq!(to_literal(&Entity::Null), "null");
        assert_eq!(
            to_literal(&Entity::BigFloat(BigDecimal::from_str("1.25").unwrap())),
            "1.25::numeric"
        );
    }

    #[test]
    fn test_format_map_sorted() {
        let m: Entity = [("b", 2), ("a", 1)].into_iter().collect();
        assert_eq!(to_literal(&m), r#"{"a": 1, "b": 2}"#);
    }

    #[test]
    fn test_format_path() {
        let mut path = Path::single(Arc::new(Vertex::new(1, "A")));
        path.append(Arc::new(Edge::new(3, "R", 1, 2)), Arc::new(Vertex::new(2, "B")));
        assert_eq!(
            to_literal(&Entity::from(path)),
            concat!(
                r#"[{"id": 1, "label": "A", "properties": {}}::vertex, "#,
                r#"{"id": 3, "label": "R", "end_id": 2, "start_id": 1, "properties": {}}::edge, "#,
                r#"{"id": 2, "label": "B", "properties": {}}::vertex]::path"#,
            )
        );
    }

    #[test]
    fn test_json_view() {
        let v = Entity::from(Vertex::new(5, "Person").with_property("name", "Joe"));
        assert_eq!(
            to_json(&v),
            serde_json::json!({"id": 5, "label": "Person", "properties": {"name": "Joe"}})
        );
        assert_eq!(to_json(&Entity::Float(f64::NAN)), JsonValue::String("NaN".into()));
    }
}
