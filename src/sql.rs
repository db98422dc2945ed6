//! SQL builders for running graph queries through AGE.
//!
//! These functions only produce text. Sending it to PostgreSQL and feeding
//! the returned rows into a [`Cursor`](crate::Cursor) is the caller's job.
//!
//! ```text
//! cypher_query("social", "MATCH (n) RETURN n", &["n"])
//!   → SELECT * FROM cypher('social', $$ MATCH (n) RETURN n $$) AS (n agtype);
//! ```

use crate::{Error, Result};

/// PostgreSQL's identifier length limit.
pub const MAX_IDENTIFIER_LEN: usize = 63;

pub const MIN_GRAPH_NAME_LEN: usize = 3;

/// Session preamble that makes `cypher(...)` and `agtype` visible.
pub const SETUP_STATEMENTS: [&str; 2] = [
    "LOAD 'age';",
    "SET search_path = ag_catalog, \"$user\", public;",
];

/// Check a graph name against AGE's naming rules.
///
/// 3 to 63 characters; starts with a letter or `_`; letters, digits, `_`,
/// `.` and `-` in the middle; ends with a letter, digit or `_`.
pub fn validate_graph_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| Error::InvalidName {
        kind: "graph",
        name: name.to_owned(),
        reason: reason.to_owned(),
    };

    let len = name.chars().count();
    if len < MIN_GRAPH_NAME_LEN {
        return Err(invalid("must be at least 3 characters"));
    }
    if len > MAX_IDENTIFIER_LEN {
        return Err(invalid("must not exceed 63 characters"));
    }

    let bytes = name.as_bytes();
    let first_ok = bytes[0].is_ascii_alphabetic() || bytes[0] == b'_';
    let last = bytes[bytes.len() - 1];
    let last_ok = last.is_ascii_alphanumeric() || last == b'_';
    let middle_ok = name
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'.' | b'-'));
    if !(first_ok && last_ok && middle_ok) {
        return Err(invalid(
            "must start with a letter or underscore, contain only letters, digits, \
             underscores, dots and hyphens, and end with a letter, digit or underscore",
        ));
    }
    Ok(())
}

/// Check a plain SQL identifier (column name, column type).
pub fn validate_identifier(name: &str, kind: &'static str) -> Result<()> {
    let invalid = |reason: &str| Error::InvalidName {
        kind,
        name: name.to_owned(),
        reason: reason.to_owned(),
    };

    let mut bytes = name.bytes();
    match bytes.next() {
        None => return Err(invalid("must not be empty")),
        Some(b) if !(b.is_ascii_alphabetic() || b == b'_') => {
            return Err(invalid("must start with a letter or underscore"));
        }
        Some(_) => {}
    }
    if name.len() > MAX_IDENTIFIER_LEN {
        return Err(invalid("must not exceed 63 characters"));
    }
    if !bytes.all(|b| b.is_ascii_alphanumeric() || b == b'_') {
        return Err(invalid("may only contain letters, digits and underscores"));
    }
    Ok(())
}

/// Check a vertex or edge label.
pub fn validate_label_name(label: &str) -> Result<()> {
    validate_identifier(label, "label")
}

/// Normalize one column spec: `"n"` becomes `"n agtype"`, `"n type"` is
/// kept after both parts are validated. Blank specs yield `None`.
fn column_spec(col: &str) -> Result<Option<String>> {
    let parts: Vec<&str> = col.split_whitespace().collect();
    match parts.as_slice() {
        [] => Ok(None),
        [name] => {
            validate_identifier(name, "column")?;
            Ok(Some(format!("{name} agtype")))
        }
        [name, ty] => {
            validate_identifier(name, "column")?;
            validate_identifier(ty, "column type")?;
            Ok(Some(format!("{name} {ty}")))
        }
        _ => Err(Error::InvalidName {
            kind: "column",
            name: col.to_owned(),
            reason: "must be 'name' or 'name type'".into(),
        }),
    }
}

/// Build the `SELECT * FROM cypher(...)` statement for one graph query.
///
/// With no columns the result is read as a single `v agtype` column.
pub fn cypher_query(graph: &str, cypher: &str, columns: &[&str]) -> Result<String> {
    validate_graph_name(graph)?;
    if cypher.contains("$$") {
        return Err(Error::InvalidQuery(
            "cypher text must not contain the $$ dollar-quote delimiter".into(),
        ));
    }

    let mut cols = Vec::with_capacity(columns.len().max(1));
    for col in columns {
        if let Some(spec) = column_spec(col)? {
            cols.push(spec);
        }
    }
    if cols.is_empty() {
        cols.push("v agtype".to_owned());
    }

    Ok(format!(
        "SELECT * FROM cypher('{graph}', $$ {} $$) AS ({});",
        cypher.trim(),
        cols.join(", ")
    ))
}

/// `SELECT create_graph('<graph>');`
pub fn create_graph(graph: &str) -> Result<String> {
    validate_graph_name(graph)?;
    Ok(format!("SELECT create_graph('{graph}');"))
}

/// `SELECT drop_graph('<graph>', <cascade>);`
pub fn drop_graph(graph: &str, cascade: bool) -> Result<String> {
    validate_graph_name(graph)?;
    Ok(format!("SELECT drop_graph('{graph}', {cascade});"))
}

/// Counts rows in `ag_graph` with this name; zero means the graph is absent.
pub fn graph_exists(graph: &str) -> Result<String> {
    validate_graph_name(graph)?;
    Ok(format!("SELECT count(*) FROM ag_catalog.ag_graph WHERE name = '{graph}';"))
}
