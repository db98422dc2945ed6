//! End-to-end tests for decoding agtype literals.
//!
//! Each test exercises: text -> lexer -> parser -> unmarshal -> Entity.
//! Literals are taken from real AGE output.

use std::str::FromStr;
use std::sync::Arc;

use age_rs::{decode, Decoder, DecoderConfig, DiagnosticKind, Entity, EntityKind, GraphId, Span};
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use pretty_assertions::assert_eq;

const SMITH_JOE_PATH: &str = r#"[{"id": 2251799813685425, "label": "Person", "properties": {"name": "Smith"}}::vertex,
    {"id": 2533274790396576, "label": "workWith", "end_id": 2251799813685425, "start_id": 2251799813685424, "properties": {"weight": 3}}::edge,
    {"id": 2251799813685424, "label": "Person", "properties": {"name": "Joe"}}::vertex]::path"#;

const JOE_SMITH_PATH: &str = r#"[{"id": 2251799813685424, "label": "Person", "properties": {"name": "Joe"}}::vertex,
    {"id": 2533274790396576, "label": "workWith", "end_id": 2251799813685425, "start_id": 2251799813685424, "properties": {"weight": 3}}::edge,
    {"id": 2251799813685425, "label": "Person", "properties": {"name": "Smith"}}::vertex]::path"#;

// ============================================================================
// 1. Scalars and plain containers
// ============================================================================

#[test]
fn test_plain_map() {
    let entity = decode(r#"{"name":"Smith","num":123,"yn":true}"#).unwrap();
    let map = entity.as_map().unwrap();
    assert_eq!(map.len(), 3);
    assert_eq!(map["name"], Entity::from("Smith"));
    assert_eq!(map["num"], Entity::Int(123));
    assert_eq!(map["yn"], Entity::Bool(true));
}

#[test]
fn test_plain_array_kinds_in_order() {
    let entity = decode(r#"["a","b",1,true]"#).unwrap();
    let kinds: Vec<EntityKind> = entity.as_array().unwrap().iter().map(Entity::kind).collect();
    assert_eq!(kinds, vec![EntityKind::String, EntityKind::String, EntityKind::Int, EntityKind::Bool]);
}

#[test]
fn test_scalar_literals() {
    assert_eq!(decode(r#""abcd""#).unwrap(), Entity::from("abcd"));
    assert_eq!(decode("1234").unwrap(), Entity::Int(1234));
    assert_eq!(decode("1234.56789").unwrap(), Entity::Float(1234.56789));
    assert_eq!(decode("true").unwrap(), Entity::Bool(true));
    assert_eq!(decode("null").unwrap(), Entity::Null);
    assert_eq!(decode("-17").unwrap(), Entity::Int(-17));
}

#[test]
fn test_special_floats() {
    assert!(decode("NaN").unwrap().as_float().unwrap().is_nan());
    assert_eq!(decode("Infinity").unwrap(), Entity::Float(f64::INFINITY));
    assert_eq!(decode("-Infinity").unwrap(), Entity::Float(f64::NEG_INFINITY));
    assert_eq!(decode("6.45161290322581e+46").unwrap(), Entity::Float(6.45161290322581e46));
}

#[test]
fn test_string_escapes() {
    let entity = decode(r#""tab\there \"quoted\" é 😀""#).unwrap();
    assert_eq!(entity.as_str().unwrap(), "tab\there \"quoted\" é 😀");

    let entity = decode(r#""\u00e9 \ud83d\ude00 \/""#).unwrap();
    assert_eq!(entity.as_str().unwrap(), "é 😀 /");
}

// ============================================================================
// 2. Numeric precision
// ============================================================================

#[test]
fn test_integer_bound() {
    assert_eq!(decode("9223372036854775807").unwrap(), Entity::Int(i64::MAX));

    let big = decode("9223372036854775808").unwrap();
    assert_eq!(big.kind(), EntityKind::BigInt);
}

#[test]
fn test_big_integer_matches_independent_parse() {
    let entity = decode("12345678901235555555555555555").unwrap();
    let expected = BigInt::from_str("12345678901235555555555555555").unwrap();
    assert_eq!(entity, Entity::BigInt(expected.clone()));
    assert_eq!(entity.as_big_int().unwrap(), expected);
}

#[test]
fn test_numeric_suffix() {
    assert_eq!(
        decode("123::numeric").unwrap(),
        Entity::BigFloat(BigDecimal::from_str("123").unwrap())
    );
    assert_eq!(
        decode("123456789123456789123456789.12345::numeric").unwrap(),
        Entity::BigFloat(BigDecimal::from_str("123456789123456789123456789.12345").unwrap())
    );
    assert_eq!(decode("NaN::numeric").unwrap().kind(), EntityKind::Float);
}

#[test]
fn test_float_without_suffix_that_f64_cannot_hold() {
    let entity = decode("123456789123456789123456789.12345").unwrap();
    assert_eq!(entity.kind(), EntityKind::BigFloat);
}

// ============================================================================
// 3. Graph elements
// ============================================================================

#[test]
fn test_vertex_properties() {
    let text = r#"{"id": 2251799813685425, "label": "Person",
        "properties": {"name": "Smith", "numInt":123, "numIntBig":12345678901235555555555555555, "numFloat": 384.23424,
        "yn":true, "nullVal": null}}::vertex"#;
    let entity = decode(text).unwrap();
    let v = entity.as_vertex().unwrap();

    assert_eq!(v.id, GraphId(2251799813685425));
    assert_eq!(v.label, "Person");
    assert_eq!(v.prop::<String>("name").unwrap(), "Smith");
    assert_eq!(v.prop::<i64>("numInt").unwrap(), 123);
    assert_eq!(
        v.prop::<BigInt>("numIntBig").unwrap(),
        BigInt::from_str("12345678901235555555555555555").unwrap()
    );
    assert_eq!(v.prop::<f64>("numFloat").unwrap(), 384.23424);
    assert!(v.prop::<bool>("yn").unwrap());
    assert_eq!(v.prop::<Option<String>>("nullVal").unwrap(), None);
}

#[test]
fn test_edge() {
    let text = r#"{"id": 2533274790396576, "label": "workWith", "end_id": 2251799813685425,
        "start_id": 2251799813685424, "properties": {"weight": 3}}::edge"#;
    let entity = decode(text).unwrap();
    let e = entity.as_edge().unwrap();
    assert_eq!(e.start_id, GraphId(2251799813685424));
    assert_eq!(e.end_id, GraphId(2251799813685425));
    assert_eq!(e.prop::<i64>("weight").unwrap(), 3);
}

#[test]
fn test_path_shape() {
    let entity = decode(SMITH_JOE_PATH).unwrap();
    let path = entity.as_path().unwrap();

    assert_eq!(path.len(), 3);
    assert!(path.get(0).unwrap().is_vertex());
    assert!(!path.get(1).unwrap().is_vertex());
    assert!(path.get(2).unwrap().is_vertex());

    let edge = path.edge(1).unwrap();
    assert_eq!(edge.start_id, path.vertex(2).unwrap().id);
    assert_eq!(edge.end_id, path.vertex(0).unwrap().id);
}

#[test]
fn test_paths_agree_on_shared_vertices() {
    let p1 = decode(SMITH_JOE_PATH).unwrap();
    let p2 = decode(JOE_SMITH_PATH).unwrap();
    let (p1, p2) = (p1.as_path().unwrap(), p2.as_path().unwrap());

    assert_eq!(p1.start().unwrap().get("name"), p2.end().unwrap().get("name"));
    assert_eq!(p1.vertex(0).unwrap(), p2.vertex(2).unwrap());
}

#[test]
fn test_repeated_vertex_is_same_handle() {
    let text = r#"[{"id": 1, "label": "A", "properties": {"n": 1}}::vertex,
        {"id": 9, "label": "LOOP", "start_id": 1, "end_id": 1, "properties": {}}::edge,
        {"id": 1, "label": "A", "properties": {"n": 2}}::vertex]::path"#;
    let entity = decode(text).unwrap();
    let path = entity.as_path().unwrap();

    let first = path.vertex(0).unwrap();
    let last = path.vertex(2).unwrap();
    assert!(Arc::ptr_eq(first, last));
    // First occurrence wins.
    assert_eq!(last.prop::<i64>("n").unwrap(), 1);
}

#[test]
fn test_cache_spans_nested_containers_within_one_literal() {
    let text = r#"{"a": {"id": 7, "label": "X", "properties": {}}::vertex,
        "b": [{"id": 7, "label": "X", "properties": {}}::vertex]}"#;
    let entity = decode(text).unwrap();
    let map = entity.as_map().unwrap();
    let a = map["a"].as_vertex().unwrap();
    let b = map["b"].as_array().unwrap()[0].as_vertex().unwrap();
    assert!(Arc::ptr_eq(a, b));
}

#[test]
fn test_cache_does_not_span_calls() {
    let text = r#"{"id": 7, "label": "X", "properties": {}}::vertex"#;
    let mut decoder = Decoder::new();
    let a = decoder.decode(text).unwrap();
    let b = decoder.decode(text).unwrap();
    assert!(!Arc::ptr_eq(a.as_vertex().unwrap(), b.as_vertex().unwrap()));
}

#[test]
fn test_extra_keys_on_vertex_are_ignored() {
    let text = r#"{"id": 1, "label": "A", "properties": {}, "extra": [1, 2]}::vertex"#;
    assert_eq!(decode(text).unwrap().as_vertex().unwrap().id, GraphId(1));
}

// ============================================================================
// 4. Errors
// ============================================================================

#[test]
fn test_missing_closing_brace() {
    let err = decode(r#"{"id": 1, "label": "A", "properties": {}"#).unwrap_err();
    assert!(err.has_kind(DiagnosticKind::Syntax));
    assert_eq!(err.input, r#"{"id": 1, "label": "A", "properties": {}"#);
}

#[test]
fn test_every_problem_is_reported() {
    let err = decode(r#"[1, @, {"id": "x", "label": "A", "properties": {}}::vertex, 2 3]"#).unwrap_err();
    assert!(err.has_kind(DiagnosticKind::Lex));
    assert!(err.has_kind(DiagnosticKind::TypeCoercion));
    assert!(err.has_kind(DiagnosticKind::Syntax));
    assert!(err.diagnostics.len() >= 3);
}

#[test]
fn test_missing_required_key() {
    let err = decode(r#"{"id": 1, "properties": {}}::vertex"#).unwrap_err();
    assert!(err.has_kind(DiagnosticKind::Syntax));
    assert!(err.messages().any(|m| m.contains("label")));
}

#[test]
fn test_unknown_suffix_falls_back_to_map() {
    let entity = decode(r#"{"name": "Smith"}::widget"#).unwrap();
    let map = entity.as_map().unwrap();
    assert_eq!(map["name"], Entity::from("Smith"));
}

#[test]
fn test_unknown_suffix_in_strict_mode() {
    let mut decoder = Decoder::with_config(DecoderConfig {
        strict_suffixes: true,
        ..Default::default()
    });
    let err = decoder.decode(r#"{"a": 1}::widget"#).unwrap_err();
    let diag = &err.diagnostics[0];
    assert_eq!(diag.kind, DiagnosticKind::UnknownSuffix);
    // Covers `::widget`.
    assert_eq!(diag.span, Some(Span { start: 8, end: 16 }));
}

#[test]
fn test_trailing_input() {
    let err = decode("1 2").unwrap_err();
    assert_eq!(err.diagnostics.len(), 1);
    assert_eq!(err.diagnostics[0].kind, DiagnosticKind::TrailingInput);
    assert_eq!(err.diagnostics[0].span, Some(Span { start: 2, end: 3 }));
}

#[test]
fn test_bad_character_span() {
    let text = "[1, @]";
    let err = decode(text).unwrap_err();
    let lex = err
        .diagnostics
        .iter()
        .find(|d| d.kind == DiagnosticKind::Lex)
        .unwrap();
    let span = lex.span.unwrap();
    assert_eq!(span, Span { start: 4, end: 5 });
    assert_eq!(&text[span.start..span.end], "@");
}

#[test]
fn test_spans_point_into_the_input() {
    let text = r#"[1, @, {"id": "x", "label": "A", "properties": {}}::vertex, 2 3]"#;
    let err = decode(text).unwrap_err();
    for diag in &err.diagnostics {
        if let Some(span) = diag.span {
            assert!(span.start <= span.end && span.end <= text.len(), "{diag}");
        }
    }
    let coercion = err
        .diagnostics
        .iter()
        .find(|d| d.kind == DiagnosticKind::TypeCoercion)
        .unwrap();
    let span = coercion.span.unwrap();
    assert!(text[span.start..span.end].contains(r#""x""#));
}

#[test]
fn test_path_with_scalar_element() {
    let err = decode(r#"[{"id": 1, "label": "A", "properties": {}}::vertex, 5]::path"#).unwrap_err();
    assert!(err.has_kind(DiagnosticKind::TypeCoercion));
}

#[test]
fn test_misplaced_suffix() {
    let err = decode(r#""abc"::numeric"#).unwrap_err();
    assert!(err.has_kind(DiagnosticKind::Syntax));
    let err = decode("[1, 2]::vertex").unwrap_err();
    assert!(err.has_kind(DiagnosticKind::Syntax));
}

#[test]
fn test_wrong_accessor_is_an_error_not_a_panic() {
    let entity = decode(r#"["a", 1]"#).unwrap();
    assert!(entity.as_map().is_err());
    assert!(entity.as_array().unwrap()[0].as_int().is_err());
}
