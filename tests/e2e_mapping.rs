//! End-to-end tests for label → native type projection.

use age_rs::{Entity, Error, GraphId, Mapped, MappingCursor, MemoryRows};
use pretty_assertions::assert_eq;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct Person {
    name: String,
    #[serde(default)]
    age: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct WorkWith {
    weight: i64,
}

#[derive(Debug, Clone, PartialEq)]
enum Model {
    Person(Person),
    WorkWith(WorkWith),
}

impl From<Person> for Model {
    fn from(p: Person) -> Self {
        Model::Person(p)
    }
}

impl From<WorkWith> for Model {
    fn from(w: WorkWith) -> Self {
        Model::WorkWith(w)
    }
}

const PATH_ROW: &str = r#"[{"id": 2251799813685424, "label": "Person", "properties": {"name": "Joe"}}::vertex,
    {"id": 2533274790396576, "label": "workWith", "end_id": 2251799813685425, "start_id": 2251799813685424, "properties": {"weight": 3}}::edge,
    {"id": 2251799813685425, "label": "Person", "properties": {"name": "Smith", "age": 41}}::vertex]::path"#;

fn cursor(rows: &[&str]) -> MappingCursor<MemoryRows, Model> {
    let mut cursor = MappingCursor::new(MemoryRows::new(rows.iter().copied()));
    cursor.put_type::<Person>("Person").put_type::<WorkWith>("workWith");
    cursor
}

#[test]
fn test_path_is_projected_element_by_element() {
    let mut cursor = cursor(&[PATH_ROW]);
    assert!(cursor.next());
    let row = cursor.get_row().unwrap();

    let items = row.items().unwrap();
    assert!(matches!(row, Mapped::Path(_)));
    assert_eq!(items.len(), 3);
    assert_eq!(
        items[0].as_native(),
        Some(&Model::Person(Person { name: "Joe".into(), age: None }))
    );
    assert_eq!(items[1].as_native(), Some(&Model::WorkWith(WorkWith { weight: 3 })));

    let Mapped::Native(smith) = &items[2] else { panic!("expected a projection") };
    assert_eq!(smith.id, GraphId(2251799813685425));
    assert_eq!(smith.value, Model::Person(Person { name: "Smith".into(), age: Some(41) }));

    let Mapped::Native(edge) = &items[1] else { panic!("expected a projection") };
    assert_eq!(edge.ends, Some((GraphId(2251799813685424), GraphId(2251799813685425))));
}

#[test]
fn test_unregistered_labels_stay_generic() {
    let rows = cursor(&[
        r#"{"id": 5, "label": "City", "properties": {"name": "Oslo"}}::vertex"#,
        "42",
    ])
    .all()
    .unwrap();

    let city = rows[0].as_entity().unwrap().as_vertex().unwrap();
    assert_eq!(city.label, "City");
    assert_eq!(rows[1], Mapped::Entity(Entity::Int(42)));
}

#[test]
fn test_projection_failure_stops_all() {
    let incomplete = cursor(&[
        r#"{"id": 1, "label": "Person", "properties": {"name": "Ann"}}::vertex"#,
        r#"{"id": 2, "label": "Person", "properties": {"nickname": "B"}}::vertex"#,
        r#"{"id": 3, "label": "Person", "properties": {"name": "Cy"}}::vertex"#,
    ])
    .all()
    .unwrap_err();

    assert_eq!(incomplete.rows.len(), 1);
    assert!(matches!(incomplete.error, Error::Projection { ref label, .. } if label == "Person"));
}

#[test]
fn test_array_of_vertices() {
    let row = r#"[{"id": 1, "label": "Person", "properties": {"name": "Ann"}}::vertex, "note"]"#;
    let rows = cursor(&[row]).all().unwrap();
    let Mapped::Array(items) = &rows[0] else { panic!("expected a mapped array") };
    assert!(items[0].is_native());
    assert_eq!(items[1], Mapped::Entity(Entity::from("note")));
}
