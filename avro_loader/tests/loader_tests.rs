use avro_loader::{load_schema_file, parse_schema, parse_schema_yaml, LoadError, SchemaLoader};
use avro_types::{SchemaDef, SchemaError, SchemaType};
use std::fs;

const PERSON: &str = r#"{
    "type": "record",
    "name": "person",
    "fields": [
        {"name": "first_name", "type": "string"},
        {"name": "last_name", "type": "string"},
        {"name": "age", "type": "int"},
        {"name": "children", "type": {"type": "array", "items": "person"}}
    ]
}"#;

#[test]
fn recursive_reference_becomes_link() {
    let person = parse_schema(PERSON).expect("person");
    assert_eq!(person.schema_type(), SchemaType::Record);
    assert_eq!(person.record_size(), 4);

    let children = person.record_field_by_name("children").expect("children");
    let items = children.array_items().expect("items");
    assert_eq!(items.schema_type(), SchemaType::Link);
    let target = items.link_target().expect("bound link");
    assert!(target.ptr_eq(&person));
}

#[test]
fn named_types_are_reusable_by_name() {
    let schema = parse_schema(
        r#"{"type": "record", "name": "pair", "namespace": "geo", "fields": [
              {"name": "kind", "type": {"type": "enum", "name": "kind", "symbols": ["A", "B"]}},
              {"name": "again", "type": "kind"},
              {"name": "hash", "type": {"type": "fixed", "name": "hash", "size": 4}},
              {"name": "tags", "type": {"type": "map", "values": ["null", "hash"]}}
           ]}"#,
    )
    .expect("schema");
    let kind = schema.record_field(0).expect("kind");
    let again = schema.record_field(1).expect("again");
    assert!(kind.ptr_eq(again));
    assert_eq!(schema.full_name().as_deref(), Some("geo.pair"));

    let tags = schema.record_field_by_name("tags").expect("tags");
    let branch = tags.map_values().and_then(|v| v.union_branch(1)).expect("branch");
    assert_eq!(branch.fixed_size(), Some(4));
}

#[test]
fn loader_keeps_types_across_documents() {
    let mut loader = SchemaLoader::new();
    let first: SchemaDef =
        serde_json::from_str(r#"{"type": "fixed", "name": "md5", "size": 16}"#).expect("parse");
    let md5 = loader.load(&first).expect("md5");

    let second: SchemaDef = serde_json::from_str(r#"["null", "md5"]"#).expect("parse");
    let union = loader.load(&second).expect("union");
    assert!(union.union_branch(1).expect("branch").ptr_eq(&md5));
    assert!(loader.named("md5").is_some());
}

#[test]
fn unknown_and_duplicate_names_rejected() {
    assert!(matches!(
        parse_schema(r#"{"type": "array", "items": "nowhere"}"#),
        Err(LoadError::UnknownType { name }) if name == "nowhere"
    ));
    assert!(matches!(
        parse_schema(
            r#"{"type": "record", "name": "r", "fields": [
                  {"name": "a", "type": {"type": "fixed", "name": "r", "size": 1}}
               ]}"#
        ),
        Err(LoadError::Redefined { .. })
    ));
    assert!(matches!(
        parse_schema(
            r#"{"type": "record", "name": "r", "fields": [
                  {"name": "a", "type": "int"}, {"name": "a", "type": "long"}
               ]}"#
        ),
        Err(LoadError::Schema(SchemaError::DuplicateField { .. }))
    ));
}

#[test]
fn yaml_model_matches_json() {
    let yaml = r#"
type: record
name: person
fields:
  - name: first_name
    type: string
  - name: last_name
    type: string
  - name: age
    type: int
  - name: children
    type:
      type: array
      items: person
"#;
    let from_yaml = parse_schema_yaml(yaml).expect("yaml");
    let from_json = parse_schema(PERSON).expect("json");
    assert_eq!(from_yaml, from_json);
}

#[test]
fn load_from_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    let json_path = dir.path().join("person.avsc");
    fs::write(&json_path, PERSON).expect("write");
    let schema = load_schema_file(&json_path).expect("load json");
    assert_eq!(schema.type_name(), "person");

    let yaml_path = dir.path().join("list.yaml");
    fs::write(&yaml_path, "type: array\nitems: long\n").expect("write");
    let schema = load_schema_file(&yaml_path).expect("load yaml");
    assert_eq!(schema.schema_type(), SchemaType::Array);

    let missing = dir.path().join("missing.avsc");
    assert!(matches!(load_schema_file(&missing), Err(LoadError::Io { .. })));
}
