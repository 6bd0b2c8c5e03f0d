//! Integration tests for the `avrocc` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

const PERSON: &str = r#"{
  "type": "record",
  "name": "person",
  "fields": [
    {"name": "name", "type": "string"},
    {"name": "children", "type": {"type": "array", "items": "person"}}
  ]
}"#;

fn avrocc() -> Command {
    Command::new(env!("CARGO_BIN_EXE_avrocc"))
}

fn schema_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("write schema");
    path
}

#[test]
fn generates_three_files_per_schema() {
    let dir = tempfile::tempdir().expect("tempdir");
    let schema = schema_file(dir.path(), "person.json", PERSON);
    let out = dir.path().join("out");

    avrocc()
        .arg("-O")
        .arg(&out)
        .arg(&schema)
        .assert()
        .success();

    for name in [
        "avro-specific-person.def",
        "avro-specific-person.rs",
        "avro-specific-person_impl.rs",
    ] {
        assert!(out.join(name).is_file(), "missing {}", name);
    }
    let types = fs::read_to_string(out.join("avro-specific-person.rs")).expect("types");
    assert!(types.contains("pub struct AvroSpecificPerson {"));
}

#[test]
fn prefixes_are_configurable() {
    let dir = tempfile::tempdir().expect("tempdir");
    let schema = schema_file(dir.path(), "person.json", PERSON);

    avrocc()
        .args(["-f", "gen_", "-t", "family"])
        .arg("--output-path")
        .arg(dir.path())
        .arg(&schema)
        .assert()
        .success();

    let types = fs::read_to_string(dir.path().join("gen_person.rs")).expect("types");
    assert!(types.contains("pub struct FamilyPerson {"));
    let def = fs::read_to_string(dir.path().join("gen_person.def")).expect("def");
    assert!(def.contains("macro_rules! family_schema_definition {"));
}

#[test]
fn yaml_schemas_are_accepted() {
    let dir = tempfile::tempdir().expect("tempdir");
    let schema = schema_file(
        dir.path(),
        "suit.yaml",
        "type: enum\nname: suit\nsymbols: [SPADES, HEARTS]\n",
    );

    avrocc().arg("-O").arg(dir.path()).arg(&schema).assert().success();
    assert!(dir.path().join("avro-specific-suit_impl.rs").is_file());
}

#[test]
fn verbose_reports_progress() {
    let dir = tempfile::tempdir().expect("tempdir");
    let schema = schema_file(dir.path(), "person.json", PERSON);

    avrocc()
        .arg("-v")
        .arg("-O")
        .arg(dir.path())
        .arg(&schema)
        .assert()
        .success()
        .stdout(predicate::str::contains("[~] Loading"))
        .stdout(predicate::str::contains("[✓] Code generation complete!"))
        .stderr(predicate::str::contains("Outputting definitions for person..."));
}

#[test]
fn first_failure_stops_processing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let broken = schema_file(dir.path(), "broken.json", r#"{"type": "record", "name": "broken", "fields": [{"name": "x", "type": "nope"}]}"#);
    let good = schema_file(dir.path(), "person.json", PERSON);

    avrocc()
        .arg("-O")
        .arg(dir.path())
        .arg(&broken)
        .arg(&good)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error processing schema"))
        .stderr(predicate::str::contains("broken.json"))
        .stderr(predicate::str::contains("nope"));

    assert!(!dir.path().join("avro-specific-person.def").exists());
}

#[test]
fn missing_file_is_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    avrocc()
        .arg("-O")
        .arg(dir.path())
        .arg(dir.path().join("absent.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error processing schema"));
}

#[test]
fn schema_files_are_required() {
    avrocc().assert().failure();
}
