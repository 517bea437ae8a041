use std::fs;
use std::path::{Path, PathBuf};

use schemata_core::{Record, SchemaDocument, TypeRegistry, Value, record_from_json};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../fixtures")
        .join(name)
}

fn load_people() -> (TypeRegistry, Vec<serde_json::Value>) {
    let document =
        SchemaDocument::load(fixture("people.schema.json")).expect("load schema document");
    let registry = TypeRegistry::from_document(&document).expect("build registry");

    let contents = fs::read_to_string(fixture("people.records.json"))
        .unwrap_or_else(|_| panic!("missing records fixture"));
    let records: Vec<serde_json::Value> = serde_json::from_str(&contents).expect("parse records");
    (registry, records)
}

fn perfected(registry: &TypeRegistry, json: &serde_json::Value) -> Record {
    let person = registry.get("Person").expect("Person registered");
    let mut record = record_from_json(json, person.schema()).expect("record object");
    person.perfect(&mut record);
    record
}

#[test]
fn document_registers_every_record_type() {
    let (registry, _) = load_people();
    assert_eq!(registry.names().collect::<Vec<_>>(), vec!["Address", "Person"]);
}

#[test]
fn valid_person_passes() {
    let (registry, records) = load_people();
    let person = registry.get("Person").expect("Person registered");
    let record = perfected(&registry, &records[0]);

    assert!(person.validate(&record).is_ok());
    let home = record.get("home").and_then(Value::as_record).expect("home");
    assert_eq!(home.get("country"), Some(&Value::from("NZ")));
}

#[test]
fn unknown_keys_are_stripped_and_failures_listed() {
    let (registry, records) = load_people();
    let person = registry.get("Person").expect("Person registered");
    let record = perfected(&registry, &records[1]);

    assert!(!record.contains_key("nickname"));
    assert_eq!(
        person.collect_errors(&record),
        vec![
            r#"The value for "name" is required."#.to_string(),
            r#"The value of "200" for "age" fails max of 150."#.to_string(),
        ]
    );
}

#[test]
fn nested_and_member_failures_are_reported() {
    let (registry, records) = load_people();
    let person = registry.get("Person").expect("Person registered");
    let record = perfected(&registry, &records[2]);

    assert_eq!(
        person.collect_errors(&record),
        vec![
            r#"The value of "c" for "tags" fails min length of 2."#.to_string(),
            "The child property home, has errors:: The value for \"city\" is required. || \
             Value \"abc\" for postcode does not meet regex: [0-9]{4} || \
             The value \"UK\" for \"country\" not in enumeration [\"AU\", \"NZ\"]."
                .to_string(),
        ]
    );
}

#[test]
fn perfected_records_render_back_to_json() {
    let (registry, records) = load_people();
    let record = perfected(&registry, &records[1]);
    let rendered = Value::Record(record).to_json();

    assert_eq!(rendered["age"], serde_json::json!(200));
    assert_eq!(rendered["tags"], serde_json::json!([]));
    assert!(rendered["name"].is_null());
}
