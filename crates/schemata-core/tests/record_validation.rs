use schemata_core::constraint::{DEFAULT, ENUM, MAX, MEMBER_MIN, MEMBER_TYPE, MIN, REQUIRED, TYPE};
use schemata_core::{Error, Record, RecordSchema, RecordType, Value};

fn settings(pairs: Vec<(&str, Value)>) -> Record {
    pairs.into_iter().collect()
}

fn person_schema() -> RecordSchema {
    RecordSchema::from_entries([
        (
            "name",
            settings(vec![(TYPE, "str".into()), (REQUIRED, true.into())]),
        ),
        (
            "age",
            settings(vec![(TYPE, "int".into()), (MIN, 0.into()), (MAX, 150.into())]),
        ),
        (
            "tags",
            settings(vec![
                (TYPE, "list".into()),
                (MEMBER_TYPE, "str".into()),
                (MEMBER_MIN, 2.into()),
                (DEFAULT, Value::list(Vec::<Value>::new())),
            ]),
        ),
    ])
    .expect("valid schema")
}

#[test]
fn perfect_then_validate_reports_every_failure() {
    let schema = person_schema();
    let mut record: Record = [("age", Value::from(200)), ("nickname", Value::from("x"))]
        .into_iter()
        .collect();

    schema.perfect_record(&mut record);
    assert_eq!(
        record.keys().collect::<Vec<_>>(),
        vec!["age", "name", "tags"]
    );
    assert_eq!(record.get("tags"), Some(&Value::list(Vec::<Value>::new())));

    assert_eq!(
        schema.collect_record_errors(&record),
        vec![
            r#"The value for "name" is required."#.to_string(),
            r#"The value of "200" for "age" fails max of 150."#.to_string(),
        ]
    );
}

#[test]
fn raising_form_carries_the_same_messages() {
    let schema = person_schema();
    let record: Record = [("name", Value::from("Ada")), ("tags", Value::list(["ab", "c"]))]
        .into_iter()
        .collect();

    let err = schema.validate_record(&record).expect_err("should raise");
    assert_eq!(
        err.validation_errors(),
        Some(&[r#"The value of "c" for "tags" fails min length of 2."#.to_string()][..])
    );
}

#[test]
fn missing_required_value_yields_exactly_one_error() {
    let schema = RecordSchema::from_entries([(
        "code",
        settings(vec![
            (TYPE, "str".into()),
            (REQUIRED, true.into()),
            (MIN, 3.into()),
            (ENUM, Value::set(["abc"])),
        ]),
    )])
    .expect("valid schema");

    assert_eq!(schema.collect_record_errors(&Record::new()).len(), 1);
}

#[test]
fn enumeration_message_lists_members_sorted() {
    let schema = RecordSchema::from_entries([(
        "size",
        settings(vec![(ENUM, Value::set(["small", "large", "medium"]))]),
    )])
    .expect("valid schema");
    let record: Record = [("size", "huge")].into_iter().collect();

    assert_eq!(
        schema.collect_record_errors(&record),
        vec![
            r#"The value "huge" for "size" not in enumeration ["large", "medium", "small"]."#
                .to_string()
        ]
    );
}

#[test]
fn min_and_max_are_reported_independently() {
    let schema = RecordSchema::from_entries([(
        "word",
        settings(vec![(TYPE, "str".into()), (MIN, 5.into()), (MAX, 2.into())]),
    )])
    .expect("valid schema");
    let record: Record = [("word", "abc")].into_iter().collect();

    assert_eq!(
        schema.collect_record_errors(&record),
        vec![
            r#"The value of "abc" for "word" fails min of 5."#.to_string(),
            r#"The value of "abc" for "word" fails max of 2."#.to_string(),
        ]
    );
}

#[test]
fn nested_records_report_one_child_message() {
    let address = RecordType::new(
        "Address",
        RecordSchema::from_entries([
            (
                "city",
                settings(vec![(TYPE, "str".into()), (REQUIRED, true.into())]),
            ),
            (
                "zip",
                settings(vec![(TYPE, "str".into()), (MAX, 4.into())]),
            ),
        ])
        .expect("valid schema"),
    )
    .expect("valid type");

    let schema = RecordSchema::from_entries([(
        "home",
        settings(vec![(TYPE, Value::Type(address.kind()))]),
    )])
    .expect("valid schema");

    let home: Record = [("zip", "123456")].into_iter().collect();
    let mut record: Record = [("home", home)].into_iter().collect();
    schema.perfect_record(&mut record);

    let child = record
        .get("home")
        .and_then(Value::as_record)
        .expect("nested record");
    assert_eq!(child.get("city"), Some(&Value::Null));

    assert_eq!(
        schema.collect_record_errors(&record),
        vec![
            "The child property home, has errors:: The value for \"city\" is required. || \
             The value of \"123456\" for \"zip\" fails max of 4."
                .to_string()
        ]
    );
}

#[test]
fn field_validation_checks_one_property() {
    let schema = person_schema();
    let record: Record = [("age", -1)].into_iter().collect();

    assert_eq!(
        schemata_core::collect_field_errors("age", &record, &schema).expect("known field"),
        vec![r#"The value of "-1" for "age" fails min of 0."#.to_string()]
    );
    assert!(matches!(
        schemata_core::validate_field("", &record, &schema),
        Err(Error::IllegalArgument(_))
    ));
}

#[test]
fn illegal_declarations_surface_before_validation() {
    let err = RecordSchema::from_entries([("x", settings(vec![(TYPE, "blob".into())]))])
        .expect_err("should fail");
    assert!(matches!(err, Error::IllegalType(msg) if msg == "Illegal type declaration: blob"));
}
