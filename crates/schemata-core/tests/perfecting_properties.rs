use proptest::prelude::*;
use schemata_core::constraint::{DEFAULT, TYPE};
use schemata_core::{Record, RecordSchema, Value};

fn schema() -> RecordSchema {
    RecordSchema::from_entries([
        (
            "tags",
            [(TYPE, Value::from("list")), (DEFAULT, Value::list(["fresh"]))]
                .into_iter()
                .collect::<Record>(),
        ),
        (
            "count",
            [(TYPE, Value::from("int")), (DEFAULT, Value::from(0))]
                .into_iter()
                .collect(),
        ),
        ("note", [(TYPE, Value::from("str"))].into_iter().collect()),
    ])
    .expect("valid schema")
}

/// Scalar leaves, with nulls common enough to exercise default filling.
fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        2 => Just(Value::Null),
        1 => any::<bool>().prop_map(Value::Bool),
        1 => any::<i64>().prop_map(Value::Int),
        1 => "[a-z ]{0,12}".prop_map(Value::Str),
    ]
}

/// Records mixing schema keys with arbitrary extra keys.
fn record() -> impl Strategy<Value = Record> {
    let key = prop_oneof![
        Just("tags".to_string()),
        Just("count".to_string()),
        Just("note".to_string()),
        "[a-z]{1,8}",
    ];
    prop::collection::vec((key, leaf()), 0..8).prop_map(|entries| entries.into_iter().collect())
}

proptest! {
    /// Perfecting an already perfected record changes nothing.
    #[test]
    fn perfecting_is_idempotent(mut input in record()) {
        let schema = schema();
        schema.perfect_record(&mut input);
        let once = input.clone();
        schema.perfect_record(&mut input);
        prop_assert_eq!(input, once);
    }

    /// A perfected record has exactly the schema's keys.
    #[test]
    fn perfected_keys_match_schema(mut input in record()) {
        let schema = schema();
        schema.perfect_record(&mut input);
        let mut keys: Vec<_> = input.keys().map(str::to_string).collect();
        keys.sort();
        prop_assert_eq!(keys, vec!["count".to_string(), "note".to_string(), "tags".to_string()]);
    }

    /// Mutating a filled default never leaks into another record or the schema.
    #[test]
    fn defaults_are_isolated(mut first in record(), mut second in record()) {
        let schema = schema();
        first.set("tags", Value::Null);
        second.set("tags", Value::Null);
        schema.perfect_record(&mut first);
        schema.perfect_record(&mut second);

        if let Some(Value::List(tags)) = first.get_mut("tags") {
            tags.push(Value::from("mutated"));
        }

        prop_assert_eq!(second.get("tags"), Some(&Value::list(["fresh"])));
        prop_assert_eq!(
            schema.get("tags").and_then(|constraint| constraint.default_value()),
            Some(&Value::list(["fresh"]))
        );
    }
}
