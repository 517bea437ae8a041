use tracing::debug;

use crate::kind::TypeKind;
use crate::record::Record;
use crate::schema::RecordSchema;
use crate::value::Value;

/// Normalize `record` in place so it has exactly the schema's properties.
///
/// Unknown keys are removed, missing keys are added as null, and null
/// values receive an independent copy of the property default. Nested
/// record values are perfected against their own schema.
pub fn perfect_record(record: &mut Record, schema: &RecordSchema) {
    let before = record.len();
    record.retain(|key, _| schema.contains(key));
    let stripped = before - record.len();

    for (name, constraint) in schema.iter() {
        if !record.contains_key(name) {
            record.set(name, Value::Null);
        }

        let Some(value) = record.get_mut(name) else {
            continue;
        };

        if value.is_null() {
            if let Some(default) = constraint.default_value() {
                *value = default.clone();
            }
        }

        if let (Some(TypeKind::Record(record_type)), Value::Record(child)) = (constraint.kind(), value) {
            perfect_record(child, record_type.schema());
        }
    }

    if stripped > 0 {
        debug!(event = "record_perfected", stripped, "removed unknown properties");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::{DEFAULT, TYPE};
    use crate::record_type::RecordType;

    fn schema() -> RecordSchema {
        RecordSchema::from_entries([
            (
                "tags",
                [(TYPE, Value::from("list")), (DEFAULT, Value::list(["new"]))]
                    .into_iter()
                    .collect::<Record>(),
            ),
            ("age", [(TYPE, Value::from("int"))].into_iter().collect()),
        ])
        .expect("valid schema")
    }

    #[test]
    fn strips_fills_and_defaults() {
        let mut record: Record = [("extra", Value::from(1)), ("age", Value::from(3))]
            .into_iter()
            .collect();
        perfect_record(&mut record, &schema());

        assert!(!record.contains_key("extra"));
        assert_eq!(record.get("age"), Some(&Value::Int(3)));
        assert_eq!(record.get("tags"), Some(&Value::list(["new"])));
    }

    #[test]
    fn missing_without_default_becomes_null() {
        let mut record = Record::new();
        perfect_record(&mut record, &schema());
        assert_eq!(record.get("age"), Some(&Value::Null));
    }

    #[test]
    fn defaults_are_independent_copies() {
        let schema = schema();
        let mut first = Record::new();
        let mut second = Record::new();
        perfect_record(&mut first, &schema);
        perfect_record(&mut second, &schema);

        if let Some(Value::List(tags)) = first.get_mut("tags") {
            tags.push(Value::from("mutated"));
        }
        assert_eq!(second.get("tags"), Some(&Value::list(["new"])));
        assert_eq!(
            schema.get("tags").and_then(|c| c.default_value()),
            Some(&Value::list(["new"]))
        );
    }

    #[test]
    fn present_values_are_not_replaced() {
        let mut record: Record = [("tags", Value::list(["kept"]))].into_iter().collect();
        perfect_record(&mut record, &schema());
        assert_eq!(record.get("tags"), Some(&Value::list(["kept"])));
    }

    #[test]
    fn record_defaults_are_copied_then_perfected() {
        let address = RecordType::from_record(
            "Address",
            [
                ("city", Value::Record([(TYPE, Value::from("str"))].into_iter().collect())),
                (
                    "country",
                    Value::Record(
                        [(TYPE, Value::from("str")), (DEFAULT, Value::from("NZ"))]
                            .into_iter()
                            .collect(),
                    ),
                ),
            ]
            .into_iter()
            .collect(),
        )
        .expect("valid address");
        let home_default: Record = [("city", Value::from("Akl"))].into_iter().collect();
        let schema = RecordSchema::from_entries([(
            "home",
            [
                (TYPE, Value::Type(address.kind())),
                (DEFAULT, Value::Record(home_default.clone())),
            ]
            .into_iter()
            .collect::<Record>(),
        )])
        .expect("valid schema");

        let mut record = Record::new();
        perfect_record(&mut record, &schema);

        let expected: Record = [("city", Value::from("Akl")), ("country", Value::from("NZ"))]
            .into_iter()
            .collect();
        assert_eq!(record.get("home"), Some(&Value::Record(expected)));
        assert_eq!(
            schema.get("home").and_then(|c| c.default_value()),
            Some(&Value::Record(home_default))
        );
    }
}
