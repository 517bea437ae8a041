use tracing::error;

use crate::constraint::{PropertyConstraint, NAME};
use crate::error::{raise_if_any, Error, Result};
use crate::record::Record;
use crate::value::Value;
use crate::{perfect, validation};

/// One property definition as accepted by [`RecordSchema`] builders.
#[derive(Debug, Clone)]
pub enum PropertyDefinition {
    /// Raw settings, converted through [`PropertyConstraint::from_record`].
    Raw(Record),
    /// An already built constraint, used as is.
    Constraint(PropertyConstraint),
}

impl PropertyDefinition {
    fn declared_name(&self) -> Option<&str> {
        match self {
            PropertyDefinition::Raw(settings) => settings.get(NAME).and_then(Value::as_str),
            PropertyDefinition::Constraint(constraint) => constraint.name(),
        }
    }

    /// Build the constraint and force its name to `name`.
    fn into_named_constraint(self, name: &str) -> Result<PropertyConstraint> {
        let mut constraint = match self {
            PropertyDefinition::Raw(mut settings) => {
                settings.set(NAME, name);
                PropertyConstraint::from_record(settings)?
            }
            PropertyDefinition::Constraint(constraint) => constraint,
        };
        constraint.set_name(name);
        Ok(constraint)
    }
}

impl From<Record> for PropertyDefinition {
    fn from(settings: Record) -> Self {
        PropertyDefinition::Raw(settings)
    }
}

impl From<PropertyConstraint> for PropertyDefinition {
    fn from(constraint: PropertyConstraint) -> Self {
        PropertyDefinition::Constraint(constraint)
    }
}

/// Ordered mapping from property name to its constraint.
///
/// Every constraint's `name` equals the key it is stored under.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSchema {
    properties: Vec<(String, PropertyConstraint)>,
}

impl RecordSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(name, definition)` pairs.
    ///
    /// A failing definition is logged and aborts the whole construction.
    pub fn from_entries<I, K, D>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, D)>,
        K: Into<String>,
        D: Into<PropertyDefinition>,
    {
        let mut schema = Self::new();
        for (key, definition) in entries {
            let key = key.into();
            let constraint = Into::<PropertyDefinition>::into(definition)
                .into_named_constraint(&key)
                .inspect_err(|err| {
                    error!(
                        event = "property_conversion_failed",
                        property = %key,
                        error = %err,
                        "failed to build property constraint"
                    );
                })?;
            schema.insert(key, constraint);
        }
        Ok(schema)
    }

    /// Build from a record whose values are raw settings records.
    ///
    /// # Errors
    ///
    /// `Error::IllegalArgument` when a value is not a record.
    pub fn from_record(definitions: Record) -> Result<Self> {
        let mut entries = Vec::with_capacity(definitions.len());
        for (key, value) in definitions {
            match value {
                Value::Record(settings) => entries.push((key, PropertyDefinition::Raw(settings))),
                other => {
                    return Err(Error::IllegalArgument(format!(
                        "Illegal property definition for \"{key}\": {other}"
                    )));
                }
            }
        }
        Self::from_entries(entries)
    }

    /// Build from a list of definitions that each carry their own name.
    pub fn from_definitions<I, D>(definitions: I) -> Result<Self>
    where
        I: IntoIterator<Item = D>,
        D: Into<PropertyDefinition>,
    {
        let mut schema = Self::new();
        for definition in definitions {
            schema.add(definition)?;
        }
        Ok(schema)
    }

    /// Build from constraints keyed by their own names.
    pub fn from_constraints(constraints: impl IntoIterator<Item = PropertyConstraint>) -> Result<Self> {
        Self::from_definitions(constraints)
    }

    /// Wrap entries that are already named and perfected.
    pub(crate) fn from_trusted(properties: Vec<(String, PropertyConstraint)>) -> Self {
        Self { properties }
    }

    /// Add a definition under its own `name`, replacing any existing entry.
    ///
    /// # Errors
    ///
    /// `Error::IllegalArgument` when the definition has no name.
    pub fn add(&mut self, definition: impl Into<PropertyDefinition>) -> Result<()> {
        let definition = definition.into();
        let Some(name) = definition.declared_name().map(str::to_string) else {
            return Err(Error::IllegalArgument(
                "The \"name\" of the definition must be a non-empty string.".to_string(),
            ));
        };
        if name.is_empty() {
            return Err(Error::IllegalArgument(
                "The \"name\" of the definition must be a non-empty string.".to_string(),
            ));
        }
        let constraint = definition.into_named_constraint(&name)?;
        self.insert(name, constraint);
        Ok(())
    }

    fn insert(&mut self, name: String, constraint: PropertyConstraint) {
        match self.properties.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = constraint,
            None => self.properties.push((name, constraint)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&PropertyConstraint> {
        self.properties
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, constraint)| constraint)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyConstraint)> {
        self.properties
            .iter()
            .map(|(name, constraint)| (name.as_str(), constraint))
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Re-perfect every constraint, e.g. after mutating one in place.
    pub fn perfect(&mut self) -> Result<()> {
        for (name, constraint) in &mut self.properties {
            constraint.perfect()?;
            constraint.set_name(name);
        }
        Ok(())
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut PropertyConstraint> {
        self.properties
            .iter_mut()
            .find(|(existing, _)| existing == name)
            .map(|(_, constraint)| constraint)
    }

    /// Self-validate every constraint, concatenating their failures.
    pub fn collect_errors(&self) -> Vec<String> {
        self.properties
            .iter()
            .flat_map(|(_, constraint)| constraint.collect_errors())
            .collect()
    }

    /// Raising form of [`RecordSchema::collect_errors`].
    pub fn validate(&self) -> Result<()> {
        raise_if_any(self.collect_errors())
    }

    /// Normalize `record` against this schema. See [`perfect::perfect_record`].
    pub fn perfect_record(&self, record: &mut Record) {
        perfect::perfect_record(record, self);
    }

    pub fn collect_record_errors(&self, record: &Record) -> Vec<String> {
        validation::collect_record_errors(record, self)
    }

    pub fn validate_record(&self, record: &Record) -> Result<()> {
        validation::validate_record(record, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::{MIN, REQUIRED, TYPE};
    use crate::kind::TypeKind;

    fn settings(pairs: Vec<(&str, Value)>) -> Record {
        pairs.into_iter().collect()
    }

    #[test]
    fn keys_become_names() {
        let schema = RecordSchema::from_entries([
            ("age", settings(vec![(TYPE, "int".into())])),
            ("name", settings(vec![(NAME, "ignored".into()), (TYPE, "str".into())])),
        ])
        .expect("valid schema");

        assert_eq!(schema.names().collect::<Vec<_>>(), vec!["age", "name"]);
        assert_eq!(schema.get("age").and_then(PropertyConstraint::name), Some("age"));
        assert_eq!(schema.get("name").and_then(PropertyConstraint::name), Some("name"));
    }

    #[test]
    fn constraint_instances_are_renamed() {
        let constraint =
            PropertyConstraint::from_pairs([(NAME, "other"), (TYPE, "int")]).expect("valid");
        let schema = RecordSchema::from_entries([("age", constraint)]).expect("valid schema");
        assert_eq!(schema.get("age").and_then(PropertyConstraint::name), Some("age"));
    }

    #[test]
    fn from_record_rejects_non_record_values() {
        let definitions: Record = [("age", Value::from("int"))].into_iter().collect();
        let err = RecordSchema::from_record(definitions).expect_err("should fail");
        assert!(matches!(err, Error::IllegalArgument(_)));
    }

    #[test]
    fn bad_definition_aborts_construction() {
        let err = RecordSchema::from_entries([(
            "flag",
            settings(vec![(REQUIRED, "yes".into())]),
        )])
        .expect_err("should fail");
        assert_eq!(
            err.validation_errors(),
            Some(&[r#"The value for "required" is not of type "bool": yes"#.to_string()][..])
        );
    }

    #[test]
    fn list_form_requires_names() {
        let err = RecordSchema::from_definitions([settings(vec![(TYPE, "int".into())])])
            .expect_err("should fail");
        assert!(matches!(err, Error::IllegalArgument(_)));

        let schema = RecordSchema::from_definitions([
            settings(vec![(NAME, "a".into()), (TYPE, "int".into())]),
            settings(vec![(NAME, "b".into())]),
        ])
        .expect("valid schema");
        assert_eq!(schema.len(), 2);
        assert!(schema.contains("b"));
    }

    #[test]
    fn add_replaces_existing_in_place() {
        let mut schema = RecordSchema::from_definitions([
            settings(vec![(NAME, "a".into())]),
            settings(vec![(NAME, "b".into())]),
        ])
        .expect("valid schema");
        schema
            .add(settings(vec![(NAME, "a".into()), (TYPE, "int".into())]))
            .expect("added");

        assert_eq!(schema.names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(schema.get("a").and_then(PropertyConstraint::kind), Some(&TypeKind::Int));
    }

    #[test]
    fn mutated_constraints_are_revalidated() {
        let mut schema =
            RecordSchema::from_entries([("age", settings(vec![(TYPE, "int".into())]))])
                .expect("valid schema");
        let constraint = schema.get_mut("age").expect("present");
        constraint.set(MIN, 1);
        constraint.set(REQUIRED, "no");

        schema.perfect().expect("perfects");
        assert_eq!(
            schema.collect_errors(),
            vec![r#"The value for "required" is not of type "bool": no"#.to_string()]
        );
        assert!(schema.validate().is_err());
    }

    #[test]
    fn every_failing_property_is_reported() {
        let mut schema = RecordSchema::from_entries([
            ("a", settings(vec![(TYPE, "int".into())])),
            ("b", settings(vec![(TYPE, "str".into())])),
            ("c", settings(vec![(TYPE, "str".into())])),
        ])
        .expect("valid schema");
        schema.get_mut("a").expect("present").set(REQUIRED, "no");
        schema.get_mut("c").expect("present").set(MIN, "short");

        let expected = vec![
            r#"The value for "required" is not of type "bool": no"#.to_string(),
            r#"The value for "min" is not of type "comparable": short"#.to_string(),
        ];
        assert_eq!(schema.collect_errors(), expected);
        let err = schema.validate().expect_err("should raise");
        assert_eq!(err.validation_errors(), Some(&expected[..]));
    }

    #[test]
    fn record_validation_continues_past_a_failing_property() {
        let schema = RecordSchema::from_entries([
            ("age", settings(vec![(TYPE, "int".into())])),
            ("name", settings(vec![(TYPE, "str".into()), (REQUIRED, true.into())])),
        ])
        .expect("valid schema");
        let record: Record = [("age", Value::from("old"))].into_iter().collect();

        let expected = vec![
            r#"The value for "age" is not of type "int": old"#.to_string(),
            r#"The value for "name" is required."#.to_string(),
        ];
        assert_eq!(schema.collect_record_errors(&record), expected);
        let err = schema.validate_record(&record).expect_err("should raise");
        assert_eq!(err.validation_errors(), Some(&expected[..]));
    }
}
