use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::info;

use crate::error::{Error, Result};
use crate::kind::TypeKind;
use crate::perfect;
use crate::record::Record;
use crate::schema::RecordSchema;
use crate::validation;

/// A named record type: a schema plus the name used to reference it.
///
/// Record types are shared through `Arc` so that constraints of kind
/// [`TypeKind::Record`] can point at them.
#[derive(Debug, PartialEq, Eq)]
pub struct RecordType {
    name: String,
    schema: RecordSchema,
}

impl RecordType {
    /// # Errors
    ///
    /// `Error::IllegalArgument` when `name` is empty.
    pub fn new(name: impl Into<String>, schema: RecordSchema) -> Result<Arc<Self>> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::IllegalArgument(
                "The string \"name\" argument is required.".to_string(),
            ));
        }
        Ok(Arc::new(Self { name, schema }))
    }

    /// Build from a record of raw settings records.
    pub fn from_record(name: impl Into<String>, definitions: Record) -> Result<Arc<Self>> {
        Self::new(name, RecordSchema::from_record(definitions)?)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &RecordSchema {
        &self.schema
    }

    pub fn kind(self: &Arc<Self>) -> TypeKind {
        TypeKind::Record(Arc::clone(self))
    }

    /// A fresh record perfected against this type.
    pub fn instance(&self) -> Record {
        let mut record = Record::new();
        self.perfect(&mut record);
        record
    }

    pub fn perfect(&self, record: &mut Record) {
        perfect::perfect_record(record, &self.schema);
    }

    pub fn collect_errors(&self, record: &Record) -> Vec<String> {
        validation::collect_record_errors(record, &self.schema)
    }

    pub fn validate(&self, record: &Record) -> Result<()> {
        validation::validate_record(record, &self.schema)
    }

    pub fn collect_field_errors(&self, property_name: &str, record: &Record) -> Result<Vec<String>> {
        validation::collect_field_errors(property_name, record, &self.schema)
    }

    pub fn validate_field(&self, property_name: &str, record: &Record) -> Result<()> {
        validation::validate_field(property_name, record, &self.schema)
    }
}

/// Named record types available to schema definitions.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: BTreeMap<String, Arc<RecordType>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    ///
    /// `Error::IllegalArgument` when the name is a builtin alias or already
    /// registered.
    pub fn register(&mut self, record_type: Arc<RecordType>) -> Result<()> {
        let name = record_type.name().to_string();
        if TypeKind::parse(&name).is_ok() {
            return Err(Error::IllegalArgument(format!(
                "\"{name}\" is a builtin type and cannot name a record type."
            )));
        }
        if self.types.contains_key(&name) {
            return Err(Error::IllegalArgument(format!(
                "The record type \"{name}\" is already registered."
            )));
        }
        info!(event = "record_type_registered", record_type = %name, properties = record_type.schema().len());
        self.types.insert(name, record_type);
        Ok(())
    }

    /// Create and register a record type in one step.
    pub fn define(&mut self, name: impl Into<String>, schema: RecordSchema) -> Result<Arc<RecordType>> {
        let record_type = RecordType::new(name, schema)?;
        self.register(Arc::clone(&record_type))?;
        Ok(record_type)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<RecordType>> {
        self.types.get(name)
    }

    /// Resolve a type alias: builtin aliases first, then record names.
    ///
    /// `Ok(None)` declares an untyped property.
    ///
    /// # Errors
    ///
    /// `Error::IllegalType` when the alias matches neither.
    pub fn resolve(&self, alias: &str) -> Result<Option<TypeKind>> {
        match TypeKind::parse(alias) {
            Ok(kind) => Ok(kind),
            Err(err) => match self.types.get(alias) {
                Some(record_type) => Ok(Some(record_type.kind())),
                None => Err(err),
            },
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
