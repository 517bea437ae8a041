use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use tracing::info;

use crate::constraint::NAME;
use crate::error::Error;
use crate::json::constraint_from_json;
use crate::record_type::{RecordType, TypeRegistry};
use crate::schema::RecordSchema;

/// Errors raised while reading a schema document.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("schema error in record type \"{record_type}\": {source}")]
    Schema {
        record_type: String,
        #[source]
        source: Error,
    },
}

/// A file describing one or more named record types.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaDocument {
    pub records: Vec<RecordDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordDefinition {
    pub name: String,
    pub properties: PropertyDefinitions,
}

/// Properties keyed by name, or listed with a `name` in each definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyDefinitions {
    Named(Map<String, JsonValue>),
    Listed(Vec<JsonValue>),
}

impl SchemaDocument {
    pub fn from_json_str(input: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let document = Self::from_json_str(&raw)?;
        info!(
            event = "schema_document_loaded",
            path = %path.as_ref().display(),
            records = document.records.len()
        );
        Ok(document)
    }

    /// Build every record type in document order.
    ///
    /// A record may reference any record defined before it by name.
    pub fn build_registry(&self) -> Result<TypeRegistry, DocumentError> {
        let mut registry = TypeRegistry::new();
        for definition in &self.records {
            let record_type = definition
                .build(&registry)
                .map_err(|source| DocumentError::Schema {
                    record_type: definition.name.clone(),
                    source,
                })?;
            registry
                .register(record_type)
                .map_err(|source| DocumentError::Schema {
                    record_type: definition.name.clone(),
                    source,
                })?;
        }
        Ok(registry)
    }
}

impl RecordDefinition {
    fn build(&self, registry: &TypeRegistry) -> crate::Result<std::sync::Arc<RecordType>> {
        let schema = match &self.properties {
            PropertyDefinitions::Named(entries) => RecordSchema::from_entries(
                entries
                    .iter()
                    .map(|(key, json)| Ok((key.clone(), constraint_from_json(json, registry)?)))
                    .collect::<crate::Result<Vec<_>>>()?,
            )?,
            PropertyDefinitions::Listed(items) => {
                let mut schema = RecordSchema::new();
                for json in items {
                    if json.get(NAME).and_then(JsonValue::as_str).is_none() {
                        return Err(Error::IllegalArgument(format!(
                            "Every listed property of \"{}\" needs a string \"name\".",
                            self.name
                        )));
                    }
                    schema.add(constraint_from_json(json, registry)?)?;
                }
                schema
            }
        };
        RecordType::new(self.name.clone(), schema)
    }
}

impl TypeRegistry {
    pub fn from_document(document: &SchemaDocument) -> Result<Self, DocumentError> {
        document.build_registry()
    }
}
