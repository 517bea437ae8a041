use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use schemata_core::{Record, RecordType, SchemaDocument, TypeRegistry, Value, record_from_json};
use serde_json::Value as JsonValue;

use crate::CliError;
use crate::output::write_json_file;
use crate::settings::ValidateSettings;

/// Records read from a file holding either one object or an array.
#[derive(Debug)]
pub enum RecordsInput {
    Single(JsonValue),
    Many(Vec<JsonValue>),
}

impl RecordsInput {
    pub fn parse(input: &str) -> Result<Self, CliError> {
        match serde_json::from_str(input)? {
            JsonValue::Array(items) => Ok(RecordsInput::Many(items)),
            object @ JsonValue::Object(_) => Ok(RecordsInput::Single(object)),
            other => Err(CliError::InvalidInput(format!(
                "records must be a JSON object or array, found: {other}"
            ))),
        }
    }

    pub fn load(path: &Path) -> Result<Self, CliError> {
        Self::parse(&std::fs::read_to_string(path)?)
    }

    fn items(&self) -> Vec<&JsonValue> {
        match self {
            RecordsInput::Single(item) => vec![item],
            RecordsInput::Many(items) => items.iter().collect(),
        }
    }
}

/// Outcome of a `validate` run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationSummary {
    pub total: usize,
    pub invalid: usize,
}

pub fn load_registry(schema: &Path) -> Result<TypeRegistry, CliError> {
    let document = SchemaDocument::load(schema)?;
    Ok(TypeRegistry::from_document(&document)?)
}

fn lookup(registry: &TypeRegistry, name: &str) -> Result<Arc<RecordType>, CliError> {
    registry
        .get(name)
        .cloned()
        .ok_or_else(|| CliError::UnknownRecordType(name.to_string()))
}

/// Load a schema document and report every record type it defines.
pub fn run_check(schema: &Path, out: &mut impl Write) -> Result<(), CliError> {
    let registry = load_registry(schema)?;
    for name in registry.names() {
        let record_type = lookup(&registry, name)?;
        record_type.schema().validate()?;
        let properties: Vec<&str> = record_type.schema().names().collect();
        writeln!(out, "{name}: {} properties ({})", properties.len(), properties.join(", "))?;
    }
    writeln!(out, "{} record types ok", registry.len())?;
    Ok(())
}

/// Validate every record, printing the failures of each invalid one.
pub fn run_validate(
    schema: &Path,
    record_type: &str,
    records: &Path,
    settings: &ValidateSettings,
    out: &mut impl Write,
) -> Result<ValidationSummary, CliError> {
    let registry = load_registry(schema)?;
    let record_type = lookup(&registry, record_type)?;
    let input = RecordsInput::load(records)?;

    let mut summary = ValidationSummary {
        total: 0,
        invalid: 0,
    };
    for (index, json) in input.items().into_iter().enumerate() {
        let mut record = record_from_json(json, record_type.schema())?;
        if settings.perfect {
            record_type.perfect(&mut record);
        }
        let errors = record_type.collect_errors(&record);

        summary.total += 1;
        if errors.is_empty() {
            writeln!(out, "record {index}: ok")?;
            continue;
        }
        summary.invalid += 1;
        writeln!(out, "record {index}: {} errors", errors.len())?;
        for error in &errors {
            writeln!(out, "  - {error}")?;
        }
    }

    tracing::info!(
        event = "records_validated",
        record_type = %record_type.name(),
        total = summary.total,
        invalid = summary.invalid
    );
    writeln!(out, "{} of {} records invalid", summary.invalid, summary.total)?;
    Ok(summary)
}

/// Perfect every record and emit the result as JSON, keeping the input's
/// single-object or array shape.
pub fn run_perfect(
    schema: &Path,
    record_type: &str,
    records: &Path,
    destination: Option<&Path>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let registry = load_registry(schema)?;
    let record_type = lookup(&registry, record_type)?;
    let input = RecordsInput::load(records)?;

    let mut perfected = Vec::new();
    for json in input.items() {
        let mut record: Record = record_from_json(json, record_type.schema())?;
        record_type.perfect(&mut record);
        perfected.push(Value::Record(record).to_json());
    }

    let rendered = match input {
        RecordsInput::Single(_) => perfected.pop().unwrap_or(JsonValue::Null),
        RecordsInput::Many(_) => JsonValue::Array(perfected),
    };

    match destination {
        Some(path) => write_json_file(path, &rendered),
        None => {
            serde_json::to_writer_pretty(&mut *out, &rendered)?;
            writeln!(out)?;
            Ok(())
        }
    }
}
