//! Declarative schemas for dynamic records.
//!
//! A [`RecordSchema`] maps property names to [`PropertyConstraint`]s. Records
//! can be perfected against a schema (unknown keys removed, defaults filled)
//! and validated, either collecting every failure message or raising them as
//! a single [`Error::Validation`].

pub mod constraint;
pub mod document;
pub mod error;
pub mod json;
pub mod kind;
pub mod meta;
pub mod perfect;
pub mod record;
pub mod record_type;
pub mod schema;
pub mod validation;
pub mod value;

pub use constraint::PropertyConstraint;
pub use document::{DocumentError, PropertyDefinitions, RecordDefinition, SchemaDocument};
pub use error::{Error, Result, ValidationError};
pub use json::{constraint_from_json, record_from_json, value_from_json};
pub use kind::TypeKind;
pub use meta::meta_schema;
pub use perfect::perfect_record;
pub use record::Record;
pub use record_type::{RecordType, TypeRegistry};
pub use schema::{PropertyDefinition, RecordSchema};
pub use validation::{
    collect_field_errors, collect_record_errors, validate_field, validate_record, validate_value,
};
pub use value::{Complex, Value};
