//! Conversion between JSON documents and [`Value`]s.
//!
//! Untyped conversion maps JSON shapes one to one. Schema-guided conversion
//! uses a property's declared kinds to recover values JSON cannot express
//! directly (dates, sets, tuples, complex numbers, nested records). Values
//! that do not fit their declared kind are converted untyped and left for
//! validation to report.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::{Map, Number, Value as JsonValue};

use crate::constraint::{
    PropertyConstraint, DEFAULT, ENUM, MAX, MEMBER_MAX, MEMBER_MIN, MEMBER_TYPE, MIN, TYPE,
};
use crate::error::{Error, Result};
use crate::kind::TypeKind;
use crate::record::Record;
use crate::record_type::TypeRegistry;
use crate::schema::RecordSchema;
use crate::value::{Complex, Value};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S%.f";
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

impl From<&JsonValue> for Value {
    fn from(json: &JsonValue) -> Self {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(value) => Value::Bool(*value),
            JsonValue::Number(number) => number_value(number),
            JsonValue::String(text) => Value::Str(text.clone()),
            JsonValue::Array(items) => Value::List(items.iter().map(Value::from).collect()),
            JsonValue::Object(entries) => Value::Dict(
                entries
                    .iter()
                    .map(|(key, value)| (key.clone(), Value::from(value)))
                    .collect(),
            ),
        }
    }
}

fn number_value(number: &Number) -> Value {
    match number.as_i64() {
        Some(value) => Value::Int(value),
        None => number.as_f64().map_or(Value::Null, Value::Float),
    }
}

impl Value {
    /// Render as JSON. Sets and tuples become arrays, dates and times ISO
    /// strings, complex numbers `{"re", "im"}` objects.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Value::Null => JsonValue::Null,
            Value::Bool(value) => JsonValue::Bool(*value),
            Value::Int(value) => JsonValue::from(*value),
            Value::Float(value) => Number::from_f64(*value).map_or(JsonValue::Null, JsonValue::Number),
            Value::Str(value) => JsonValue::String(value.clone()),
            Value::List(members) | Value::Tuple(members) => {
                JsonValue::Array(members.iter().map(Value::to_json).collect())
            }
            Value::Set(members) => JsonValue::Array(members.iter().map(Value::to_json).collect()),
            Value::Dict(entries) => JsonValue::Object(
                entries
                    .iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
            Value::Record(record) => JsonValue::Object(
                record
                    .iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
            Value::Date(value) => JsonValue::String(value.format(DATE_FORMAT).to_string()),
            Value::Time(value) => JsonValue::String(value.format(TIME_FORMAT).to_string()),
            Value::DateTime(value) => {
                JsonValue::String(value.format(DATETIME_FORMATS[0]).to_string())
            }
            Value::Complex(value) => {
                let mut entries = Map::new();
                entries.insert("re".to_string(), JsonValue::from(value.re));
                entries.insert("im".to_string(), JsonValue::from(value.im));
                JsonValue::Object(entries)
            }
            Value::Type(kind) => JsonValue::String(kind.alias().to_string()),
        }
    }
}

/// Convert `json` guided by a declared kind and member kind.
pub fn value_from_json(
    json: &JsonValue,
    kind: Option<&TypeKind>,
    member_kind: Option<&TypeKind>,
) -> Value {
    let Some(kind) = kind else {
        return Value::from(json);
    };

    let coerced = match (kind, json) {
        (_, JsonValue::Null) => Some(Value::Null),
        (TypeKind::Float, JsonValue::Number(number)) => number.as_f64().map(Value::Float),
        (TypeKind::Date, JsonValue::String(text)) => NaiveDate::parse_from_str(text, DATE_FORMAT)
            .ok()
            .map(Value::Date),
        (TypeKind::Time, JsonValue::String(text)) => NaiveTime::parse_from_str(text, TIME_FORMAT)
            .ok()
            .map(Value::Time),
        (TypeKind::DateTime, JsonValue::String(text)) => DATETIME_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
            .map(Value::DateTime),
        (TypeKind::Complex, JsonValue::Object(entries)) => complex_from_json(entries),
        (TypeKind::Complex, JsonValue::Number(number)) => {
            number.as_f64().map(|re| Value::Complex(Complex::new(re, 0.0)))
        }
        (TypeKind::List, JsonValue::Array(items)) => Some(Value::List(
            items
                .iter()
                .map(|item| value_from_json(item, member_kind, None))
                .collect(),
        )),
        (TypeKind::Set, JsonValue::Array(items)) => Some(Value::Set(
            items
                .iter()
                .map(|item| value_from_json(item, member_kind, None))
                .collect(),
        )),
        (TypeKind::Tuple, JsonValue::Array(items)) => {
            Some(Value::Tuple(items.iter().map(Value::from).collect()))
        }
        (TypeKind::Record(record_type), JsonValue::Object(entries)) => Some(Value::Record(
            record_from_map(entries, record_type.schema()),
        )),
        _ => None,
    };

    coerced.unwrap_or_else(|| Value::from(json))
}

fn complex_from_json(entries: &Map<String, JsonValue>) -> Option<Value> {
    let re = entries.get("re").and_then(JsonValue::as_f64)?;
    let im = entries.get("im").and_then(JsonValue::as_f64).unwrap_or(0.0);
    Some(Value::Complex(Complex::new(re, im)))
}

/// Convert a JSON object into a record, coercing known properties by kind.
///
/// # Errors
///
/// `Error::IllegalArgument` when `json` is not an object.
pub fn record_from_json(json: &JsonValue, schema: &RecordSchema) -> Result<Record> {
    match json {
        JsonValue::Object(entries) => Ok(record_from_map(entries, schema)),
        other => Err(Error::IllegalArgument(format!(
            "A record must be a JSON object, found: {other}"
        ))),
    }
}

fn record_from_map(entries: &Map<String, JsonValue>, schema: &RecordSchema) -> Record {
    entries
        .iter()
        .map(|(key, json)| {
            let value = match schema.get(key) {
                Some(constraint) => {
                    value_from_json(json, constraint.kind(), constraint.member_kind())
                }
                None => Value::from(json),
            };
            (key.clone(), value)
        })
        .collect()
}

/// Build a constraint from a JSON definition object.
///
/// `type` and `member_type` aliases resolve through `registry`, so record
/// types registered earlier can be referenced by name. Settings holding
/// values are coerced with the declared kinds.
///
/// # Errors
///
/// `Error::IllegalArgument` when `json` is not an object, otherwise any
/// construction error of [`PropertyConstraint::from_record`].
pub fn constraint_from_json(json: &JsonValue, registry: &TypeRegistry) -> Result<PropertyConstraint> {
    let JsonValue::Object(entries) = json else {
        return Err(Error::IllegalArgument(format!(
            "A property definition must be a JSON object, found: {json}"
        )));
    };

    let kind = resolve_setting(entries.get(TYPE), registry);
    let member_kind = resolve_setting(entries.get(MEMBER_TYPE), registry);
    let kind_hint = kind.as_ref().and_then(Value::as_kind);
    let member_hint = member_kind.as_ref().and_then(Value::as_kind);

    let mut settings = Record::new();
    for (setting, json) in entries {
        let value = match setting.as_str() {
            TYPE => kind.clone().unwrap_or_else(|| Value::from(json)),
            MEMBER_TYPE => member_kind.clone().unwrap_or_else(|| Value::from(json)),
            ENUM => enum_from_json(json, kind_hint, member_hint),
            DEFAULT => value_from_json(json, kind_hint, member_hint),
            MIN | MAX => bound_from_json(json, kind_hint),
            MEMBER_MIN | MEMBER_MAX => bound_from_json(json, member_hint),
            _ => Value::from(json),
        };
        settings.set(setting.clone(), value);
    }

    PropertyConstraint::from_record(settings)
}

/// Resolved type setting, or `None` to keep the raw alias for perfecting
/// to reject.
fn resolve_setting(json: Option<&JsonValue>, registry: &TypeRegistry) -> Option<Value> {
    let alias = json?.as_str()?;
    match registry.resolve(alias) {
        Ok(kind) => Some(kind.map_or(Value::Null, Value::Type)),
        Err(_) => None,
    }
}

fn enum_from_json(
    json: &JsonValue,
    kind: Option<&TypeKind>,
    member_kind: Option<&TypeKind>,
) -> Value {
    let JsonValue::Array(items) = json else {
        return Value::from(json);
    };
    let hint = match kind {
        Some(TypeKind::List | TypeKind::Set) => member_kind,
        other => other,
    };
    Value::Set(
        items
            .iter()
            .map(|item| value_from_json(item, hint, None))
            .collect(),
    )
}

fn bound_from_json(json: &JsonValue, kind: Option<&TypeKind>) -> Value {
    match kind {
        Some(kind) if kind.is_comparable() => value_from_json(json, Some(kind), None),
        _ => Value::from(json),
    }
}
