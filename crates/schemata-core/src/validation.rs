//! Recursive value and record validation.
//!
//! Every check appends a human-readable message; nothing here raises. The
//! only short-circuits are a missing required value and a top-level type
//! mismatch, after which no further checks are meaningful.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use regex::Regex;
use tracing::debug;

use crate::constraint::PropertyConstraint;
use crate::error::{raise_if_any, Error, Result};
use crate::kind::TypeKind;
use crate::record::Record;
use crate::schema::RecordSchema;
use crate::value::Value;

/// Validate one value against a constraint.
pub fn validate_value(constraint: &PropertyConstraint, value: &Value) -> Vec<String> {
    let mut errors = Vec::new();

    if constraint.required() && value.is_null() {
        errors.push(format!(
            "The value for \"{}\" is required.",
            constraint.label()
        ));
        return errors;
    }

    if !value.is_null() {
        validate_non_none_value(constraint, value, &mut errors);
    }

    errors
}

/// Validate a value that is known not to be null.
///
/// Required-ness is not checked here.
pub fn validate_non_none_value(
    constraint: &PropertyConstraint,
    value: &Value,
    errors: &mut Vec<String>,
) {
    let Some(kind) = constraint.kind() else {
        if !enum_validation(constraint, value) {
            errors.push(enum_message(constraint, value));
        }
        return;
    };

    if !kind.matches(value) {
        errors.push(format!(
            "The value for \"{}\" is not of type \"{kind}\": {value}",
            constraint.label()
        ));
        return;
    }

    if kind.is_collection() {
        validate_collection_members(constraint, kind, value, errors);
    } else {
        non_none_singular_validation(constraint, kind, value, errors);
    }
}

/// Bounds on the collection itself, then member checks for lists and sets.
pub fn validate_collection_members(
    constraint: &PropertyConstraint,
    kind: &TypeKind,
    value: &Value,
    errors: &mut Vec<String>,
) {
    if !min_validation(kind, constraint.min(), value) {
        errors.push(min_message(constraint, value));
    }

    if !max_validation(kind, constraint.max(), value) {
        errors.push(max_message(constraint, value));
    }

    if !matches!(kind, TypeKind::List | TypeKind::Set) {
        return;
    }

    let checks = member_checks(constraint);
    if checks.is_empty() {
        return;
    }

    for member in value.members().unwrap_or_default() {
        for check in &checks {
            check.apply(constraint, member, errors);
        }
    }
}

/// Checks for non-collection values, each independent of the others.
pub fn non_none_singular_validation(
    constraint: &PropertyConstraint,
    kind: &TypeKind,
    value: &Value,
    errors: &mut Vec<String>,
) {
    if !enum_validation(constraint, value) {
        errors.push(enum_message(constraint, value));
    }

    if !min_validation(kind, constraint.min(), value) {
        errors.push(min_message(constraint, value));
    }

    if !max_validation(kind, constraint.max(), value) {
        errors.push(max_message(constraint, value));
    }

    if let (TypeKind::Str, Some(pattern), Value::Str(text)) = (kind, constraint.regex(), value) {
        if !pattern.is_empty() && !text.is_empty() {
            match regex_match(pattern, text) {
                Ok(true) => {}
                Ok(false) => errors.push(format!(
                    "Value \"{text}\" for {} does not meet regex: {pattern}",
                    constraint.label()
                )),
                Err(_) => errors.push(invalid_regex_message(constraint, pattern)),
            }
        }
    }
}

/// True when no enumeration is configured or the value is a member.
///
/// Integers and floats with the same numeric value are the same member.
pub fn enum_validation(constraint: &PropertyConstraint, value: &Value) -> bool {
    match active_enum(constraint) {
        Some(members) => {
            members.contains(value) || members.iter().any(|member| numeric_equal(member, value))
        }
        None => true,
    }
}

fn numeric_equal(left: &Value, right: &Value) -> bool {
    matches!(
        (left, right),
        (Value::Int(_), Value::Float(_)) | (Value::Float(_), Value::Int(_))
    ) && left.compare(right) == Some(Ordering::Equal)
}

/// True when no min is configured or the value satisfies it.
///
/// Boundable kinds bound the length, comparable kinds bound the ordering.
pub fn min_validation(kind: &TypeKind, min: Option<&Value>, value: &Value) -> bool {
    min.is_none_or(|bound| !crosses_bound(kind, value, bound, Ordering::Less))
}

/// True when no max is configured or the value satisfies it.
pub fn max_validation(kind: &TypeKind, max: Option<&Value>, value: &Value) -> bool {
    max.is_none_or(|bound| !crosses_bound(kind, value, bound, Ordering::Greater))
}

fn crosses_bound(kind: &TypeKind, value: &Value, bound: &Value, forbidden: Ordering) -> bool {
    let ordering = if kind.is_boundable() {
        value
            .length()
            .and_then(|length| i64::try_from(length).ok())
            .and_then(|length| Value::Int(length).compare(bound))
    } else if kind.is_comparable() {
        value.compare(bound)
    } else {
        None
    };
    ordering == Some(forbidden)
}

fn active_enum(constraint: &PropertyConstraint) -> Option<&BTreeSet<Value>> {
    constraint
        .enum_values()
        .filter(|members| !members.is_empty())
}

fn enum_message(constraint: &PropertyConstraint, value: &Value) -> String {
    let sorted = active_enum(constraint)
        .map(|members| Value::List(members.iter().cloned().collect()))
        .unwrap_or_default();
    format!(
        "The value \"{value}\" for \"{}\" not in enumeration {sorted}.",
        constraint.label()
    )
}

fn min_message(constraint: &PropertyConstraint, value: &Value) -> String {
    format!(
        "The value of \"{value}\" for \"{}\" fails min of {}.",
        constraint.label(),
        constraint.min().cloned().unwrap_or_default()
    )
}

fn max_message(constraint: &PropertyConstraint, value: &Value) -> String {
    format!(
        "The value of \"{value}\" for \"{}\" fails max of {}.",
        constraint.label(),
        constraint.max().cloned().unwrap_or_default()
    )
}

fn invalid_regex_message(constraint: &PropertyConstraint, pattern: &str) -> String {
    format!(
        "The regex \"{pattern}\" for \"{}\" is not a valid pattern.",
        constraint.label()
    )
}

/// Match anchored at the start of the text only.
fn regex_match(pattern: &str, text: &str) -> std::result::Result<bool, regex::Error> {
    let regex = Regex::new(pattern)?;
    Ok(regex.find(text).is_some_and(|found| found.start() == 0))
}

/// A check applied to every member of a list or set.
///
/// Member checks never short-circuit each other: a member with the wrong
/// type is still checked against the enumeration, regex and bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MemberCheck {
    Enum,
    Type,
    Regex,
    Min,
    Max,
}

fn member_checks(constraint: &PropertyConstraint) -> Vec<MemberCheck> {
    let mut checks = Vec::new();
    if active_enum(constraint).is_some() {
        checks.push(MemberCheck::Enum);
    }
    if constraint.member_kind().is_some() {
        checks.push(MemberCheck::Type);
    }
    if constraint.regex().is_some_and(|pattern| !pattern.is_empty())
        && constraint.member_kind() == Some(&TypeKind::Str)
    {
        checks.push(MemberCheck::Regex);
    }
    if constraint.member_min().is_some() {
        checks.push(MemberCheck::Min);
    }
    if constraint.member_max().is_some() {
        checks.push(MemberCheck::Max);
    }
    checks
}

impl MemberCheck {
    fn apply(self, constraint: &PropertyConstraint, member: &Value, errors: &mut Vec<String>) {
        let name = constraint.label();
        match self {
            MemberCheck::Enum => {
                if !enum_validation(constraint, member) {
                    errors.push(enum_message(constraint, member));
                }
            }
            MemberCheck::Type => {
                if let Some(member_kind) = constraint.member_kind() {
                    if !member_kind.matches(member) {
                        errors.push(format!(
                            "The value \"{member}\" for \"{name}\" is not of type \"{member_kind}\"."
                        ));
                    }
                }
            }
            MemberCheck::Regex => {
                let (Some(pattern), Value::Str(text)) = (constraint.regex(), member) else {
                    return;
                };
                match regex_match(pattern, text) {
                    Ok(true) => {}
                    Ok(false) => errors.push(format!(
                        "Value \"{text}\" for \"{name}\" does not meet regex: {pattern}"
                    )),
                    Err(_) => errors.push(invalid_regex_message(constraint, pattern)),
                }
            }
            MemberCheck::Min => {
                if let Some(bound) = constraint.member_min() {
                    member_bound(constraint, member, bound, Ordering::Less, "min", errors);
                }
            }
            MemberCheck::Max => {
                if let Some(bound) = constraint.member_max() {
                    member_bound(constraint, member, bound, Ordering::Greater, "max", errors);
                }
            }
        }
    }
}

fn member_bound(
    constraint: &PropertyConstraint,
    member: &Value,
    bound: &Value,
    forbidden: Ordering,
    side: &str,
    errors: &mut Vec<String>,
) {
    let Some(member_kind) = constraint.member_kind() else {
        return;
    };
    let name = constraint.label();

    if *member_kind == TypeKind::Str {
        if let Value::Str(_) = member {
            if crosses_bound(member_kind, member, bound, forbidden) {
                errors.push(format!(
                    "The value of \"{member}\" for \"{name}\" fails {side} length of {bound}."
                ));
            }
        }
    }

    if member_kind.is_comparable() && member.compare(bound) == Some(forbidden) {
        errors.push(format!(
            "The value of \"{member}\" for \"{name}\" fails {side} size of {bound}."
        ));
    }
}

/// Validate every schema property of a record, in schema order.
///
/// Nested record values are validated against their own schema and
/// reported as a single child message.
pub fn collect_record_errors(record: &Record, schema: &RecordSchema) -> Vec<String> {
    let errors: Vec<String> = schema
        .iter()
        .flat_map(|(name, constraint)| field_errors(name, constraint, record))
        .collect();
    debug!(
        event = "record_validated",
        properties = schema.len(),
        errors = errors.len()
    );
    errors
}

/// Raising form of [`collect_record_errors`].
pub fn validate_record(record: &Record, schema: &RecordSchema) -> Result<()> {
    raise_if_any(collect_record_errors(record, schema))
}

/// Validate a single named field of a record.
///
/// # Errors
///
/// `Error::IllegalArgument` when the name is empty or not in the schema.
pub fn collect_field_errors(
    property_name: &str,
    record: &Record,
    schema: &RecordSchema,
) -> Result<Vec<String>> {
    if property_name.is_empty() {
        return Err(Error::IllegalArgument(
            "\"property_name\" is not a valid string.".to_string(),
        ));
    }
    let constraint = schema.get(property_name).ok_or_else(|| {
        Error::IllegalArgument(format!("\"{property_name}\" is not a recognized property."))
    })?;
    Ok(field_errors(property_name, constraint, record))
}

/// Raising form of [`collect_field_errors`].
pub fn validate_field(property_name: &str, record: &Record, schema: &RecordSchema) -> Result<()> {
    raise_if_any(collect_field_errors(property_name, record, schema)?)
}

fn field_errors(name: &str, constraint: &PropertyConstraint, record: &Record) -> Vec<String> {
    let value = record.get(name).unwrap_or(&Value::Null);
    let mut errors = validate_value(constraint, value);

    if let (Some(TypeKind::Record(record_type)), Value::Record(child)) = (constraint.kind(), value) {
        let child_errors = collect_record_errors(child, record_type.schema());
        if !child_errors.is_empty() {
            errors.push(format!(
                "The child property {name}, has errors:: {}",
                child_errors.join(" || ")
            ));
        }
    }

    errors
}
