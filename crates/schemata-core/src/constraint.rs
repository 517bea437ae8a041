use std::collections::BTreeSet;

use regex::Regex;

use crate::error::{raise_if_any, Error, Result};
use crate::kind::TypeKind;
use crate::meta::{is_bound_setting, meta_schema};
use crate::record::Record;
use crate::validation;
use crate::value::Value;

pub const NAME: &str = "name";
pub const TYPE: &str = "type";
pub const DEFAULT: &str = "default";
pub const REQUIRED: &str = "required";
pub const ENUM: &str = "enum";
pub const MIN: &str = "min";
pub const MAX: &str = "max";
pub const REGEX: &str = "regex";
pub const MEMBER_TYPE: &str = "member_type";
pub const MEMBER_MIN: &str = "member_min";
pub const MEMBER_MAX: &str = "member_max";

/// Every recognized setting, in canonical order.
pub const SETTING_NAMES: [&str; 11] = [
    NAME,
    TYPE,
    DEFAULT,
    REQUIRED,
    ENUM,
    MIN,
    MAX,
    REGEX,
    MEMBER_TYPE,
    MEMBER_MIN,
    MEMBER_MAX,
];

/// Validation rules for a single named property.
///
/// Settings are held as dynamic values so the constraint can be checked
/// against the meta-schema like any other record. Construction always
/// perfects and self-validates; after `set` the caller is expected to call
/// [`PropertyConstraint::perfect`] and [`PropertyConstraint::validate`] again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyConstraint {
    settings: Record,
}

impl PropertyConstraint {
    /// An untyped, optional constraint with every setting defaulted.
    pub fn new() -> Result<Self> {
        Self::from_record(Record::new())
    }

    /// Build from raw settings, perfecting and validating them.
    ///
    /// # Errors
    ///
    /// `Error::IllegalType` for unrecognized `type`/`member_type` aliases,
    /// `Error::Validation` when a setting breaks the meta-schema.
    pub fn from_record(settings: Record) -> Result<Self> {
        let mut constraint = Self { settings };
        constraint.perfect()?;
        constraint.validate()?;
        Ok(constraint)
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self::from_record(pairs.into_iter().collect())
    }

    /// Wrap settings that are already complete. Used for the meta-schema
    /// table, which cannot validate itself while it is being built.
    pub(crate) fn from_complete_settings(settings: Record) -> Self {
        Self { settings }
    }

    /// Normalize the settings in place.
    ///
    /// Unknown settings are dropped, type aliases are resolved to type tags
    /// and unset settings receive the meta-schema default.
    pub fn perfect(&mut self) -> Result<()> {
        let meta = meta_schema();
        self.settings.retain(|key, _| meta.contains(key));

        self.perfect_type_setting(TYPE)?;
        self.perfect_type_setting(MEMBER_TYPE)?;

        let mut settings = Record::new();
        for (setting, rule) in meta.iter() {
            let value = match self.settings.remove(setting) {
                Some(value) if !value.is_null() => value,
                _ => rule.default_value().cloned().unwrap_or_default(),
            };
            settings.set(setting, value);
        }
        self.settings = settings;
        Ok(())
    }

    fn perfect_type_setting(&mut self, setting: &str) -> Result<()> {
        let resolved = match self.settings.get(setting) {
            Some(Value::Str(alias)) => TypeKind::parse(alias)
                .map_err(|_| Error::IllegalType(format!("Illegal {setting} declaration: {alias}")))?
                .map_or(Value::Null, Value::Type),
            _ => return Ok(()),
        };
        self.settings.set(setting, resolved);
        Ok(())
    }

    /// Check every setting against the meta-schema and return all failures.
    ///
    /// Settings holding a record type are skipped; nested schemas are not
    /// self-validated here. Bounds must be comparable values.
    pub fn collect_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();
        for (setting, rule) in meta_schema().iter() {
            let value = self.settings.get(setting).unwrap_or(&Value::Null);
            if matches!(value, Value::Type(TypeKind::Record(_))) {
                continue;
            }
            errors.extend(validation::validate_value(rule, value));
            if is_bound_setting(setting) && !value.is_null() && !value.is_comparable() {
                errors.push(format!(
                    "The value for \"{setting}\" is not of type \"comparable\": {value}"
                ));
            }
        }

        if let Some(pattern) = self.regex() {
            if !pattern.is_empty() && Regex::new(pattern).is_err() {
                errors.push(format!(
                    "The regex \"{pattern}\" for \"{}\" is not a valid pattern.",
                    self.label()
                ));
            }
        }

        errors
    }

    /// Raising form of [`PropertyConstraint::collect_errors`].
    pub fn validate(&self) -> Result<()> {
        raise_if_any(self.collect_errors())
    }

    /// Validate a single value against this constraint.
    pub fn validate_value(&self, value: &Value) -> Vec<String> {
        validation::validate_value(self, value)
    }

    /// Raising form of [`PropertyConstraint::validate_value`].
    pub fn check_value(&self, value: &Value) -> Result<()> {
        raise_if_any(self.validate_value(value))
    }

    pub fn settings(&self) -> &Record {
        &self.settings
    }

    pub fn get(&self, setting: &str) -> Option<&Value> {
        self.settings.get(setting)
    }

    pub fn set(&mut self, setting: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.settings.set(setting, value)
    }

    pub(crate) fn set_name(&mut self, name: &str) {
        self.settings.set(NAME, name);
    }

    pub fn name(&self) -> Option<&str> {
        self.settings.get(NAME).and_then(Value::as_str)
    }

    /// Name used in error messages.
    pub fn label(&self) -> &str {
        self.name().unwrap_or("unnamed")
    }

    pub fn kind(&self) -> Option<&TypeKind> {
        self.settings.get(TYPE).and_then(Value::as_kind)
    }

    pub fn member_kind(&self) -> Option<&TypeKind> {
        self.settings.get(MEMBER_TYPE).and_then(Value::as_kind)
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.present(DEFAULT)
    }

    pub fn required(&self) -> bool {
        self.settings
            .get(REQUIRED)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn enum_values(&self) -> Option<&BTreeSet<Value>> {
        self.settings.get(ENUM).and_then(Value::as_set)
    }

    pub fn min(&self) -> Option<&Value> {
        self.present(MIN)
    }

    pub fn max(&self) -> Option<&Value> {
        self.present(MAX)
    }

    pub fn regex(&self) -> Option<&str> {
        self.settings.get(REGEX).and_then(Value::as_str)
    }

    pub fn member_min(&self) -> Option<&Value> {
        self.present(MEMBER_MIN)
    }

    pub fn member_max(&self) -> Option<&Value> {
        self.present(MEMBER_MAX)
    }

    fn present(&self, setting: &str) -> Option<&Value> {
        self.settings.get(setting).filter(|value| !value.is_null())
    }
}
