//! The schema that describes every [`PropertyConstraint`]'s own settings.
//!
//! Built from a fixed table instead of by constructing constraints, so the
//! meta-schema never has to validate itself while it is being created.

use std::sync::LazyLock;

use crate::constraint::{
    PropertyConstraint, DEFAULT, ENUM, MAX, MEMBER_MAX, MEMBER_MIN, MEMBER_TYPE, MIN, NAME,
    REGEX, REQUIRED, SETTING_NAMES, TYPE,
};
use crate::kind::{TypeKind, BUILTIN_KINDS};
use crate::record::Record;
use crate::schema::RecordSchema;
use crate::value::Value;

struct SettingRule {
    name: &'static str,
    kind: Option<TypeKind>,
    default: Value,
    required: bool,
    /// Restrict the setting to the builtin type tags.
    type_tags: bool,
    min: Option<i64>,
    /// Restrict the setting to comparable values.
    bound: bool,
}

const SETTING_RULES: [SettingRule; 11] = [
    SettingRule {
        name: NAME,
        kind: Some(TypeKind::Str),
        default: Value::Null,
        required: false,
        type_tags: false,
        min: Some(1),
        bound: false,
    },
    SettingRule {
        name: TYPE,
        kind: None,
        default: Value::Null,
        required: false,
        type_tags: true,
        min: None,
        bound: false,
    },
    SettingRule {
        name: DEFAULT,
        kind: None,
        default: Value::Null,
        required: false,
        type_tags: false,
        min: None,
        bound: false,
    },
    SettingRule {
        name: REQUIRED,
        kind: Some(TypeKind::Bool),
        default: Value::Bool(false),
        required: false,
        type_tags: false,
        min: None,
        bound: false,
    },
    SettingRule {
        name: ENUM,
        kind: Some(TypeKind::Set),
        default: Value::Null,
        required: false,
        type_tags: false,
        min: None,
        bound: false,
    },
    SettingRule {
        name: MIN,
        kind: None,
        default: Value::Null,
        required: false,
        type_tags: false,
        min: None,
        bound: true,
    },
    SettingRule {
        name: MAX,
        kind: None,
        default: Value::Null,
        required: false,
        type_tags: false,
        min: None,
        bound: true,
    },
    SettingRule {
        name: REGEX,
        kind: Some(TypeKind::Str),
        default: Value::Null,
        required: false,
        type_tags: false,
        min: Some(1),
        bound: false,
    },
    SettingRule {
        name: MEMBER_TYPE,
        kind: None,
        default: Value::Null,
        required: false,
        type_tags: true,
        min: None,
        bound: false,
    },
    SettingRule {
        name: MEMBER_MIN,
        kind: None,
        default: Value::Null,
        required: false,
        type_tags: false,
        min: None,
        bound: true,
    },
    SettingRule {
        name: MEMBER_MAX,
        kind: None,
        default: Value::Null,
        required: false,
        type_tags: false,
        min: None,
        bound: true,
    },
];

static META_SCHEMA: LazyLock<RecordSchema> = LazyLock::new(build_meta_schema);

/// The meta-schema shared by every property constraint.
pub fn meta_schema() -> &'static RecordSchema {
    &META_SCHEMA
}

/// Whether `setting` holds a min/max bound.
pub(crate) fn is_bound_setting(setting: &str) -> bool {
    SETTING_RULES
        .iter()
        .any(|rule| rule.bound && rule.name == setting)
}

fn build_meta_schema() -> RecordSchema {
    let properties = SETTING_RULES
        .into_iter()
        .map(|rule| (rule.name.to_string(), rule_constraint(rule)))
        .collect();
    RecordSchema::from_trusted(properties)
}

fn rule_constraint(rule: SettingRule) -> PropertyConstraint {
    let enum_values = if rule.type_tags {
        Value::set(BUILTIN_KINDS.into_iter().map(Value::Type))
    } else {
        Value::Null
    };

    let settings: Record = SETTING_NAMES
        .iter()
        .map(|setting| {
            let value = match *setting {
                NAME => Value::from(rule.name),
                TYPE => rule.kind.clone().map_or(Value::Null, Value::Type),
                DEFAULT => rule.default.clone(),
                REQUIRED => Value::Bool(rule.required),
                ENUM => enum_values.clone(),
                MIN => rule.min.map_or(Value::Null, Value::Int),
                _ => Value::Null,
            };
            (*setting, value)
        })
        .collect();

    PropertyConstraint::from_complete_settings(settings)
}
