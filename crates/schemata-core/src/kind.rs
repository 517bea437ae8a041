use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::record_type::RecordType;
use crate::value::Value;

/// Closed set of value types a constraint can require.
///
/// `Record` points at a named record type so nested records carry their own
/// schema without any global lookup.
#[derive(Debug, Clone)]
pub enum TypeKind {
    Bool,
    Int,
    Float,
    Str,
    List,
    Set,
    Dict,
    Date,
    Time,
    DateTime,
    Complex,
    Tuple,
    Record(Arc<RecordType>),
}

/// Every builtin kind, in alias order.
pub const BUILTIN_KINDS: [TypeKind; 12] = [
    TypeKind::Bool,
    TypeKind::Complex,
    TypeKind::Date,
    TypeKind::DateTime,
    TypeKind::Dict,
    TypeKind::Float,
    TypeKind::Int,
    TypeKind::List,
    TypeKind::Set,
    TypeKind::Str,
    TypeKind::Time,
    TypeKind::Tuple,
];

/// Alias that declares "no type".
pub const NONE_ALIAS: &str = "None";

impl TypeKind {
    /// Parse a type alias. `"None"` declares an untyped property.
    pub fn parse(alias: &str) -> Result<Option<TypeKind>> {
        let kind = match alias {
            NONE_ALIAS => return Ok(None),
            "bool" => TypeKind::Bool,
            "int" => TypeKind::Int,
            "float" => TypeKind::Float,
            "str" => TypeKind::Str,
            "list" => TypeKind::List,
            "set" => TypeKind::Set,
            "dict" => TypeKind::Dict,
            "date" => TypeKind::Date,
            "time" => TypeKind::Time,
            "datetime" => TypeKind::DateTime,
            "complex" => TypeKind::Complex,
            "tuple" => TypeKind::Tuple,
            other => {
                return Err(Error::IllegalType(format!(
                    "Illegal type declaration: {other}"
                )));
            }
        };
        Ok(Some(kind))
    }

    /// Canonical alias, or the record type name for record kinds.
    pub fn alias(&self) -> &str {
        match self {
            TypeKind::Bool => "bool",
            TypeKind::Int => "int",
            TypeKind::Float => "float",
            TypeKind::Str => "str",
            TypeKind::List => "list",
            TypeKind::Set => "set",
            TypeKind::Dict => "dict",
            TypeKind::Date => "date",
            TypeKind::Time => "time",
            TypeKind::DateTime => "datetime",
            TypeKind::Complex => "complex",
            TypeKind::Tuple => "tuple",
            TypeKind::Record(record_type) => record_type.name(),
        }
    }

    /// Kinds whose values are validated as collections.
    pub fn is_collection(&self) -> bool {
        matches!(
            self,
            TypeKind::Dict | TypeKind::List | TypeKind::Set | TypeKind::Tuple
        )
    }

    /// Kinds whose min/max bound the value length.
    pub fn is_boundable(&self) -> bool {
        matches!(
            self,
            TypeKind::Str | TypeKind::List | TypeKind::Dict | TypeKind::Set
        )
    }

    /// Kinds whose min/max bound the value ordering.
    pub fn is_comparable(&self) -> bool {
        matches!(
            self,
            TypeKind::Int
                | TypeKind::Float
                | TypeKind::Date
                | TypeKind::Time
                | TypeKind::DateTime
                | TypeKind::Complex
                | TypeKind::Tuple
        )
    }

    pub fn is_record(&self) -> bool {
        matches!(self, TypeKind::Record(_))
    }

    /// The nested record type for record kinds.
    pub fn record_type(&self) -> Option<&Arc<RecordType>> {
        match self {
            TypeKind::Record(record_type) => Some(record_type),
            _ => None,
        }
    }

    /// Whether `value` is an instance of this kind.
    pub fn matches(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (TypeKind::Bool, Value::Bool(_))
                | (TypeKind::Int, Value::Int(_))
                | (TypeKind::Float, Value::Float(_))
                | (TypeKind::Str, Value::Str(_))
                | (TypeKind::List, Value::List(_))
                | (TypeKind::Set, Value::Set(_))
                | (TypeKind::Dict, Value::Dict(_))
                | (TypeKind::Date, Value::Date(_))
                | (TypeKind::Time, Value::Time(_))
                | (TypeKind::DateTime, Value::DateTime(_))
                | (TypeKind::Complex, Value::Complex(_))
                | (TypeKind::Tuple, Value::Tuple(_))
                | (TypeKind::Record(_), Value::Record(_))
        )
    }

    fn rank(&self) -> u8 {
        match self {
            TypeKind::Bool => 0,
            TypeKind::Complex => 1,
            TypeKind::Date => 2,
            TypeKind::DateTime => 3,
            TypeKind::Dict => 4,
            TypeKind::Float => 5,
            TypeKind::Int => 6,
            TypeKind::List => 7,
            TypeKind::Set => 8,
            TypeKind::Str => 9,
            TypeKind::Time => 10,
            TypeKind::Tuple => 11,
            TypeKind::Record(_) => 12,
        }
    }
}

impl PartialEq for TypeKind {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for TypeKind {}

impl PartialOrd for TypeKind {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TypeKind {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (TypeKind::Record(left), TypeKind::Record(right)) => left.name().cmp(right.name()),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl Hash for TypeKind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        if let TypeKind::Record(record_type) = self {
            record_type.name().hash(state);
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.alias())
    }
}
