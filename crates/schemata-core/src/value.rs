use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::kind::TypeKind;
use crate::record::Record;

/// Complex number with ordering on (real, imaginary).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    fn total_cmp(&self, other: &Self) -> Ordering {
        self.re
            .total_cmp(&other.re)
            .then_with(|| self.im.total_cmp(&other.im))
    }
}

impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.im.is_sign_negative() {
            write!(f, "{:?}-{:?}i", self.re, -self.im)
        } else {
            write!(f, "{:?}+{:?}i", self.re, self.im)
        }
    }
}

/// Dynamic value stored in records and constraint settings.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Set(BTreeSet<Value>),
    Dict(BTreeMap<String, Value>),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    Complex(Complex),
    Tuple(Vec<Value>),
    Record(Record),
    /// A type tag, as held by `type` and `member_type` settings.
    Type(TypeKind),
}

impl Value {
    /// Build a set value from any iterator of values.
    pub fn set<I, V>(members: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::Set(members.into_iter().map(Into::into).collect())
    }

    pub fn list<I, V>(members: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::List(members.into_iter().map(Into::into).collect())
    }

    pub fn tuple<I, V>(members: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::Tuple(members.into_iter().map(Into::into).collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Whether this value can serve as a min/max bound.
    pub fn is_comparable(&self) -> bool {
        matches!(
            self,
            Value::Int(_)
                | Value::Float(_)
                | Value::Date(_)
                | Value::Time(_)
                | Value::DateTime(_)
                | Value::Complex(_)
                | Value::Tuple(_)
        )
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&BTreeSet<Value>> {
        match self {
            Value::Set(members) => Some(members),
            _ => None,
        }
    }

    pub fn as_kind(&self) -> Option<&TypeKind> {
        match self {
            Value::Type(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_record_mut(&mut self) -> Option<&mut Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Members of list, set and tuple values, in iteration order.
    pub fn members(&self) -> Option<Vec<&Value>> {
        match self {
            Value::List(members) | Value::Tuple(members) => Some(members.iter().collect()),
            Value::Set(members) => Some(members.iter().collect()),
            _ => None,
        }
    }

    /// Element count used by length bounds.
    ///
    /// Strings count characters, not bytes.
    pub fn length(&self) -> Option<usize> {
        match self {
            Value::Str(value) => Some(value.chars().count()),
            Value::List(members) | Value::Tuple(members) => Some(members.len()),
            Value::Set(members) => Some(members.len()),
            Value::Dict(entries) => Some(entries.len()),
            Value::Record(record) => Some(record.len()),
            _ => None,
        }
    }

    /// Ordering used by min/max bounds.
    ///
    /// Integers and floats compare with each other; every other kind only
    /// compares with itself. `None` means the pair has no bound ordering.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(left), Value::Int(right)) => Some(left.cmp(right)),
            (Value::Int(left), Value::Float(right)) => (*left as f64).partial_cmp(right),
            (Value::Float(left), Value::Int(right)) => left.partial_cmp(&(*right as f64)),
            (Value::Float(left), Value::Float(right)) => left.partial_cmp(right),
            (Value::Bool(left), Value::Bool(right)) => Some(left.cmp(right)),
            (Value::Str(left), Value::Str(right)) => Some(left.cmp(right)),
            (Value::Date(left), Value::Date(right)) => Some(left.cmp(right)),
            (Value::Time(left), Value::Time(right)) => Some(left.cmp(right)),
            (Value::DateTime(left), Value::DateTime(right)) => Some(left.cmp(right)),
            (Value::Complex(left), Value::Complex(right)) => {
                match left.re.partial_cmp(&right.re)? {
                    Ordering::Equal => left.im.partial_cmp(&right.im),
                    ordering => Some(ordering),
                }
            }
            (Value::Tuple(left), Value::Tuple(right)) => {
                for (l, r) in left.iter().zip(right.iter()) {
                    match l.compare(r)? {
                        Ordering::Equal => continue,
                        ordering => return Some(ordering),
                    }
                }
                Some(left.len().cmp(&right.len()))
            }
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Int(_) => 2,
            Value::Float(_) => 3,
            Value::Str(_) => 4,
            Value::List(_) => 5,
            Value::Set(_) => 6,
            Value::Dict(_) => 7,
            Value::Date(_) => 8,
            Value::Time(_) => 9,
            Value::DateTime(_) => 10,
            Value::Complex(_) => 11,
            Value::Tuple(_) => 12,
            Value::Record(_) => 13,
            Value::Type(_) => 14,
        }
    }

    /// Rendering used inside collections: strings are quoted.
    fn fmt_nested(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(value) => write!(f, "{value:?}"),
            other => write!(f, "{other}"),
        }
    }
}

fn fmt_sequence<'a>(
    f: &mut fmt::Formatter<'_>,
    open: &str,
    close: &str,
    members: impl Iterator<Item = &'a Value>,
) -> fmt::Result {
    f.write_str(open)?;
    for (idx, member) in members.enumerate() {
        if idx > 0 {
            f.write_str(", ")?;
        }
        member.fmt_nested(f)?;
    }
    f.write_str(close)
}

fn fmt_entries<'a>(
    f: &mut fmt::Formatter<'_>,
    entries: impl Iterator<Item = (&'a String, &'a Value)>,
) -> fmt::Result {
    f.write_str("{")?;
    for (idx, (key, value)) in entries.enumerate() {
        if idx > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{key:?}: ")?;
        value.fmt_nested(f)?;
    }
    f.write_str("}")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(value) => write!(f, "{value}"),
            Value::Int(value) => write!(f, "{value}"),
            Value::Float(value) => write!(f, "{value:?}"),
            Value::Str(value) => f.write_str(value),
            Value::List(members) => fmt_sequence(f, "[", "]", members.iter()),
            Value::Set(members) => fmt_sequence(f, "{", "}", members.iter()),
            Value::Tuple(members) => fmt_sequence(f, "(", ")", members.iter()),
            Value::Dict(entries) => fmt_entries(f, entries.iter()),
            Value::Record(record) => fmt_entries(f, record.iter()),
            Value::Date(value) => write!(f, "{}", value.format("%Y-%m-%d")),
            Value::Time(value) => write!(f, "{value}"),
            Value::DateTime(value) => write!(f, "{value}"),
            Value::Complex(value) => write!(f, "{value}"),
            Value::Type(kind) => write!(f, "{kind}"),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Total structural order: first by variant, then by content.
impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Bool(left), Value::Bool(right)) => left.cmp(right),
            (Value::Int(left), Value::Int(right)) => left.cmp(right),
            (Value::Float(left), Value::Float(right)) => left.total_cmp(right),
            (Value::Str(left), Value::Str(right)) => left.cmp(right),
            (Value::List(left), Value::List(right)) => left.cmp(right),
            (Value::Set(left), Value::Set(right)) => left.cmp(right),
            (Value::Dict(left), Value::Dict(right)) => left.cmp(right),
            (Value::Date(left), Value::Date(right)) => left.cmp(right),
            (Value::Time(left), Value::Time(right)) => left.cmp(right),
            (Value::DateTime(left), Value::DateTime(right)) => left.cmp(right),
            (Value::Complex(left), Value::Complex(right)) => left.total_cmp(right),
            (Value::Tuple(left), Value::Tuple(right)) => left.cmp(right),
            (Value::Record(left), Value::Record(right)) => left.cmp(right),
            (Value::Type(left), Value::Type(right)) => left.cmp(right),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Date(value)
    }
}

impl From<NaiveTime> for Value {
    fn from(value: NaiveTime) -> Self {
        Value::Time(value)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Value::DateTime(value)
    }
}

impl From<Complex> for Value {
    fn from(value: Complex) -> Self {
        Value::Complex(value)
    }
}

impl From<Record> for Value {
    fn from(value: Record) -> Self {
        Value::Record(value)
    }
}

impl From<TypeKind> for Value {
    fn from(value: TypeKind) -> Self {
        Value::Type(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}
