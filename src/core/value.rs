//! Structured field values
//!
//! Values are a tagged union. Arbitrary caller data is turned into a
//! [`Value`] by picking a constructor in a fixed priority order:
//!
//! 1. [`Value::error`] for errors, rendered as their message
//! 2. [`Value::from_log_value`] for types implementing [`LogValue`],
//!    resolved lazily at render time (groups and nested values)
//! 3. [`Value::display`] for anything with a `Display` impl
//! 4. [`Value::structural`] for anything `Serialize`, dumped field by field
//!
//! Every renderer consumes the same union, so the priority order applies
//! identically to text, JSON and logfmt output.

use super::level::Level;
use super::timestamp::Timestamp;
use super::value_ser::ValueSerializer;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, Offset, SecondsFormat, TimeZone};
use serde::ser::{Error as _, SerializeMap};
use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

/// Text used wherever a key was given without a value.
pub const MISSING_VALUE: &str = "missing value";

/// Upper bound on chained [`LogValue`] resolutions.
const MAX_RESOLVE_STEPS: usize = 100;

/// A type that knows how to describe itself as a log [`Value`].
///
/// The value is produced only when an event is actually rendered, so an
/// expensive `log_value` costs nothing on a disabled level.
pub trait LogValue: Send + Sync {
    fn log_value(&self) -> Value;
}

impl fmt::Debug for dyn LogValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LogValue")
    }
}

/// A named value inside a group.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub key: String,
    pub value: Value,
}

impl Field {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    Error(String),
    /// Placeholder for a trailing key that was given no value
    Missing,
    Time(Timestamp),
    Level(Level),
    Seq(Vec<Value>),
    /// Map entries, sorted by key
    Map(Vec<(String, Value)>),
    /// Struct fields, in declaration order
    Struct(Vec<(String, Value)>),
    /// Nested field list, rendered as a nested object where the format allows
    Group(Vec<Field>),
    Valuer(Arc<dyn LogValue>),
    /// A value whose structural dump failed
    Invalid(String),
}

impl Value {
    /// Capture an error as its message.
    pub fn error<E: std::error::Error + ?Sized>(err: &E) -> Self {
        Value::Error(err.to_string())
    }

    /// Defer to the type's own [`LogValue`] description.
    pub fn from_log_value<V: LogValue + 'static>(value: V) -> Self {
        Value::Valuer(Arc::new(value))
    }

    /// Capture a value through its `Display` impl.
    pub fn display<T: fmt::Display + ?Sized>(value: &T) -> Self {
        Value::Str(value.to_string())
    }

    /// Dump any `Serialize` type structurally: structs keep their field names,
    /// maps are sorted by key, sequences keep their order.
    ///
    /// ```
    /// use rust_structured_logger::Value;
    /// use serde::Serialize;
    ///
    /// #[derive(Serialize)]
    /// struct Point { x: i32, y: i32 }
    ///
    /// assert_eq!(Value::structural(&Point { x: 1, y: 2 }).to_string(), "{x:1 y:2}");
    /// ```
    pub fn structural<T: Serialize + ?Sized>(value: &T) -> Self {
        value
            .serialize(ValueSerializer)
            .unwrap_or_else(|err| Value::Invalid(err.to_string()))
    }

    /// Raw bytes; JSON output encodes them as base64.
    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Value::Bytes(bytes.into())
    }

    /// A nested group of fields.
    pub fn group<I>(fields: I) -> Self
    where
        I: IntoIterator<Item = Field>,
    {
        Value::Group(fields.into_iter().collect())
    }

    /// Follow [`Value::Valuer`] chains until a concrete value is reached.
    pub fn resolve(&self) -> Cow<'_, Value> {
        let Value::Valuer(valuer) = self else {
            return Cow::Borrowed(self);
        };

        let mut current = valuer.log_value();
        for _ in 0..MAX_RESOLVE_STEPS {
            match current {
                Value::Valuer(next) => current = next.log_value(),
                other => return Cow::Owned(other),
            }
        }
        Cow::Owned(Value::Error(format!(
            "log value not resolved after {} steps",
            MAX_RESOLVE_STEPS
        )))
    }

    /// Whether this value or anything nested in it is a [`Value::Valuer`].
    pub fn is_lazy(&self) -> bool {
        match self {
            Value::Valuer(_) => true,
            Value::Seq(items) => items.iter().any(Value::is_lazy),
            Value::Map(entries) | Value::Struct(entries) => entries.iter().any(|(_, v)| v.is_lazy()),
            Value::Group(fields) => fields.iter().any(|f| f.value.is_lazy()),
            _ => false,
        }
    }

    /// Resolve every [`Value::Valuer`], including those nested in sequences,
    /// maps, structs and groups, leaving a fully concrete value.
    pub fn into_resolved(self) -> Value {
        if self.is_lazy() {
            self.resolve_nested(0)
        } else {
            self
        }
    }

    fn resolve_nested(self, depth: usize) -> Value {
        if depth >= MAX_RESOLVE_STEPS {
            return Value::Error(format!(
                "log value not resolved after {} steps",
                MAX_RESOLVE_STEPS
            ));
        }
        let next = depth + 1;
        match self {
            Value::Valuer(_) => self.resolve().into_owned().resolve_nested(next),
            Value::Seq(items) => {
                Value::Seq(items.into_iter().map(|v| v.resolve_nested(next)).collect())
            }
            Value::Map(entries) => Value::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, v.resolve_nested(next)))
                    .collect(),
            ),
            Value::Struct(entries) => Value::Struct(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, v.resolve_nested(next)))
                    .collect(),
            ),
            Value::Group(fields) => Value::Group(
                fields
                    .into_iter()
                    .map(|f| Field {
                        key: f.key,
                        value: f.value.resolve_nested(next),
                    })
                    .collect(),
            ),
            other => other,
        }
    }

    /// Text form used when this value appears in key position.
    pub fn to_key_string(&self) -> String {
        match self.resolve().as_ref() {
            Value::Str(s) | Value::Error(s) => s.clone(),
            other => other.to_string(),
        }
    }

    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }
}

fn write_entries(
    f: &mut fmt::Formatter<'_>,
    open: &str,
    entries: &[(String, Value)],
    sep: char,
    close: &str,
) -> fmt::Result {
    f.write_str(open)?;
    for (i, (key, value)) in entries.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{}{}{}", key, sep, value)?;
    }
    f.write_str(close)
}

/// Structural text dump: `{field:value}` for structs, `[a b]` for sequences,
/// `map[k:v]` for maps and `[k=v]` for groups.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.resolve().as_ref() {
            Value::Null => f.write_str("<nil>"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Uint(u) => write!(f, "{}", u),
            Value::Float(fl) => write!(f, "{}", fl),
            Value::Str(s) | Value::Error(s) => f.write_str(s),
            Value::Bytes(bytes) => {
                f.write_str("[")?;
                for (i, b) in bytes.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", b)?;
                }
                f.write_str("]")
            }
            Value::Missing => f.write_str(MISSING_VALUE),
            Value::Time(t) => f.write_str(&t.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Value::Level(level) => write!(f, "{}", level),
            Value::Seq(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Value::Map(entries) => write_entries(f, "map[", entries, ':', "]"),
            Value::Struct(fields) => write_entries(f, "{", fields, ':', "}"),
            Value::Group(fields) => {
                f.write_str("[")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}={}", field.key, field.value)?;
                }
                f.write_str("]")
            }
            Value::Invalid(_) | Value::Valuer(_) => f.write_str("invalid value"),
        }
    }
}

/// JSON-facing encoding. Fails for non-finite floats and invalid values so the
/// caller can substitute a placeholder for just that field.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.resolve().as_ref() {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Uint(u) => serializer.serialize_u64(*u),
            Value::Float(f) if !f.is_finite() => Err(S::Error::custom(format!(
                "unsupported float value: {}",
                f
            ))),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Str(s) | Value::Error(s) => serializer.serialize_str(s),
            Value::Bytes(bytes) => serializer.serialize_str(&STANDARD.encode(bytes)),
            Value::Missing => serializer.serialize_str(MISSING_VALUE),
            Value::Time(t) => {
                serializer.serialize_str(&t.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            Value::Level(level) => level.serialize(serializer),
            Value::Seq(items) => serializer.collect_seq(items),
            Value::Map(entries) | Value::Struct(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Value::Group(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for field in fields {
                    map.serialize_entry(&field.key, &field.value)?;
                }
                map.end()
            }
            Value::Invalid(msg) => Err(S::Error::custom(msg)),
            Value::Valuer(_) => Err(S::Error::custom("unresolved log value")),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) | (Value::Missing, Value::Missing) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Uint(a), Value::Uint(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b))
            | (Value::Error(a), Value::Error(b))
            | (Value::Invalid(a), Value::Invalid(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Time(a), Value::Time(b)) => a == b,
            (Value::Level(a), Value::Level(b)) => a == b,
            (Value::Seq(a), Value::Seq(b)) => a == b,
            (Value::Map(a), Value::Map(b)) | (Value::Struct(a), Value::Struct(b)) => a == b,
            (Value::Group(a), Value::Group(b)) => a == b,
            (Value::Valuer(a), Value::Valuer(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

macro_rules! impl_from_int {
    ($variant:ident, $target:ty, $($t:ty),+) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::$variant(v as $target)
                }
            }
        )+
    };
}

impl_from_int!(Int, i64, i8, i16, i32, i64, isize);
impl_from_int!(Uint, u64, u8, u16, u32, u64, usize);

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        // Go through the shortest decimal form so 0.1f32 stays 0.1.
        Value::Float(f.to_string().parse().unwrap_or(f as f64))
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::Str(c.to_string())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::Str(s.clone())
    }
}

impl From<Cow<'_, str>> for Value {
    fn from(s: Cow<'_, str>) -> Self {
        Value::Str(s.into_owned())
    }
}

impl From<Level> for Value {
    fn from(level: Level) -> Self {
        Value::Level(level)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Value {
    fn from(t: DateTime<Tz>) -> Self {
        let offset = t.offset().fix();
        Value::Time(t.with_timezone(&offset))
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for Value {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        Value::Error(err.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Seq(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Clone + Into<Value>> From<&[T]> for Value {
    fn from(items: &[T]) -> Self {
        Value::Seq(items.iter().cloned().map(Into::into).collect())
    }
}

impl<K: ToString, V: Into<Value>, S> From<HashMap<K, V, S>> for Value {
    fn from(map: HashMap<K, V, S>) -> Self {
        let mut entries: Vec<(String, Value)> = map
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.into()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Value::Map(entries)
    }
}

impl<K: ToString, V: Into<Value>> From<BTreeMap<K, V>> for Value {
    fn from(map: BTreeMap<K, V>) -> Self {
        let mut entries: Vec<(String, Value)> = map
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.into()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Value::Map(entries)
    }
}

/// Build a nested group value.
///
/// ```
/// use rust_structured_logger::{group, Field};
///
/// let request = group([Field::new("method", "GET"), Field::new("status", 200)]);
/// assert_eq!(request.to_string(), "[method=GET status=200]");
/// ```
pub fn group<I>(fields: I) -> Value
where
    I: IntoIterator<Item = Field>,
{
    Value::group(fields)
}
