//! Cell values.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::types::ColumnType;

/// Date format used for serialization and output.
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single cell in a table.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// No value recorded.
    Missing,
    /// A finite number.
    Number(f64),
    /// A text label.
    Text(String),
    /// A boolean flag.
    Boolean(bool),
    /// A calendar date.
    Date(NaiveDate),
}

impl Value {
    /// Build a number value; NaN becomes `Missing`.
    pub fn number(value: f64) -> Self {
        if value.is_nan() {
            Value::Missing
        } else {
            Value::Number(value)
        }
    }

    /// Build a text value.
    pub fn text(value: impl Into<String>) -> Self {
        Value::Text(value.into())
    }

    /// Returns true if this cell holds no value.
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// The number held by this cell, if any.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The text held by this cell, if any.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// The column type this value belongs to, or `None` for a missing value.
    pub fn column_type(&self) -> Option<ColumnType> {
        match self {
            Value::Missing => None,
            Value::Number(_) => Some(ColumnType::Number),
            Value::Text(_) => Some(ColumnType::Text),
            Value::Boolean(_) => Some(ColumnType::Boolean),
            Value::Date(_) => Some(ColumnType::Date),
        }
    }

    /// Returns true if the value may appear in a column of `dtype`.
    pub fn fits(&self, dtype: ColumnType) -> bool {
        self.column_type().is_none_or(|t| t == dtype)
    }

    /// Name of the value's variant, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Missing => "missing",
            Value::Number(_) => "number",
            Value::Text(_) => "text",
            Value::Boolean(_) => "boolean",
            Value::Date(_) => "date",
        }
    }

    /// Hashable key with value-for-value equality: missing equals missing
    /// and `-0.0` equals `0.0`.
    pub(crate) fn key(&self) -> ValueKey<'_> {
        match self {
            Value::Missing => ValueKey::Missing,
            Value::Number(n) if n.is_nan() => ValueKey::Missing,
            Value::Number(n) => {
                let n = if *n == 0.0 { 0.0 } else { *n };
                ValueKey::Number(n.to_bits())
            }
            Value::Text(s) => ValueKey::Text(s.as_str()),
            Value::Boolean(b) => ValueKey::Boolean(*b),
            Value::Date(d) => ValueKey::Date(*d),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Missing
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::number(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Date(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Missing, Into::into)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Missing => Ok(()),
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{}", s),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Missing => serializer.serialize_none(),
            Value::Number(n) if n.is_finite() => serializer.serialize_f64(*n),
            Value::Number(_) => serializer.serialize_none(),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::Date(d) => serializer.collect_str(&d.format(DATE_FORMAT)),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<RawValue>::deserialize(deserializer)?;
        Ok(raw.map_or(Value::Missing, |v| v.into_value(ColumnType::Text)))
    }
}

/// Untyped cell as it appears in JSON, before the column type is known.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl RawValue {
    /// Convert to a value for a column of `dtype`. Text in a date column is
    /// parsed; any other mismatch is kept as-is and surfaces later.
    pub(crate) fn into_value(self, dtype: ColumnType) -> Value {
        match (self, dtype) {
            (RawValue::Text(s), ColumnType::Date) => {
                match NaiveDate::parse_from_str(&s, DATE_FORMAT) {
                    Ok(date) => Value::Date(date),
                    Err(_) => Value::Text(s),
                }
            }
            (RawValue::Bool(b), _) => Value::Boolean(b),
            (RawValue::Number(n), _) => Value::number(n),
            (RawValue::Text(s), _) => Value::Text(s),
        }
    }
}

/// Borrowed hashable form of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum ValueKey<'a> {
    Missing,
    Number(u64),
    Text(&'a str),
    Boolean(bool),
    Date(NaiveDate),
}
