//! Named, typed columns.

use serde::{Deserialize, Serialize};

use super::types::{ColumnType, Role};
use super::value::{RawValue, Value};

/// A named sequence of values sharing one column type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawColumn")]
pub struct Column {
    /// Column name, unique within a table.
    pub name: String,
    /// Storage type of the values.
    pub dtype: ColumnType,
    /// Cell values in row order.
    pub values: Vec<Value>,
}

impl Column {
    /// Create a column, inferring its type from the values.
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        let values = normalize(values);
        let dtype = infer_dtype(&values);
        Self {
            name: name.into(),
            dtype,
            values,
        }
    }

    /// Create a column with an explicit type. Values are not checked against it.
    pub fn with_dtype(name: impl Into<String>, dtype: ColumnType, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            dtype,
            values: normalize(values),
        }
    }

    /// Create a numeric column; NaN entries are missing.
    pub fn from_numbers(name: impl Into<String>, values: &[f64]) -> Self {
        Self::with_dtype(
            name,
            ColumnType::Number,
            values.iter().map(|&v| Value::number(v)).collect(),
        )
    }

    /// Create a text column; `None` entries are missing.
    pub fn from_labels(name: impl Into<String>, values: &[Option<&str>]) -> Self {
        Self::with_dtype(
            name,
            ColumnType::Text,
            values.iter().map(|v| Value::from(*v)).collect(),
        )
    }

    /// The transformation role of this column.
    pub fn role(&self) -> Role {
        self.dtype.role()
    }

    /// Number of values (rows).
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get the value at a row.
    pub fn get(&self, row: usize) -> Option<&Value> {
        self.values.get(row)
    }

    /// Number of missing values.
    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_missing()).count()
    }

    /// Returns true if at least one value is missing.
    pub fn has_missing(&self) -> bool {
        self.values.iter().any(Value::is_missing)
    }

    /// Returns true if every value is missing (including zero rows).
    pub fn is_all_missing(&self) -> bool {
        self.values.iter().all(Value::is_missing)
    }

    /// Iterate over the non-missing numbers of the column.
    pub fn numbers(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().filter_map(Value::as_number)
    }

    /// Iterate over the non-missing text labels of the column.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.values.iter().filter_map(Value::as_text)
    }

    /// First value whose variant does not match the column type, with its row.
    pub fn first_mismatch(&self) -> Option<(usize, &Value)> {
        self.values
            .iter()
            .enumerate()
            .find(|(_, v)| !v.fits(self.dtype))
    }
}

/// Replace NaN numbers with `Missing`.
fn normalize(mut values: Vec<Value>) -> Vec<Value> {
    for value in &mut values {
        if matches!(value, Value::Number(n) if n.is_nan()) {
            *value = Value::Missing;
        }
    }
    values
}

/// Infer a column type from its values.
///
/// A column with a single value type gets that type. A column with no
/// values gets `Number`. Mixed columns are `Text`.
pub(crate) fn infer_dtype(values: &[Value]) -> ColumnType {
    let mut seen: Option<ColumnType> = None;
    for dtype in values.iter().filter_map(Value::column_type) {
        match seen {
            None => seen = Some(dtype),
            Some(prev) if prev == dtype => {}
            Some(_) => return ColumnType::Text,
        }
    }
    seen.unwrap_or_default()
}

/// Serialized column form; `dtype` is optional and inferred when absent.
#[derive(Deserialize)]
struct RawColumn {
    name: String,
    #[serde(default)]
    dtype: Option<ColumnType>,
    #[serde(default)]
    values: Vec<Option<RawValue>>,
}

impl From<RawColumn> for Column {
    fn from(raw: RawColumn) -> Self {
        match raw.dtype {
            Some(dtype) => {
                let values = raw
                    .values
                    .into_iter()
                    .map(|v| v.map_or(Value::Missing, |v| v.into_value(dtype)))
                    .collect();
                Column::with_dtype(raw.name, dtype, values)
            }
            None => {
                let values = raw
                    .values
                    .into_iter()
                    .map(|v| v.map_or(Value::Missing, |v| v.into_value(ColumnType::Text)))
                    .collect();
                Column::new(raw.name, values)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_dtype() {
        let col = Column::new("n", vec![Value::Number(1.0), Value::Missing]);
        assert_eq!(col.dtype, ColumnType::Number);

        let col = Column::new("t", vec![Value::text("a"), Value::Missing]);
        assert_eq!(col.dtype, ColumnType::Text);

        let col = Column::new("b", vec![Value::Boolean(true)]);
        assert_eq!(col.role(), Role::Excluded);

        let col = Column::new("empty", vec![Value::Missing, Value::Missing]);
        assert_eq!(col.dtype, ColumnType::Number);

        let col = Column::new("mixed", vec![Value::Number(1.0), Value::text("a")]);
        assert_eq!(col.dtype, ColumnType::Text);
    }

    #[test]
    fn test_from_numbers_nan() {
        let col = Column::from_numbers("age", &[25.0, f64::NAN, 35.0]);
        assert_eq!(col.missing_count(), 1);
        assert!(col.has_missing());
        assert_eq!(col.numbers().collect::<Vec<_>>(), vec![25.0, 35.0]);
    }

    #[test]
    fn test_first_mismatch() {
        let col = Column::with_dtype(
            "age",
            ColumnType::Number,
            vec![Value::Number(1.0), Value::text("x")],
        );
        let (row, value) = col.first_mismatch().unwrap();
        assert_eq!(row, 1);
        assert_eq!(value.type_name(), "text");
    }

    #[test]
    fn test_deserialize_with_and_without_dtype() {
        let col: Column =
            serde_json::from_str(r#"{"name":"d","dtype":"date","values":["2024-01-02",null]}"#)
                .unwrap();
        assert_eq!(col.dtype, ColumnType::Date);
        assert!(matches!(col.values[0], Value::Date(_)));
        assert!(col.values[1].is_missing());

        let col: Column = serde_json::from_str(r#"{"name":"x","values":[1,2.5,null]}"#).unwrap();
        assert_eq!(col.dtype, ColumnType::Number);
        assert_eq!(col.missing_count(), 1);
    }
}
