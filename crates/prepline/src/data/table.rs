//! In-memory tables.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{PreplineError, Result};

use super::column::Column;
use super::types::Role;
use super::value::Value;

/// An ordered set of equal-length, uniquely named columns.
///
/// Rows are identified by position only. The row count is kept explicitly so
/// that a table can have rows but no columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTable")]
pub struct Table {
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    /// Create a table, checking that columns have equal lengths and unique names.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let rows = columns.first().map_or(0, Column::len);
        Self::with_row_count(columns, rows)
    }

    /// Create a table with an explicit row count, which every column must match.
    pub fn with_row_count(columns: Vec<Column>, rows: usize) -> Result<Self> {
        if let Some(ragged) = columns.iter().find(|c| c.len() != rows) {
            return Err(PreplineError::InvalidTable(format!(
                "column '{}' has {} rows, expected {}",
                ragged.name,
                ragged.len(),
                rows
            )));
        }

        let mut names = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !names.insert(column.name.as_str()) {
                return Err(PreplineError::InvalidTable(format!(
                    "duplicate column name '{}'",
                    column.name
                )));
            }
        }

        Ok(Self {
            columns,
            row_count: rows,
        })
    }

    /// Wrap columns already known to have equal lengths and unique names.
    pub(crate) fn from_valid_columns(columns: Vec<Column>, row_count: usize) -> Self {
        Self { columns, row_count }
    }

    /// Create a table with no columns and no rows.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// All columns in order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Consume the table and return its columns.
    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }

    /// Get a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Get the position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Get all column names.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Infer the role of every column, positionally aligned with `columns()`.
    pub fn roles(&self) -> Vec<Role> {
        self.columns.iter().map(Column::role).collect()
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&Value> {
        self.columns.get(col).and_then(|c| c.get(row))
    }

    /// Get a row as borrowed values.
    pub fn row(&self, row: usize) -> Option<Vec<&Value>> {
        if row >= self.row_count() {
            return None;
        }
        Some(self.columns.iter().map(|c| &c.values[row]).collect())
    }

    /// Iterate over rows as borrowed values.
    pub fn rows(&self) -> impl Iterator<Item = Vec<&Value>> {
        (0..self.row_count()).map(move |i| self.columns.iter().map(|c| &c.values[i]).collect())
    }

    /// Build a new table from the given rows, in the given order.
    pub fn select_rows(&self, rows: &[usize]) -> Self {
        let columns = self
            .columns
            .iter()
            .map(|c| Column {
                name: c.name.clone(),
                dtype: c.dtype,
                values: rows.iter().map(|&r| c.values[r].clone()).collect(),
            })
            .collect();
        Self {
            columns,
            row_count: rows.len(),
        }
    }

    /// The first `n` rows.
    pub fn head(&self, n: usize) -> Self {
        let rows: Vec<usize> = (0..self.row_count().min(n)).collect();
        self.select_rows(&rows)
    }

    /// Append a column, checking its length and name.
    pub fn push_column(&mut self, column: Column) -> Result<()> {
        if column.len() != self.row_count() && !(self.columns.is_empty() && self.row_count == 0) {
            return Err(PreplineError::InvalidTable(format!(
                "column '{}' has {} rows, expected {}",
                column.name,
                column.len(),
                self.row_count()
            )));
        }
        if self.column_index(&column.name).is_some() {
            return Err(PreplineError::InvalidTable(format!(
                "duplicate column name '{}'",
                column.name
            )));
        }
        if self.columns.is_empty() {
            self.row_count = column.len();
        }
        self.columns.push(column);
        Ok(())
    }
}

#[derive(Deserialize)]
struct RawTable {
    #[serde(default)]
    columns: Vec<Column>,
    #[serde(default)]
    row_count: Option<usize>,
}

impl TryFrom<RawTable> for Table {
    type Error = PreplineError;

    fn try_from(raw: RawTable) -> Result<Self> {
        match raw.row_count {
            Some(rows) => Table::with_row_count(raw.columns, rows),
            None => Table::new(raw.columns),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ColumnType;

    fn sample() -> Table {
        Table::new(vec![
            Column::from_numbers("age", &[25.0, 30.0, 35.0]),
            Column::from_labels("city", &[Some("NY"), None, Some("LA")]),
        ])
        .unwrap()
    }

    #[test]
    fn test_shape() {
        let table = sample();
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.column_names(), vec!["age", "city"]);
        assert_eq!(table.roles(), vec![Role::Numeric, Role::Categorical]);
    }

    #[test]
    fn test_rejects_ragged_columns() {
        let err = Table::new(vec![
            Column::from_numbers("a", &[1.0, 2.0]),
            Column::from_numbers("b", &[1.0]),
        ])
        .unwrap_err();
        assert!(matches!(err, PreplineError::InvalidTable(_)));
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let err = Table::new(vec![
            Column::from_numbers("a", &[1.0]),
            Column::from_numbers("a", &[2.0]),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("duplicate column name 'a'"));
    }

    #[test]
    fn test_select_rows_and_head() {
        let table = sample();
        let picked = table.select_rows(&[2, 0]);
        assert_eq!(picked.get(0, 1), Some(&Value::text("LA")));
        assert_eq!(picked.get(1, 0), Some(&Value::Number(25.0)));

        let head = table.head(10);
        assert_eq!(head.row_count(), 3);
        assert_eq!(table.head(1).row_count(), 1);
    }

    #[test]
    fn test_columns_only_table() {
        let table = Table::new(vec![
            Column::with_dtype("a", ColumnType::Number, vec![]),
            Column::with_dtype("b", ColumnType::Text, vec![]),
        ])
        .unwrap();
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.column_count(), 2);
        assert!(table.row(0).is_none());
        assert_eq!(table.rows().count(), 0);
    }

    #[test]
    fn test_json_round_trip_validates() {
        let json = serde_json::to_string(&sample()).unwrap();
        let back: Table = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sample());

        let bad = r#"{"columns":[{"name":"a","values":[1]},{"name":"b","values":[]}]}"#;
        assert!(serde_json::from_str::<Table>(bad).is_err());
    }

    #[test]
    fn test_rows_without_columns() {
        let table = Table::with_row_count(Vec::new(), 4).unwrap();
        assert_eq!(table.row_count(), 4);
        assert_eq!(table.rows().count(), 4);
        assert!(Table::with_row_count(vec![Column::from_numbers("a", &[1.0])], 2).is_err());

        let json = r#"{"columns":[],"row_count":3}"#;
        let table: Table = serde_json::from_str(json).unwrap();
        assert_eq!(table.row_count(), 3);
    }

    #[test]
    fn test_push_column() {
        let mut table = sample();
        table
            .push_column(Column::from_numbers("score", &[1.0, 2.0, 3.0]))
            .unwrap();
        assert_eq!(table.column_count(), 3);
        assert!(table.push_column(Column::from_numbers("x", &[1.0])).is_err());
    }
}
