//! Fitted per-column transforms.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::data::{Column, ColumnType, Table, Value};
use crate::error::{DegenerateColumn, PreplineError, Result};
use crate::stats::Moments;

use super::report::{TransformReport, UnknownCategory};

/// Scaling parameters for one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericFeature {
    /// Source column name (also the output name).
    pub column: String,
    /// Mean and population standard deviation at fit time; `None` if the
    /// column had no observed values.
    pub moments: Option<Moments>,
}

impl NumericFeature {
    /// Standardize one value. Missing stays missing.
    fn scale(&self, value: &Value) -> Value {
        match (value.as_number(), &self.moments) {
            (Some(x), Some(moments)) => Value::Number(moments.z_score(x)),
            _ => Value::Missing,
        }
    }
}

/// Observed categories for one categorical column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalFeature {
    /// Source column name.
    pub column: String,
    /// Distinct categories, sorted.
    pub categories: Vec<String>,
}

impl CategoricalFeature {
    /// Output column names, `<column>_<category>`, in category order.
    pub fn output_names(&self) -> impl Iterator<Item = String> + '_ {
        self.categories
            .iter()
            .map(move |category| format!("{}_{}", self.column, category))
    }
}

/// State learned by `FeatureTransformer::fit`, applied with `apply`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedTransform {
    /// Numeric columns in scan order.
    pub numeric: Vec<NumericFeature>,
    /// Categorical columns in scan order.
    pub categorical: Vec<CategoricalFeature>,
    /// Columns neither scaled nor encoded.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excluded: Vec<String>,
    /// Columns that fell back to a deterministic output at fit time.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub degenerate: Vec<DegenerateColumn>,
    /// Policy for categories unseen at fit time.
    #[serde(default)]
    pub handle_unknown: UnknownCategory,
}

impl FittedTransform {
    /// Names of the output columns, in output order.
    pub fn output_names(&self) -> Vec<String> {
        self.numeric
            .iter()
            .map(|f| f.column.clone())
            .chain(self.categorical.iter().flat_map(|f| f.output_names()))
            .collect()
    }

    /// Apply the fitted transform to a table with the same column layout.
    ///
    /// Row order and count are preserved. Columns not seen at fit time are
    /// ignored.
    pub fn apply(&self, table: &Table) -> Result<Table> {
        let rows = table.row_count();
        let mut columns = Vec::with_capacity(self.numeric.len());

        for feature in &self.numeric {
            let column = lookup(table, &feature.column, ColumnType::Number)?;
            let values = column.values.iter().map(|v| feature.scale(v)).collect();
            columns.push(Column::with_dtype(
                feature.column.clone(),
                ColumnType::Number,
                values,
            ));
        }

        for feature in &self.categorical {
            let column = lookup(table, &feature.column, ColumnType::Text)?;
            columns.extend(self.one_hot(feature, column, rows)?);
        }

        Table::with_row_count(columns, rows)
    }

    /// Apply and summarize what was produced.
    pub fn apply_with_report(&self, table: &Table) -> Result<(Table, TransformReport)> {
        let output = self.apply(table)?;
        let report = TransformReport {
            numeric_columns: self.numeric.iter().map(|f| f.column.clone()).collect(),
            categorical_columns: self.categorical.iter().map(|f| f.column.clone()).collect(),
            excluded_columns: self.excluded.clone(),
            one_hot_columns: self.categorical.iter().map(|f| f.categories.len()).sum(),
            degenerate: self.degenerate.clone(),
            rows: output.row_count(),
        };
        Ok((output, report))
    }

    /// Build the indicator columns for one categorical column.
    fn one_hot(
        &self,
        feature: &CategoricalFeature,
        column: &Column,
        rows: usize,
    ) -> Result<Vec<Column>> {
        let index: HashMap<&str, usize> = feature
            .categories
            .iter()
            .enumerate()
            .map(|(i, c)| (c.as_str(), i))
            .collect();

        let mut indicators = vec![vec![Value::Number(0.0); rows]; feature.categories.len()];
        for (row, value) in column.values.iter().enumerate() {
            let Some(label) = value.as_text() else {
                continue;
            };
            match index.get(label) {
                Some(&i) => indicators[i][row] = Value::Number(1.0),
                None if self.handle_unknown == UnknownCategory::Error => {
                    return Err(PreplineError::transform(
                        &feature.column,
                        format!("unknown category '{}' at row {}", label, row),
                    ));
                }
                None => {}
            }
        }

        Ok(feature
            .output_names()
            .zip(indicators)
            .map(|(name, values)| Column::with_dtype(name, ColumnType::Number, values))
            .collect())
    }
}

/// Find a fitted column in `table` and check that its values still match.
fn lookup<'a>(table: &'a Table, name: &str, dtype: ColumnType) -> Result<&'a Column> {
    let column = table
        .column(name)
        .ok_or_else(|| PreplineError::transform(name, "column seen at fit time is missing"))?;

    if column.dtype != dtype {
        return Err(PreplineError::transform(
            name,
            format!("expected a {} column, found {}", dtype, column.dtype),
        ));
    }
    check_values(column)?;
    Ok(column)
}

/// Fail if any value does not match the column's type.
pub(crate) fn check_values(column: &Column) -> Result<()> {
    match column.first_mismatch() {
        Some((row, value)) => Err(PreplineError::transform(
            &column.name,
            format!(
                "unsupported {} value '{}' at row {} in {} column",
                value.type_name(),
                value,
                row,
                column.dtype
            ),
        )),
        None => Ok(()),
    }
}
