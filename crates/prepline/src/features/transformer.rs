//! Column-routed scaling and one-hot encoding.

use std::collections::{BTreeSet, HashSet};

use tracing::{debug, info, warn};

use crate::data::{Role, Table};
use crate::error::{DegenerateColumn, DegenerateKind, PreplineError, Result, Stage};
use crate::stats::StreamingStats;

use super::fitted::{CategoricalFeature, FittedTransform, NumericFeature, check_values};
use super::report::{TransformReport, TransformerConfig};

/// Scales numeric columns and one-hot encodes categorical columns.
///
/// Numeric columns are standardized with their mean and population standard
/// deviation; a zero-variance column becomes all zeros. Each categorical
/// column becomes one `<column>_<category>` indicator per sorted category.
/// Other columns are dropped. The output holds the scaled columns first, then
/// the indicators grouped by source column.
#[derive(Debug, Clone, Default)]
pub struct FeatureTransformer {
    config: TransformerConfig,
}

impl FeatureTransformer {
    /// Create a transformer with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transformer with custom configuration.
    pub fn with_config(config: TransformerConfig) -> Self {
        Self { config }
    }

    /// Fit and apply in one call, failing with `NoInput` if no table is given.
    pub fn transform(&self, table: Option<&Table>) -> Result<Table> {
        self.transform_with_report(table).map(|(table, _)| table)
    }

    /// Fit and apply in one call and summarize the output.
    pub fn transform_with_report(&self, table: Option<&Table>) -> Result<(Table, TransformReport)> {
        let table = table.ok_or(PreplineError::NoInput {
            stage: Stage::Transform,
        })?;
        self.transform_table(table)
    }

    /// Fit on `table` and transform it.
    pub fn transform_table(&self, table: &Table) -> Result<(Table, TransformReport)> {
        let fitted = self.fit(table)?;
        let (output, report) = fitted.apply_with_report(table)?;

        info!(
            numeric = report.numeric_columns.len(),
            categorical = report.categorical_columns.len(),
            one_hot = report.one_hot_columns,
            rows = report.rows,
            "Feature preprocessing complete"
        );
        Ok((output, report))
    }

    /// Learn scaling parameters and category sets from `table`.
    pub fn fit(&self, table: &Table) -> Result<FittedTransform> {
        let mut fitted = FittedTransform {
            numeric: Vec::new(),
            categorical: Vec::new(),
            excluded: Vec::new(),
            degenerate: Vec::new(),
            handle_unknown: self.config.handle_unknown,
        };

        for (column, role) in table.columns().iter().zip(table.roles()) {
            match role {
                Role::Numeric => {
                    check_values(column)?;
                    let moments = column.numbers().collect::<StreamingStats>().moments();

                    match moments {
                        None if !column.is_empty() => {
                            warn!(column = %column.name, "Column has no observed values; output left missing");
                            fitted.degenerate.push(DegenerateColumn::new(
                                &column.name,
                                DegenerateKind::AllMissing,
                            ));
                        }
                        Some(m) if m.std == 0.0 => {
                            warn!(column = %column.name, "Column has zero variance; scaled to 0");
                            fitted.degenerate.push(DegenerateColumn::new(
                                &column.name,
                                DegenerateKind::ZeroVariance,
                            ));
                        }
                        _ => {}
                    }

                    fitted.numeric.push(NumericFeature {
                        column: column.name.clone(),
                        moments,
                    });
                }
                Role::Categorical => {
                    check_values(column)?;
                    let categories: BTreeSet<&str> = column.labels().collect();
                    fitted.categorical.push(CategoricalFeature {
                        column: column.name.clone(),
                        categories: categories.into_iter().map(String::from).collect(),
                    });
                }
                Role::Excluded => {
                    debug!(column = %column.name, dtype = %column.dtype, "Excluding column from features");
                    fitted.excluded.push(column.name.clone());
                }
            }
        }

        debug!(
            numeric = ?fitted.numeric.iter().map(|f| f.column.as_str()).collect::<Vec<_>>(),
            categorical = ?fitted.categorical.iter().map(|f| f.column.as_str()).collect::<Vec<_>>(),
            "Partitioned columns by role"
        );

        check_output_names(&fitted)?;
        Ok(fitted)
    }
}

/// Fail if two output columns would share a name.
fn check_output_names(fitted: &FittedTransform) -> Result<()> {
    let mut names: HashSet<String> = HashSet::new();
    for feature in &fitted.numeric {
        names.insert(feature.column.clone());
    }
    for feature in &fitted.categorical {
        for name in feature.output_names() {
            if !names.insert(name.clone()) {
                return Err(PreplineError::transform(
                    &feature.column,
                    format!("output column '{}' is produced twice", name),
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Column, ColumnType, Value};
    use crate::features::UnknownCategory;

    fn numbers(table: &Table, name: &str) -> Vec<f64> {
        table
            .column(name)
            .unwrap()
            .values
            .iter()
            .map(|v| v.as_number().unwrap())
            .collect()
    }

    #[test]
    fn test_no_input() {
        let err = FeatureTransformer::new().transform(None).unwrap_err();
        assert!(matches!(
            err,
            PreplineError::NoInput {
                stage: Stage::Transform
            }
        ));
    }

    #[test]
    fn test_standard_scaling() {
        let table = Table::new(vec![Column::from_numbers("x", &[10.0, 20.0, 30.0])]).unwrap();
        let output = FeatureTransformer::new().transform(Some(&table)).unwrap();

        let scaled = numbers(&output, "x");
        let expected = [-1.224744871391589, 0.0, 1.224744871391589];
        for (got, want) in scaled.iter().zip(expected) {
            assert!((got - want).abs() < 1e-9, "{} != {}", got, want);
        }
    }

    #[test]
    fn test_scaling_huge_values() {
        let table =
            Table::new(vec![Column::from_numbers("x", &[1e308, -1e308, 0.0])]).unwrap();
        let (output, report) = FeatureTransformer::new().transform_table(&table).unwrap();

        let scaled = numbers(&output, "x");
        let expected = [1.224744871391589, -1.224744871391589, 0.0];
        for (got, want) in scaled.iter().zip(expected) {
            assert!((got - want).abs() < 1e-9, "{} != {}", got, want);
        }
        assert!(report.degenerate.is_empty());
    }

    #[test]
    fn test_one_hot_sorted() {
        let table = Table::new(vec![Column::from_labels(
            "color",
            &[Some("red"), Some("blue"), Some("red")],
        )])
        .unwrap();
        let output = FeatureTransformer::new().transform(Some(&table)).unwrap();

        assert_eq!(output.column_names(), vec!["color_blue", "color_red"]);
        assert_eq!(numbers(&output, "color_blue"), vec![0.0, 1.0, 0.0]);
        assert_eq!(numbers(&output, "color_red"), vec![1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_output_order() {
        let table = Table::new(vec![
            Column::from_labels("city", &[Some("NY"), Some("LA")]),
            Column::from_numbers("age", &[20.0, 30.0]),
            Column::from_labels("tier", &[Some("b"), Some("a")]),
            Column::from_numbers("income", &[1.0, 3.0]),
        ])
        .unwrap();
        let (output, report) = FeatureTransformer::new().transform_table(&table).unwrap();

        assert_eq!(
            output.column_names(),
            vec!["age", "income", "city_LA", "city_NY", "tier_a", "tier_b"]
        );
        assert_eq!(report.output_columns(), 6);
        assert_eq!(report.rows, 2);
    }

    #[test]
    fn test_zero_variance_fallback() {
        let table = Table::new(vec![Column::from_numbers("c", &[4.0, 4.0, 4.0])]).unwrap();
        let (output, report) = FeatureTransformer::new().transform_table(&table).unwrap();

        assert_eq!(numbers(&output, "c"), vec![0.0, 0.0, 0.0]);
        assert_eq!(
            report.degenerate,
            vec![DegenerateColumn::new("c", DegenerateKind::ZeroVariance)]
        );
    }

    #[test]
    fn test_missing_values_pass_through() {
        let table = Table::new(vec![
            Column::from_numbers("x", &[1.0, f64::NAN, 3.0]),
            Column::from_labels("c", &[Some("a"), None, Some("b")]),
        ])
        .unwrap();
        let output = FeatureTransformer::new().transform(Some(&table)).unwrap();

        let x = &output.column("x").unwrap().values;
        assert_eq!(x[0], Value::Number(-1.0));
        assert!(x[1].is_missing());
        assert_eq!(x[2], Value::Number(1.0));
        assert_eq!(numbers(&output, "c_a"), vec![1.0, 0.0, 0.0]);
        assert_eq!(numbers(&output, "c_b"), vec![0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_excluded_columns_dropped() {
        let table = Table::new(vec![
            Column::from_numbers("x", &[1.0, 2.0]),
            Column::new("flag", vec![Value::Boolean(true), Value::Boolean(false)]),
        ])
        .unwrap();
        let (output, report) = FeatureTransformer::new().transform_table(&table).unwrap();

        assert_eq!(output.column_names(), vec!["x"]);
        assert_eq!(report.excluded_columns, vec!["flag".to_string()]);
    }

    #[test]
    fn test_only_excluded_columns_keeps_rows() {
        let table = Table::new(vec![Column::new(
            "flag",
            vec![Value::Boolean(true), Value::Boolean(false), Value::Boolean(true)],
        )])
        .unwrap();
        let output = FeatureTransformer::new().transform(Some(&table)).unwrap();

        assert_eq!(output.column_count(), 0);
        assert_eq!(output.row_count(), 3);
    }

    #[test]
    fn test_type_mismatch_is_transform_error() {
        let table = Table::new(vec![Column::with_dtype(
            "age",
            ColumnType::Number,
            vec![Value::Number(1.0), Value::text("old")],
        )])
        .unwrap();
        let err = FeatureTransformer::new().transform(Some(&table)).unwrap_err();

        match err {
            PreplineError::Transform { column, message } => {
                assert_eq!(column, "age");
                assert!(message.contains("row 1"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_mixed_categorical_is_transform_error() {
        let table = Table::new(vec![Column::new(
            "code",
            vec![Value::text("a"), Value::Number(2.0)],
        )])
        .unwrap();
        let err = FeatureTransformer::new().transform(Some(&table)).unwrap_err();
        assert_eq!(err.code(), "transform_error");
    }

    #[test]
    fn test_output_name_collision() {
        let table = Table::new(vec![
            Column::from_numbers("a_b", &[1.0, 2.0]),
            Column::from_labels("a", &[Some("b"), Some("c")]),
        ])
        .unwrap();
        let err = FeatureTransformer::new().transform(Some(&table)).unwrap_err();
        assert!(err.to_string().contains("'a_b'"));
    }

    #[test]
    fn test_unknown_category_ignored() {
        let train = Table::new(vec![Column::from_labels("c", &[Some("a"), Some("b")])]).unwrap();
        let test = Table::new(vec![Column::from_labels("c", &[Some("b"), Some("z")])]).unwrap();

        let fitted = FeatureTransformer::new().fit(&train).unwrap();
        let output = fitted.apply(&test).unwrap();

        assert_eq!(numbers(&output, "c_a"), vec![0.0, 0.0]);
        assert_eq!(numbers(&output, "c_b"), vec![1.0, 0.0]);
    }

    #[test]
    fn test_unknown_category_error_policy() {
        let train = Table::new(vec![Column::from_labels("c", &[Some("a")])]).unwrap();
        let test = Table::new(vec![Column::from_labels("c", &[Some("z")])]).unwrap();

        let transformer = FeatureTransformer::with_config(TransformerConfig {
            handle_unknown: UnknownCategory::Error,
        });
        let fitted = transformer.fit(&train).unwrap();
        assert!(fitted.apply(&test).is_err());
    }

    #[test]
    fn test_apply_missing_column() {
        let train = Table::new(vec![Column::from_numbers("x", &[1.0, 2.0])]).unwrap();
        let test = Table::new(vec![Column::from_numbers("y", &[1.0, 2.0])]).unwrap();

        let fitted = FeatureTransformer::new().fit(&train).unwrap();
        let err = fitted.apply(&test).unwrap_err();
        assert!(matches!(err, PreplineError::Transform { ref column, .. } if column == "x"));
    }

    #[test]
    fn test_zero_row_table() {
        let table = Table::new(vec![
            Column::with_dtype("a", ColumnType::Number, vec![]),
            Column::with_dtype("b", ColumnType::Text, vec![]),
        ])
        .unwrap();
        let (output, report) = FeatureTransformer::new().transform_table(&table).unwrap();

        assert_eq!(output.row_count(), 0);
        assert_eq!(output.column_names(), vec!["a"]);
        assert!(report.degenerate.is_empty());
    }

    #[test]
    fn test_fitted_output_names() {
        let table = Table::new(vec![
            Column::from_numbers("n", &[1.0, 2.0]),
            Column::from_labels("c", &[Some("y"), Some("x")]),
        ])
        .unwrap();
        let fitted = FeatureTransformer::new().fit(&table).unwrap();
        assert_eq!(fitted.output_names(), vec!["n", "c_x", "c_y"]);
    }
}
