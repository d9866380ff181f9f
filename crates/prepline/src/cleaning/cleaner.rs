//! Missing-value repair and duplicate removal.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::data::{Column, Role, Table, Value, ValueKey};
use crate::error::{DegenerateColumn, DegenerateKind, PreplineError, Result, Stage};
use crate::stats;

use super::report::{CleanerConfig, CleaningReport, Imputation};

/// Repairs missing values and removes duplicate rows.
///
/// Numeric columns are filled with the median of their observed values,
/// categorical columns with the mode (ties go to the lexicographically
/// smallest label). A column with no observed values is left as-is and
/// reported as degenerate.
#[derive(Debug, Clone, Default)]
pub struct Cleaner {
    config: CleanerConfig,
}

impl Cleaner {
    /// Create a cleaner with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cleaner with custom configuration.
    pub fn with_config(config: CleanerConfig) -> Self {
        Self { config }
    }

    /// Clean a table, failing with `NoInput` if none is given.
    pub fn clean(&self, table: Option<&Table>) -> Result<Table> {
        self.clean_with_report(table).map(|(table, _)| table)
    }

    /// Clean a table and return what was changed.
    pub fn clean_with_report(&self, table: Option<&Table>) -> Result<(Table, CleaningReport)> {
        let table = table.ok_or(PreplineError::NoInput {
            stage: Stage::Clean,
        })?;
        Ok(self.clean_table(table))
    }

    /// Clean a table. The input is only read; a new table is returned.
    pub fn clean_table(&self, table: &Table) -> (Table, CleaningReport) {
        let mut report = CleaningReport::new();
        let roles = table.roles();

        let mut columns = Vec::with_capacity(table.column_count());
        for (column, role) in table.columns().iter().zip(roles) {
            columns.push(self.impute_column(column, role, &mut report));
        }

        // Imputation keeps names and lengths, so the table stays valid.
        let repaired = Table::from_valid_columns(columns, table.row_count());
        report.rows_before = repaired.row_count();

        let cleaned = if self.config.drop_duplicates {
            drop_duplicates(&repaired)
        } else {
            repaired
        };
        report.rows_after = cleaned.row_count();

        let removed = report.duplicates_removed();
        if removed > 0 {
            info!(removed, rows = report.rows_after, "Removed duplicate rows");
        } else {
            debug!("No duplicate rows found");
        }

        (cleaned, report)
    }

    /// Fill the missing values of one column.
    fn impute_column(&self, column: &Column, role: Role, report: &mut CleaningReport) -> Column {
        if !column.has_missing() {
            return column.clone();
        }

        let fill = match role {
            Role::Numeric => stats::median(column.numbers()).map(Value::Number),
            Role::Categorical => stats::mode(column.labels()).map(Value::text),
            Role::Excluded => {
                debug!(column = %column.name, dtype = %column.dtype, "Skipping imputation");
                return column.clone();
            }
        };

        let Some(fill) = fill else {
            warn!(column = %column.name, "Column has no observed values; left unrepaired");
            report
                .degenerate
                .push(DegenerateColumn::new(&column.name, DegenerateKind::AllMissing));
            return column.clone();
        };

        let mut filled = 0;
        let values = column
            .values
            .iter()
            .map(|v| {
                if v.is_missing() {
                    filled += 1;
                    fill.clone()
                } else {
                    v.clone()
                }
            })
            .collect();

        let imputation = Imputation {
            column: column.name.clone(),
            role,
            fill_value: fill,
            filled,
        };
        info!(
            column = %imputation.column,
            statistic = imputation.statistic(),
            value = %imputation.fill_value,
            filled,
            "Filled missing values"
        );
        report.imputations.push(imputation);

        Column::with_dtype(column.name.clone(), column.dtype, values)
    }
}

/// Drop rows that equal an earlier row in every column, keeping first
/// occurrences in their original order.
pub fn drop_duplicates(table: &Table) -> Table {
    let mut seen: HashSet<Vec<ValueKey<'_>>> = HashSet::with_capacity(table.row_count());
    let keep: Vec<usize> = (0..table.row_count())
        .filter(|&row| {
            let key: Vec<ValueKey<'_>> = table
                .columns()
                .iter()
                .map(|c| c.values[row].key())
                .collect();
            seen.insert(key)
        })
        .collect();

    if keep.len() == table.row_count() {
        return table.clone();
    }
    table.select_rows(&keep)
}
