//! Cleaning results.

use serde::{Deserialize, Serialize};

use crate::data::{Role, Value};
use crate::error::DegenerateColumn;

/// Configuration for the cleaner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanerConfig {
    /// Remove rows that duplicate an earlier row.
    pub drop_duplicates: bool,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            drop_duplicates: true,
        }
    }
}

/// A column whose missing values were filled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Imputation {
    /// Column name.
    pub column: String,
    /// Role that selected the statistic.
    pub role: Role,
    /// Statistic used: the median for numeric columns, the mode for categorical ones.
    pub fill_value: Value,
    /// Number of values filled.
    pub filled: usize,
}

impl Imputation {
    /// Name of the statistic used.
    pub fn statistic(&self) -> &'static str {
        match self.role {
            Role::Numeric => "median",
            Role::Categorical => "mode",
            Role::Excluded => "none",
        }
    }

    /// Get a human-readable description of the imputation.
    pub fn description(&self) -> String {
        format!(
            "Filled {} missing {} values in '{}' with {}: {}",
            self.filled,
            self.role,
            self.column,
            self.statistic(),
            self.fill_value
        )
    }
}

/// Result of cleaning a table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleaningReport {
    /// Columns whose missing values were filled.
    pub imputations: Vec<Imputation>,
    /// Columns left unrepaired because they have no values at all.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub degenerate: Vec<DegenerateColumn>,
    /// Row count before duplicate removal.
    pub rows_before: usize,
    /// Row count after duplicate removal.
    pub rows_after: usize,
}

impl CleaningReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of duplicate rows removed.
    pub fn duplicates_removed(&self) -> usize {
        self.rows_before - self.rows_after
    }

    /// Total number of values filled across all columns.
    pub fn values_filled(&self) -> usize {
        self.imputations.iter().map(|i| i.filled).sum()
    }
}
