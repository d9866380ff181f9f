//! Feature transformer configuration and results.

use serde::{Deserialize, Serialize};

use crate::error::DegenerateColumn;

/// How to encode a category that was not observed at fit time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownCategory {
    /// Emit an all-zero row for the column's indicators.
    #[default]
    Ignore,
    /// Fail with a transform error.
    Error,
}

/// Configuration for the feature transformer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformerConfig {
    /// Policy for categories unseen at fit time.
    pub handle_unknown: UnknownCategory,
}

/// Result of transforming a table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformReport {
    /// Scaled columns, in output order.
    pub numeric_columns: Vec<String>,
    /// One-hot encoded source columns, in output order.
    pub categorical_columns: Vec<String>,
    /// Columns dropped because they are neither numeric nor categorical.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excluded_columns: Vec<String>,
    /// Number of indicator columns produced.
    pub one_hot_columns: usize,
    /// Columns that were scaled with a fallback.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub degenerate: Vec<DegenerateColumn>,
    /// Row count (unchanged by the transform).
    pub rows: usize,
}

impl TransformReport {
    /// Total number of output columns.
    pub fn output_columns(&self) -> usize {
        self.numeric_columns.len() + self.one_hot_columns
    }
}
