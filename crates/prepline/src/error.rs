//! Error types for the prepline library.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A stage of the preprocessing pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Reading a file into a table.
    Ingest,
    /// Missing-value repair and duplicate removal.
    Clean,
    /// Scaling and one-hot encoding.
    Transform,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Ingest => write!(f, "ingest"),
            Stage::Clean => write!(f, "clean"),
            Stage::Transform => write!(f, "transform"),
        }
    }
}

/// Main error type for prepline operations.
#[derive(Debug, Error)]
pub enum PreplineError {
    /// A stage was invoked without a table.
    #[error("No input table provided to the {stage} stage")]
    NoInput { stage: Stage },

    /// A fitting or encoding step could not be computed.
    #[error("Transform error in column '{column}': {message}")]
    Transform { column: String, message: String },

    /// Table structure is inconsistent (ragged columns, duplicate names).
    #[error("Invalid table: {0}")]
    InvalidTable(String),

    /// Input file does not exist.
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error from the spreadsheet reader.
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    /// File format not supported.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Empty file or no data to ingest.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error reading or writing the table store.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// A stored table already exists and the caller asked to fail.
    #[error("Table '{0}' already exists")]
    TableExists(String),

    /// A stored table does not exist.
    #[error("Table '{0}' not found")]
    TableNotFound(String),

    /// A pipeline stage failed; later stages were not run.
    #[error("{stage} stage failed: {source}")]
    StageFailed {
        stage: Stage,
        #[source]
        source: Box<PreplineError>,
    },
}

impl PreplineError {
    /// Build a transform error for a column.
    pub fn transform(column: impl Into<String>, message: impl Into<String>) -> Self {
        PreplineError::Transform {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Wrap this error with the pipeline stage it came from.
    pub fn in_stage(self, stage: Stage) -> Self {
        match self {
            already @ PreplineError::StageFailed { .. } => already,
            other => PreplineError::StageFailed {
                stage,
                source: Box::new(other),
            },
        }
    }

    /// The stage that failed, if this error was raised by the pipeline driver.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            PreplineError::StageFailed { stage, .. } => Some(*stage),
            PreplineError::NoInput { stage } => Some(*stage),
            _ => None,
        }
    }

    /// Short machine-checkable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            PreplineError::NoInput { .. } => "no_input",
            PreplineError::Transform { .. } => "transform_error",
            PreplineError::InvalidTable(_) => "invalid_table",
            PreplineError::FileNotFound(_) => "file_not_found",
            PreplineError::Io { .. } => "io_error",
            PreplineError::Csv(_) => "csv_error",
            PreplineError::Spreadsheet(_) => "spreadsheet_error",
            PreplineError::UnsupportedFormat(_) => "unsupported_format",
            PreplineError::EmptyData(_) => "empty_data",
            PreplineError::Config(_) => "config_error",
            PreplineError::Json(_) => "json_error",
            PreplineError::Persistence(_) => "persistence_error",
            PreplineError::TableExists(_) => "table_exists",
            PreplineError::TableNotFound(_) => "table_not_found",
            PreplineError::StageFailed { source, .. } => source.code(),
        }
    }
}

/// Why a column could not be repaired or scaled normally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegenerateKind {
    /// Every value is missing, so no median/mode/mean exists.
    AllMissing,
    /// All non-missing values are equal; scaled output is 0.
    ZeroVariance,
}

/// Informational notice about a column with a deterministic fallback.
///
/// Never raised as an error; carried in stage reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DegenerateColumn {
    pub column: String,
    pub kind: DegenerateKind,
}

impl DegenerateColumn {
    pub fn new(column: impl Into<String>, kind: DegenerateKind) -> Self {
        Self {
            column: column.into(),
            kind,
        }
    }
}

impl fmt::Display for DegenerateColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            DegenerateKind::AllMissing => write!(f, "column '{}' is entirely missing", self.column),
            DegenerateKind::ZeroVariance => {
                write!(f, "column '{}' has zero variance", self.column)
            }
        }
    }
}

/// Result type alias for prepline operations.
pub type Result<T> = std::result::Result<T, PreplineError>;
