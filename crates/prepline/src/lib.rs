//! Prepline: cleaning and feature preprocessing for tabular datasets.
//!
//! A run reads a delimited file or spreadsheet into a typed [`Table`],
//! repairs it with the [`Cleaner`] and encodes it for model training with
//! the [`FeatureTransformer`].
//!
//! # Core Principles
//!
//! - **Value semantics**: every stage reads its input and returns a new table
//! - **Fail fast**: a stage either succeeds completely or returns an error
//! - **Deterministic**: the same input always produces the same output
//!
//! # Example
//!
//! ```no_run
//! use prepline::Pipeline;
//!
//! let result = Pipeline::new().run("customers.csv").unwrap();
//!
//! println!("Rows after cleaning: {}", result.cleaned.row_count());
//! println!("Feature columns: {}", result.processed.column_count());
//! ```
//!
//! The stages can also be used on their own:
//!
//! ```
//! use prepline::{Cleaner, Column, FeatureTransformer, Table};
//!
//! let table = Table::new(vec![
//!     Column::from_numbers("age", &[25.0, f64::NAN, 35.0]),
//!     Column::from_labels("city", &[Some("NY"), Some("LA"), None]),
//! ])
//! .unwrap();
//!
//! let cleaned = Cleaner::new().clean(Some(&table)).unwrap();
//! let features = FeatureTransformer::new().transform(Some(&cleaned)).unwrap();
//!
//! assert_eq!(features.column_names(), vec!["age", "city_LA", "city_NY"]);
//! ```

pub mod cleaning;
pub mod data;
pub mod error;
pub mod features;
pub mod input;
pub mod output;
pub mod store;

mod pipeline;
mod stats;

pub use crate::pipeline::{Pipeline, PipelineConfig, PipelineResult, PipelineSummary};
pub use cleaning::{Cleaner, CleanerConfig, CleaningReport};
pub use data::{Column, ColumnType, Role, Table, Value};
pub use error::{DegenerateColumn, DegenerateKind, PreplineError, Result, Stage};
pub use features::{FeatureTransformer, FittedTransform, TransformReport, TransformerConfig};
pub use input::{Parser, ParserConfig, SourceMetadata};
pub use output::{OutputFormat, write_file};
pub use stats::Moments;
pub use store::{DirectoryStore, IfExists, TableStore};
