//! Cleaning stage: missing-value repair and duplicate removal.

mod cleaner;
mod report;

pub use cleaner::{Cleaner, drop_duplicates};
pub use report::{CleanerConfig, CleaningReport, Imputation};
