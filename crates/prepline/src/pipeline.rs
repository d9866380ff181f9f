//! Pipeline driver: ingest, clean, transform.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cleaning::{Cleaner, CleanerConfig, CleaningReport};
use crate::data::Table;
use crate::error::{PreplineError, Result, Stage};
use crate::features::{FeatureTransformer, TransformReport, TransformerConfig};
use crate::input::{Parser, ParserConfig, SourceMetadata};

/// Configuration for a pipeline run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// How input files are read.
    pub parser: ParserConfig,
    /// Cleaning options.
    pub cleaner: CleanerConfig,
    /// Feature preprocessing options.
    pub transformer: TransformerConfig,
}

impl PipelineConfig {
    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            PreplineError::Config(format!("Failed to open config '{}': {}", path.display(), e))
        })?;
        serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            PreplineError::Config(format!("Failed to parse config '{}': {}", path.display(), e))
        })
    }
}

/// Everything produced by one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineResult {
    /// Metadata about the input file, if the run started from a file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceMetadata>,
    /// Table as ingested.
    pub original: Table,
    /// Table after cleaning.
    pub cleaned: Table,
    /// Table after feature preprocessing.
    pub processed: Table,
    /// What cleaning changed.
    pub cleaning: CleaningReport,
    /// What feature preprocessing produced.
    pub transform: TransformReport,
    /// Shape of the table at each stage.
    pub summary: PipelineSummary,
}

/// Row and column counts at each stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineSummary {
    pub input_rows: usize,
    pub input_columns: usize,
    pub cleaned_rows: usize,
    pub duplicates_removed: usize,
    pub values_filled: usize,
    pub output_rows: usize,
    pub output_columns: usize,
}

impl PipelineSummary {
    fn new(original: &Table, cleaning: &CleaningReport, processed: &Table) -> Self {
        Self {
            input_rows: original.row_count(),
            input_columns: original.column_count(),
            cleaned_rows: cleaning.rows_after,
            duplicates_removed: cleaning.duplicates_removed(),
            values_filled: cleaning.values_filled(),
            output_rows: processed.row_count(),
            output_columns: processed.column_count(),
        }
    }
}

/// Runs the stages in order, stopping at the first failure.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    parser: Parser,
    cleaner: Cleaner,
    transformer: FeatureTransformer,
}

impl Pipeline {
    /// Create a pipeline with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pipeline with custom configuration.
    pub fn with_config(config: PipelineConfig) -> Self {
        Self {
            parser: Parser::with_config(config.parser),
            cleaner: Cleaner::with_config(config.cleaner),
            transformer: FeatureTransformer::with_config(config.transformer),
        }
    }

    /// Ingest `path`, then clean and transform it.
    pub fn run(&self, path: impl AsRef<Path>) -> Result<PipelineResult> {
        let (table, source) = self
            .parser
            .parse_file(path)
            .map_err(|e| e.in_stage(Stage::Ingest))?;

        let mut result = self.run_table(table)?;
        result.source = Some(source);
        Ok(result)
    }

    /// Clean and transform an in-memory table.
    pub fn run_table(&self, table: Table) -> Result<PipelineResult> {
        let (cleaned, cleaning) = self
            .cleaner
            .clean_with_report(Some(&table))
            .map_err(|e| e.in_stage(Stage::Clean))?;

        let (processed, transform) = self
            .transformer
            .transform_with_report(Some(&cleaned))
            .map_err(|e| e.in_stage(Stage::Transform))?;

        let summary = PipelineSummary::new(&table, &cleaning, &processed);
        info!(
            input_rows = summary.input_rows,
            output_rows = summary.output_rows,
            output_columns = summary.output_columns,
            "Pipeline complete"
        );

        Ok(PipelineResult {
            source: None,
            original: table,
            cleaned,
            processed,
            cleaning,
            transform,
            summary,
        })
    }

    /// Clean an in-memory table only.
    pub fn clean(&self, table: &Table) -> Result<(Table, CleaningReport)> {
        self.cleaner
            .clean_with_report(Some(table))
            .map_err(|e| e.in_stage(Stage::Clean))
    }

    /// Transform an in-memory table only.
    pub fn transform(&self, table: &Table) -> Result<(Table, TransformReport)> {
        self.transformer
            .transform_with_report(Some(table))
            .map_err(|e| e.in_stage(Stage::Transform))
    }

    /// Read a file without running any stage.
    pub fn ingest(&self, path: impl AsRef<Path>) -> Result<(Table, SourceMetadata)> {
        self.parser
            .parse_file(path)
            .map_err(|e| e.in_stage(Stage::Ingest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Column, ColumnType, Value};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_run_table_scenario_a() {
        let table = Table::new(vec![
            Column::from_numbers("age", &[25.0, f64::NAN, 35.0, 25.0]),
            Column::from_labels("city", &[Some("NY"), Some("LA"), None, Some("NY")]),
        ])
        .unwrap();
        let result = Pipeline::new().run_table(table).unwrap();

        assert!(result.source.is_none());
        assert_eq!(result.summary.input_rows, 4);
        assert_eq!(result.summary.cleaned_rows, 3);
        assert_eq!(result.summary.duplicates_removed, 1);
        assert_eq!(result.summary.values_filled, 2);
        assert_eq!(
            result.processed.column_names(),
            vec!["age", "city_LA", "city_NY"]
        );
        assert_eq!(result.processed.row_count(), 3);
    }

    #[test]
    fn test_run_from_file() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "x,label").unwrap();
        writeln!(file, "10,a").unwrap();
        writeln!(file, "20,b").unwrap();
        writeln!(file, "30,a").unwrap();

        let result = Pipeline::new().run(file.path()).unwrap();
        let source = result.source.unwrap();
        assert_eq!(source.row_count, 3);
        assert!(source.hash.starts_with("sha256:"));
        assert_eq!(result.processed.column_names(), vec!["x", "label_a", "label_b"]);
    }

    #[test]
    fn test_ingest_failure_is_staged() {
        let err = Pipeline::new().run("/nonexistent/input.csv").unwrap_err();
        assert_eq!(err.stage(), Some(Stage::Ingest));
        assert_eq!(err.code(), "file_not_found");
    }

    #[test]
    fn test_transform_failure_is_staged() {
        let table = Table::new(vec![Column::with_dtype(
            "n",
            ColumnType::Number,
            vec![Value::Number(1.0), Value::text("x")],
        )])
        .unwrap();
        let err = Pipeline::new().run_table(table).unwrap_err();

        assert_eq!(err.stage(), Some(Stage::Transform));
        assert!(matches!(
            err,
            PreplineError::StageFailed { ref source, .. }
                if matches!(**source, PreplineError::Transform { .. })
        ));
    }

    #[test]
    fn test_config_load_partial() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"cleaner": {{"drop_duplicates": false}}, "transformer": {{"handle_unknown": "error"}}}}"#
        )
        .unwrap();

        let config = PipelineConfig::load(file.path()).unwrap();
        assert!(!config.cleaner.drop_duplicates);
        assert!(config.parser.has_header);
    }

    #[test]
    fn test_config_load_invalid() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = PipelineConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, PreplineError::Config(_)));
    }
}
