//! CLI command implementations.

pub mod clean;
pub mod preview;
pub mod run;
pub mod serve;
pub mod transform;

use std::path::{Path, PathBuf};

use colored::Colorize;
use prepline::{Pipeline, PipelineConfig, Table};

/// Build the pipeline from an optional JSON config file.
pub fn load_pipeline(config: Option<&Path>) -> prepline::Result<Pipeline> {
    match config {
        Some(path) => Ok(Pipeline::with_config(PipelineConfig::load(path)?)),
        None => Ok(Pipeline::new()),
    }
}

/// Default output path next to the input: `<stem>_<suffix>.<ext>`.
pub fn default_output(file: &Path, suffix: &str, extension: &str) -> PathBuf {
    let stem = file.file_stem().unwrap_or_default().to_string_lossy();
    file.with_file_name(format!("{}_{}.{}", stem, suffix, extension))
}

/// Print the first `rows` rows of a table as an aligned grid.
pub fn print_table(table: &Table, rows: usize) {
    let shown = table.head(rows);
    let width = |i: usize| {
        shown
            .columns()
            .get(i)
            .map(|c| {
                c.values
                    .iter()
                    .map(|v| v.to_string().len())
                    .chain(std::iter::once(c.name.len()))
                    .max()
                    .unwrap_or(0)
                    .min(24)
            })
            .unwrap_or(0)
    };
    let widths: Vec<usize> = (0..shown.column_count()).map(width).collect();

    let header: Vec<String> = shown
        .column_names()
        .iter()
        .zip(&widths)
        .map(|(name, w)| format!("{:w$}", truncate(name, *w), w = w))
        .collect();
    println!("  {}", header.join("  ").bold());

    for row in shown.rows() {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(value, w)| {
                if value.is_missing() {
                    format!("{:w$}", "·", w = w).dimmed().to_string()
                } else {
                    format!("{:w$}", truncate(&value.to_string(), *w), w = w)
                }
            })
            .collect();
        println!("  {}", cells.join("  "));
    }

    if table.row_count() > rows {
        println!("  {}", format!("... {} more rows", table.row_count() - rows).dimmed());
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let kept: String = text.chars().take(width.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}
