//! Transform command - scale and one-hot encode a data file.

use std::path::{Path, PathBuf};

use colored::Colorize;
use prepline::{OutputFormat, write_file};

use super::{default_output, load_pipeline};

pub fn run(
    file: PathBuf,
    output: Option<PathBuf>,
    format: OutputFormat,
    config: Option<&Path>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let pipeline = load_pipeline(config)?;

    println!(
        "{} {}",
        "Transforming".cyan().bold(),
        file.display().to_string().white()
    );

    let (table, _source) = pipeline.ingest(&file)?;
    let (processed, report) = pipeline.transform(&table)?;

    println!(
        "  Scaled: {}",
        if report.numeric_columns.is_empty() {
            "none".dimmed().to_string()
        } else {
            report.numeric_columns.join(", ")
        }
    );
    println!(
        "  Encoded: {}",
        if report.categorical_columns.is_empty() {
            "none".dimmed().to_string()
        } else {
            report.categorical_columns.join(", ")
        }
    );
    if !report.excluded_columns.is_empty() {
        println!("  Dropped: {}", report.excluded_columns.join(", ").dimmed());
    }
    for notice in &report.degenerate {
        println!("  {} {}", "Warning:".yellow(), notice);
    }

    if verbose {
        println!();
        super::print_table(&processed, 5);
    }

    let output_path =
        output.unwrap_or_else(|| default_output(&file, "transformed", format.extension()));
    write_file(&processed, &output_path, format)?;

    println!();
    println!(
        "{} {} ({} rows x {} columns)",
        "Saved to".green().bold(),
        output_path.display().to_string().white(),
        processed.row_count(),
        processed.column_count()
    );

    Ok(())
}
