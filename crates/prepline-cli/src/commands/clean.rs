//! Clean command - fill missing values and drop duplicate rows.

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
        "Cleaning".cyan().bold(),
        file.display().to_string().white()
    );

    let (table, _source) = pipeline.ingest(&file)?;
    let (cleaned, report) = pipeline.clean(&table)?;

    if report.imputations.is_empty() {
        println!("  No missing values to fill");
    }
    for imputation in &report.imputations {
        println!("  {}", imputation.description());
    }
    for notice in &report.degenerate {
        println!("  {} {}", "Warning:".yellow(), notice);
    }
    println!(
        "  Removed {} duplicate rows",
        report.duplicates_removed().to_string().white().bold()
    );

    if verbose {
        println!();
        super::print_table(&cleaned, 5);
    }

    let output_path = output.unwrap_or_else(|| default_output(&file, "cleaned", format.extension()));
    write_file(&cleaned, &output_path, format)?;

    println!();
    println!(
        "{} {} ({} rows)",
        "Saved to".green().bold(),
        output_path.display().to_string().white(),
        cleaned.row_count()
    );

    Ok(())
}
