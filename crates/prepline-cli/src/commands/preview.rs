//! Preview command - show inferred column types and the first rows.

use std::path::{Path, PathBuf};

use colored::Colorize;
use prepline::Role;

use super::{load_pipeline, print_table};

pub fn run(
    file: PathBuf,
    rows: usize,
    config: Option<&Path>,
    _verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let pipeline = load_pipeline(config)?;
    let (table, source) = pipeline.ingest(&file)?;

    println!(
        "{} ({}, {} rows, {} columns)",
        source.file.white().bold(),
        source.format,
        source.row_count,
        source.column_count
    );
    println!();

    println!("{}", "Columns:".yellow().bold());
    for column in table.columns() {
        let role = match column.role() {
            Role::Numeric => "numeric".cyan(),
            Role::Categorical => "categorical".magenta(),
            Role::Excluded => "excluded".dimmed(),
        };
        let missing = column.missing_count();
        let missing = if missing > 0 {
            format!("{} missing", missing).yellow()
        } else {
            "complete".green()
        };
        println!(
            "  {:20} {:8} {:12} {}",
            column.name,
            column.dtype.to_string(),
            role,
            missing
        );
    }
    println!();

    print_table(&table, rows);
    Ok(())
}
