//! Example: clean and encode a tabular data file with prepline.
//!
//! Usage:
//!   cargo run --example pipeline -- <file_path> [output.csv]

use std::env;
use std::path::Path;

use prepline::{OutputFormat, Pipeline, write_file};

fn main() -> prepline::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --example pipeline -- <file_path> [output.csv]");
        std::process::exit(1);
    }

    let file_path = &args[1];
    let path = Path::new(file_path);

    let separator = "=".repeat(80);
    println!("{}", separator);
    println!("Prepline: {}", file_path);
    println!("{}", separator);
    println!();

    let result = Pipeline::new().run(path)?;

    if let Some(source) = &result.source {
        println!("## Source");
        println!("  File: {}", source.file);
        println!("  Format: {}", source.format);
        println!("  Rows: {}", source.row_count);
        println!("  Columns: {}", source.column_count);
        println!();
    }

    println!("## Columns");
    for column in result.original.columns() {
        println!(
            "  {:20} {:8} {:12} missing={}",
            column.name,
            column.dtype.to_string(),
            column.role().to_string(),
            column.missing_count()
        );
    }
    println!();

    println!("## Cleaning");
    for imputation in &result.cleaning.imputations {
        println!("  {}", imputation.description());
    }
    for notice in &result.cleaning.degenerate {
        println!("  warning: {}", notice);
    }
    println!(
        "  Duplicates removed: {}",
        result.cleaning.duplicates_removed()
    );
    println!();

    println!("## Features");
    println!("  Scaled: {}", result.transform.numeric_columns.join(", "));
    println!("  Encoded: {}", result.transform.categorical_columns.join(", "));
    println!(
        "  Output: {} rows x {} columns",
        result.processed.row_count(),
        result.processed.column_count()
    );

    if let Some(output) = args.get(2) {
        write_file(&result.processed, output, OutputFormat::Csv)?;
        println!();
        println!("Wrote {}", output);
    }

    Ok(())
}
