//! Run command - ingest, clean and transform a data file.

use std::path::{Path, PathBuf};

use colored::Colorize;
use prepline::{DirectoryStore, IfExists, OutputFormat, TableStore, write_file};

use super::{default_output, load_pipeline};

#[allow(clippy::too_many_arguments)]
pub fn run(
    file: PathBuf,
    output: Option<PathBuf>,
    format: OutputFormat,
    cleaned_output: Option<PathBuf>,
    store: Option<PathBuf>,
    table: Option<String>,
    if_exists: IfExists,
    config: Option<&Path>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let pipeline = load_pipeline(config)?;

    println!(
        "{} {}",
        "Processing".cyan().bold(),
        file.display().to_string().white()
    );

    let (original, _source) = pipeline.ingest(&file)?;

    println!();
    println!("{}", "Ingest".yellow().bold());
    println!(
        "  {} rows, {} columns",
        original.row_count().to_string().white().bold(),
        original.column_count().to_string().white().bold()
    );
    if verbose {
        for column in original.columns() {
            println!(
                "  {:20} {:8} {:12} missing={}",
                column.name,
                column.dtype.to_string(),
                column.role().to_string(),
                column.missing_count()
            );
        }
    }

    let (cleaned, cleaning) = pipeline.clean(&original)?;

    println!("{}", "Clean".yellow().bold());
    for imputation in &cleaning.imputations {
        println!("  {}", imputation.description());
    }
    for notice in &cleaning.degenerate {
        println!("  {} {}", "Warning:".yellow(), notice);
    }
    println!(
        "  Removed {} duplicate rows ({} remain)",
        cleaning.duplicates_removed().to_string().white().bold(),
        cleaned.row_count()
    );
    if verbose {
        super::print_table(&cleaned, 5);
    }

    // The cleaned table is kept even if the transform fails below.
    if let Some(path) = cleaned_output {
        write_file(&cleaned, &path, format)?;
        println!(
            "  {} {}",
            "Saved cleaned table to".green().bold(),
            path.display().to_string().white()
        );
    }

    let (processed, transform) = pipeline.transform(&cleaned)?;

    println!("{}", "Transform".yellow().bold());
    println!(
        "  Scaled {} numeric columns, encoded {} categorical columns into {} indicators",
        transform.numeric_columns.len(),
        transform.categorical_columns.len(),
        transform.one_hot_columns
    );
    if !transform.excluded_columns.is_empty() {
        println!("  Dropped: {}", transform.excluded_columns.join(", ").dimmed());
    }
    for notice in &transform.degenerate {
        println!("  {} {}", "Warning:".yellow(), notice);
    }

    let output_path = output.unwrap_or_else(|| default_output(&file, "processed", format.extension()));
    write_file(&processed, &output_path, format)?;
    println!();
    println!(
        "{} {} ({} rows x {} columns)",
        "Saved to".green().bold(),
        output_path.display().to_string().white(),
        processed.row_count(),
        processed.column_count()
    );

    if let (Some(dir), Some(name)) = (store, table) {
        let store = DirectoryStore::new(dir);
        store.save(&name, &processed, if_exists)?;
        println!(
            "{} '{}' in {}",
            "Stored table".green().bold(),
            name,
            store.root().display()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    type RunOutcome = (Result<(), Box<dyn std::error::Error>>, PathBuf, PathBuf);

    /// Run on `content` with both outputs requested inside `dir`.
    fn run_file(dir: &TempDir, content: &str) -> RunOutcome {
        let input = dir.path().join("input.csv");
        fs::write(&input, content).unwrap();
        let cleaned = dir.path().join("cleaned.csv");
        let processed = dir.path().join("processed.csv");

        let result = run(
            input,
            Some(processed.clone()),
            OutputFormat::Csv,
            Some(cleaned.clone()),
            None,
            None,
            IfExists::Replace,
            None,
            false,
        );
        (result, cleaned, processed)
    }

    #[test]
    fn test_run_writes_both_tables() {
        let dir = TempDir::new().unwrap();
        let (result, cleaned, processed) = run_file(&dir, "x,c\n1,a\n3,b\n1,a\n");

        assert!(result.is_ok());
        assert_eq!(fs::read_to_string(cleaned).unwrap(), "x,c\n1,a\n3,b\n");
        assert_eq!(
            fs::read_to_string(processed).unwrap(),
            "x,c_a,c_b\n-1,1,0\n1,0,1\n"
        );
    }

    #[test]
    fn test_cleaned_table_kept_when_transform_fails() {
        let dir = TempDir::new().unwrap();
        let (result, cleaned, processed) = run_file(&dir, "a_b,a\n1,b\n2,c\n");

        let err = result.unwrap_err();
        assert!(err.to_string().contains("transform stage failed"), "{}", err);
        assert_eq!(fs::read_to_string(cleaned).unwrap(), "a_b,a\n1,b\n2,c\n");
        assert!(!processed.exists());
    }
}
