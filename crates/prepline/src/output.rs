//! Writing tables as delimited text or JSON.

use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::data::Table;
use crate::error::{PreplineError, Result};

/// File format for written tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Csv,
    Tsv,
    Json,
}

impl OutputFormat {
    /// Conventional file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Tsv => "tsv",
            OutputFormat::Json => "json",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "tsv" => Ok(OutputFormat::Tsv),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use csv, tsv, or json.", s)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Write a table as delimited text with a header row.
///
/// Missing values are written as empty fields.
pub fn write_delimited<W: Write>(table: &Table, writer: W, delimiter: u8) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    if table.column_count() > 0 {
        csv_writer.write_record(table.column_names())?;
        for row in table.rows() {
            csv_writer.write_record(row.iter().map(|v| v.to_string()))?;
        }
    }

    csv_writer
        .flush()
        .map_err(|e| PreplineError::Csv(e.into()))?;
    Ok(())
}

/// Write a table as JSON (`{"columns": [{"name", "dtype", "values"}], ...}`).
pub fn write_json<W: Write>(table: &Table, writer: W) -> Result<()> {
    serde_json::to_writer_pretty(writer, table)?;
    Ok(())
}

/// Write a table to `path` in the given format, creating parent directories.
pub fn write_file(table: &Table, path: impl AsRef<Path>, format: OutputFormat) -> Result<()> {
    let path = path.as_ref();
    let io_err = |source: std::io::Error| PreplineError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);

    match format {
        OutputFormat::Csv => write_delimited(table, &mut writer, b',')?,
        OutputFormat::Tsv => write_delimited(table, &mut writer, b'\t')?,
        OutputFormat::Json => write_json(table, &mut writer)?,
    }
    writer.flush().map_err(io_err)?;

    debug!(path = %path.display(), %format, rows = table.row_count(), "Wrote table");
    Ok(())
}

/// Render a table as delimited text in memory.
pub fn to_delimited_string(table: &Table, delimiter: u8) -> Result<String> {
    let mut buffer = Vec::new();
    write_delimited(table, &mut buffer, delimiter)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
