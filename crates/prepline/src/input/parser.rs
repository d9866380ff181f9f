//! File parser: delimited text with delimiter detection, and spreadsheets.

use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::data::Table;
use crate::error::{PreplineError, Result};

use super::cells::type_column;
use super::source::SourceMetadata;
use super::spreadsheet::read_first_sheet;

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Extensions read as delimited text.
const TEXT_EXTENSIONS: &[&str] = &["csv", "tsv", "txt", "psv", "dat"];

/// Extensions read as spreadsheets (first sheet only).
const SPREADSHEET_EXTENSIONS: &[&str] = &["xls", "xlsx", "xlsm", "xlsb", "ods"];

/// How a file's contents are read.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SourceKind {
    Delimited,
    /// Carries the lowercased extension, used as the format name.
    Spreadsheet(String),
}

/// Parser configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Whether the file has a header row.
    pub has_header: bool,
    /// Maximum rows to read (None = all).
    pub max_rows: Option<usize>,
    /// Quote character.
    pub quote: u8,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_header: true,
            max_rows: None,
            quote: b'"',
        }
    }
}

/// Parses delimited text and spreadsheets into typed tables.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a file and return the table and source metadata.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(Table, SourceMetadata)> {
        let path = path.as_ref();
        let kind = source_kind(path)?;

        let io_err = |source: io::Error| {
            if source.kind() == io::ErrorKind::NotFound {
                PreplineError::FileNotFound(path.to_path_buf())
            } else {
                PreplineError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        };

        let mut file = File::open(path).map_err(io_err)?;
        let size_bytes = file.metadata().map_err(io_err)?.len();

        let mut contents = Vec::new();
        file.read_to_end(&mut contents).map_err(io_err)?;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let (table, format) = match kind {
            SourceKind::Delimited => {
                let delimiter = self.delimiter_for(&contents)?;
                (self.parse_bytes(&contents, delimiter)?, format_name(delimiter))
            }
            SourceKind::Spreadsheet(ext) => (read_first_sheet(contents, &self.config)?, ext),
        };

        let metadata = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            size_bytes,
            format,
            table.row_count(),
            table.column_count(),
        );

        info!(
            file = %metadata.file,
            format = %metadata.format,
            rows = metadata.row_count,
            columns = metadata.column_count,
            "Ingested data"
        );
        Ok((table, metadata))
    }

    /// Parse in-memory delimited text.
    pub fn parse_str(&self, text: &str) -> Result<Table> {
        let bytes = text.as_bytes();
        let delimiter = self.delimiter_for(bytes)?;
        self.parse_bytes(bytes, delimiter)
    }

    /// Parse delimited text from any reader.
    pub fn parse_reader(&self, mut reader: impl Read) -> Result<Table> {
        let mut contents = Vec::new();
        reader
            .read_to_end(&mut contents)
            .map_err(|e| PreplineError::Io {
                path: "<reader>".into(),
                source: e,
            })?;
        let delimiter = self.delimiter_for(&contents)?;
        self.parse_bytes(&contents, delimiter)
    }

    fn delimiter_for(&self, bytes: &[u8]) -> Result<u8> {
        match self.config.delimiter {
            Some(d) => Ok(d),
            None => {
                let detected = detect_delimiter(bytes)?;
                debug!(delimiter = %(detected as char).escape_default(), "Detected delimiter");
                Ok(detected)
            }
        }
    }

    /// Parse bytes with a known delimiter.
    fn parse_bytes(&self, bytes: &[u8], delimiter: u8) -> Result<Table> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(self.config.has_header)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let header_record = if self.config.has_header {
            Some(reader.headers()?.clone())
        } else {
            None
        };

        let mut records = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            if let Some(max) = self.config.max_rows {
                if row_idx >= max {
                    break;
                }
            }
            records.push(result?);
        }

        let headers: Vec<String> = match header_record {
            Some(record) => record.iter().map(|s| s.trim().to_string()).collect(),
            None => match records.first() {
                Some(record) => (0..record.len()).map(|_| String::new()).collect(),
                None => return Err(PreplineError::EmptyData("No data rows found".to_string())),
            },
        };

        if headers.is_empty() {
            return Err(PreplineError::EmptyData("No columns found".to_string()));
        }

        assemble_table(headers, &records, |record, index| record.get(index))
    }
}

/// Type each column from raw cell text and build the table.
///
/// Short rows read as missing; extra cells are dropped.
pub(super) fn assemble_table<'a, R>(
    headers: Vec<String>,
    records: &'a [R],
    cell: impl Fn(&'a R, usize) -> Option<&'a str>,
) -> Result<Table> {
    let columns = unique_names(headers)
        .into_iter()
        .enumerate()
        .map(|(index, name)| {
            let cells = records
                .iter()
                .map(|record| cell(record, index).unwrap_or(""))
                .collect();
            type_column(name, cells)
        })
        .collect();

    Table::with_row_count(columns, records.len())
}

/// Route a path by extension; files without one are read as delimited text.
fn source_kind(path: &Path) -> Result<SourceKind> {
    let Some(ext) = path.extension() else {
        return Ok(SourceKind::Delimited);
    };
    let ext = ext.to_string_lossy().to_ascii_lowercase();

    if TEXT_EXTENSIONS.contains(&ext.as_str()) {
        Ok(SourceKind::Delimited)
    } else if SPREADSHEET_EXTENSIONS.contains(&ext.as_str()) {
        Ok(SourceKind::Spreadsheet(ext))
    } else {
        Err(PreplineError::UnsupportedFormat(format!(
            "'.{}' files are not supported; expected delimited text (CSV, TSV) or a spreadsheet (XLS, XLSX, ODS)",
            ext
        )))
    }
}

fn format_name(delimiter: u8) -> String {
    match delimiter {
        b'\t' => "tsv",
        b',' => "csv",
        b';' => "csv-semicolon",
        b'|' => "psv",
        _ => "delimited",
    }
    .to_string()
}

/// Fill blank header names with `column_<n>` and suffix repeats with `.1`, `.2`.
fn unique_names(headers: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    headers
        .into_iter()
        .enumerate()
        .map(|(i, name)| {
            let base = if name.is_empty() {
                format!("column_{}", i + 1)
            } else {
                name
            };
            let mut candidate = base.clone();
            let mut n = 1;
            while !seen.insert(candidate.clone()) {
                candidate = format!("{}.{}", base, n);
                n += 1;
            }
            candidate
        })
        .collect()
}

/// Detect the delimiter by analyzing the first few lines.
fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let reader = BufReader::new(bytes);
    let lines: Vec<String> = reader
        .lines()
        .take(10)
        .filter_map(|l| l.ok())
        .filter(|l| !l.trim().is_empty())
        .collect();

    if lines.is_empty() {
        return Err(PreplineError::EmptyData("No lines to analyze".to_string()));
    }

    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim))
            .collect();

        let first_count = counts[0];
        if first_count == 0 {
            continue;
        }

        let consistent = counts.iter().all(|&c| c == first_count);
        let variance: f64 = if counts.len() > 1 {
            let mean = counts.iter().sum::<usize>() as f64 / counts.len() as f64;
            counts.iter().map(|&c| (c as f64 - mean).powi(2)).sum::<f64>() / counts.len() as f64
        } else {
            0.0
        };

        // Higher count with lower variance wins; tab breaks ties.
        let score = if consistent {
            first_count * 1000 + (if delim == b'\t' { 100 } else { 0 })
        } else if variance < 1.0 {
            first_count * 100
        } else {
            first_count
        };

        if score > best_score {
            best_score = score;
            best_delimiter = delim;
        }
    }

    Ok(best_delimiter)
}

/// Count delimiter occurrences in a line, respecting quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delim_char = delimiter as char;
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delim_char && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}
