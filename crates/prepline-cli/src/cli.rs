//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use prepline::{IfExists, OutputFormat};
use std::path::PathBuf;

/// Prepline: clean and encode tabular data for model training
#[derive(Parser)]
#[command(name = "prepline")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Pipeline configuration file (JSON)
    #[arg(long, global = true, value_name = "CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ingest, clean and transform a data file
    Run {
        /// Path to the data file (CSV, TSV or spreadsheet)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output path for the processed table (default: <file>_processed.<format>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "csv")]
        format: OutputFormat,

        /// Also write the cleaned table to this path
        #[arg(long, value_name = "PATH")]
        cleaned_output: Option<PathBuf>,

        /// Save the processed table into a table store directory
        #[arg(long, value_name = "DIR", requires = "table")]
        store: Option<PathBuf>,

        /// Table name to use in the store
        #[arg(long, value_name = "NAME", requires = "store")]
        table: Option<String>,

        /// What to do if the table already exists in the store
        #[arg(long, default_value = "replace")]
        if_exists: IfExists,
    },

    /// Fill missing values and remove duplicate rows
    Clean {
        /// Path to the data file (CSV, TSV or spreadsheet)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output path (default: <file>_cleaned.<format>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "csv")]
        format: OutputFormat,
    },

    /// Scale numeric columns and one-hot encode categorical columns
    Transform {
        /// Path to the data file (CSV, TSV or spreadsheet)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output path (default: <file>_transformed.<format>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "csv")]
        format: OutputFormat,
    },

    /// Show inferred column types and the first rows of a file
    Preview {
        /// Path to the data file (CSV, TSV or spreadsheet)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Number of rows to show
        #[arg(short = 'n', long, default_value = "10")]
        rows: usize,
    },

    /// Start the HTTP service
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8000")]
        port: u16,

        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },
}
