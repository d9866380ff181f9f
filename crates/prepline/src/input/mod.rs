//! Reading delimited text files and spreadsheets into tables.

mod cells;
mod parser;
mod source;
mod spreadsheet;

pub use cells::is_null_token;
pub use parser::{Parser, ParserConfig};
pub use source::SourceMetadata;
