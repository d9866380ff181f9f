//! Named table storage.
//!
//! A [`TableStore`] saves and loads whole tables by name. [`DirectoryStore`]
//! keeps one JSON document per table under a root directory.

mod directory;

pub use directory::DirectoryStore;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::data::Table;
use crate::error::Result;

/// What to do when saving under a name that is already taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IfExists {
    /// Fail with `TableExists`.
    #[default]
    Fail,
    /// Overwrite the stored table.
    Replace,
    /// Add the rows to the stored table; columns must match.
    Append,
}

impl FromStr for IfExists {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fail" => Ok(IfExists::Fail),
            "replace" => Ok(IfExists::Replace),
            "append" => Ok(IfExists::Append),
            _ => Err(format!("Unknown mode: {}. Use fail, replace, or append.", s)),
        }
    }
}

impl fmt::Display for IfExists {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IfExists::Fail => write!(f, "fail"),
            IfExists::Replace => write!(f, "replace"),
            IfExists::Append => write!(f, "append"),
        }
    }
}

/// Storage for named tables.
pub trait TableStore {
    /// Save `table` under `name`.
    fn save(&self, name: &str, table: &Table, if_exists: IfExists) -> Result<()>;

    /// Load the table stored under `name`.
    fn load(&self, name: &str) -> Result<Table>;

    /// Returns true if a table is stored under `name`.
    fn exists(&self, name: &str) -> Result<bool>;
}
