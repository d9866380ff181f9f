//! JSON-file table store.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::data::{Column, Table};
use crate::error::{PreplineError, Result};

use super::{IfExists, TableStore};

/// Stores each table as `<root>/<name>.json`.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    /// Create a store rooted at `root`. The directory is created on first save.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file backing `name`.
    pub fn table_path(&self, name: &str) -> Result<PathBuf> {
        validate_name(name)?;
        Ok(self.root.join(format!("{}.json", name)))
    }

    /// Names of all stored tables, sorted.
    pub fn list(&self) -> Result<Vec<String>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }
        let entries = fs::read_dir(&self.root).map_err(|e| {
            PreplineError::Persistence(format!(
                "Failed to read directory '{}': {}",
                self.root.display(),
                e
            ))
        })?;

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .filter_map(|path| Some(path.file_stem()?.to_string_lossy().into_owned()))
            .filter(|name| validate_name(name).is_ok())
            .collect();
        names.sort();
        Ok(names)
    }

    fn write(&self, path: &Path, table: &Table) -> Result<()> {
        fs::create_dir_all(&self.root).map_err(|e| {
            PreplineError::Persistence(format!(
                "Failed to create directory '{}': {}",
                self.root.display(),
                e
            ))
        })?;

        let file = File::create(path).map_err(|e| {
            PreplineError::Persistence(format!(
                "Failed to create file '{}': {}",
                path.display(),
                e
            ))
        })?;

        write_table(file, table, path)
    }
}

/// Serialize a table as pretty JSON and flush the writer.
fn write_table<W: Write>(writer: W, table: &Table, path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(writer);
    serde_json::to_writer_pretty(&mut writer, table).map_err(|e| {
        PreplineError::Persistence(format!(
            "Failed to serialize table to '{}': {}",
            path.display(),
            e
        ))
    })?;
    writer.flush().map_err(|e| {
        PreplineError::Persistence(format!("Failed to write '{}': {}", path.display(), e))
    })
}

impl TableStore for DirectoryStore {
    fn save(&self, name: &str, table: &Table, if_exists: IfExists) -> Result<()> {
        let path = self.table_path(name)?;

        let to_write = match (path.exists(), if_exists) {
            (false, _) | (true, IfExists::Replace) => None,
            (true, IfExists::Fail) => return Err(PreplineError::TableExists(name.to_string())),
            (true, IfExists::Append) => Some(append(self.load(name)?, table)?),
        };

        let written = to_write.as_ref().unwrap_or(table);
        self.write(&path, written)?;

        info!(
            table = name,
            rows = written.row_count(),
            path = %path.display(),
            "Saved table"
        );
        Ok(())
    }

    fn load(&self, name: &str) -> Result<Table> {
        let path = self.table_path(name)?;
        if !path.exists() {
            return Err(PreplineError::TableNotFound(name.to_string()));
        }

        let file = File::open(&path).map_err(|e| {
            PreplineError::Persistence(format!(
                "Failed to open file '{}': {}",
                path.display(),
                e
            ))
        })?;

        serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            PreplineError::Persistence(format!(
                "Failed to parse table '{}': {}",
                path.display(),
                e
            ))
        })
    }

    fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.table_path(name)?.exists())
    }
}

/// Table names may only use ASCII letters, digits, `_` and `-`.
fn validate_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(PreplineError::Config(format!(
            "invalid table name '{}': use letters, digits, '_' or '-'",
            name
        )))
    }
}

/// Concatenate the rows of `extra` onto `stored`.
fn append(stored: Table, extra: &Table) -> Result<Table> {
    let same_layout = stored.column_count() == extra.column_count()
        && stored
            .columns()
            .iter()
            .zip(extra.columns())
            .all(|(a, b)| a.name == b.name && a.dtype == b.dtype);

    if !same_layout {
        return Err(PreplineError::InvalidTable(
            "cannot append: column names and types differ from the stored table".to_string(),
        ));
    }

    let rows = stored.row_count() + extra.row_count();
    let columns = stored
        .into_columns()
        .into_iter()
        .zip(extra.columns())
        .map(|(mut column, more)| {
            column.values.extend(more.values.iter().cloned());
            Column::with_dtype(column.name, column.dtype, column.values)
        })
        .collect();

    Table::with_row_count(columns, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{ColumnType, Value};
    use tempfile::TempDir;

    fn people() -> Table {
        Table::new(vec![
            Column::from_numbers("age", &[25.0, 35.0]),
            Column::from_labels("city", &[Some("NY"), None]),
        ])
        .unwrap()
    }

    /// Accepts writes but fails to flush, like a full disk.
    struct FailingFlush(Vec<u8>);

    impl Write for FailingFlush {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::Error::other("no space left on device"))
        }
    }

    #[test]
    fn test_flush_failure_is_reported() {
        let err = write_table(FailingFlush(Vec::new()), &people(), Path::new("t.json")).unwrap_err();
        match err {
            PreplineError::Persistence(message) => {
                assert!(message.contains("no space left"), "{}", message)
            }
            other => panic!("expected persistence error, got {:?}", other),
        }
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let store = DirectoryStore::new(dir.path().join("tables"));

        assert!(!store.exists("people").unwrap());
        store.save("people", &people(), IfExists::Fail).unwrap();
        assert!(store.exists("people").unwrap());

        let loaded = store.load("people").unwrap();
        assert_eq!(loaded, people());
        assert_eq!(loaded.get(1, 1), Some(&Value::Missing));
        assert_eq!(store.list().unwrap(), vec!["people".to_string()]);
    }

    #[test]
    fn test_fail_if_exists() {
        let dir = TempDir::new().unwrap();
        let store = DirectoryStore::new(dir.path());
        store.save("t", &people(), IfExists::Fail).unwrap();

        let err = store.save("t", &people(), IfExists::Fail).unwrap_err();
        assert!(matches!(err, PreplineError::TableExists(ref n) if n == "t"));
    }

    #[test]
    fn test_replace() {
        let dir = TempDir::new().unwrap();
        let store = DirectoryStore::new(dir.path());
        store.save("t", &people(), IfExists::Fail).unwrap();

        let smaller = people().head(1);
        store.save("t", &smaller, IfExists::Replace).unwrap();
        assert_eq!(store.load("t").unwrap().row_count(), 1);
    }

    #[test]
    fn test_append() {
        let dir = TempDir::new().unwrap();
        let store = DirectoryStore::new(dir.path());
        store.save("t", &people(), IfExists::Append).unwrap();
        store.save("t", &people(), IfExists::Append).unwrap();

        let loaded = store.load("t").unwrap();
        assert_eq!(loaded.row_count(), 4);
        assert_eq!(loaded.get(2, 0), Some(&Value::Number(25.0)));
    }

    #[test]
    fn test_append_layout_mismatch() {
        let dir = TempDir::new().unwrap();
        let store = DirectoryStore::new(dir.path());
        store.save("t", &people(), IfExists::Fail).unwrap();

        let other = Table::new(vec![
            Column::from_numbers("age", &[1.0]),
            Column::with_dtype("city", ColumnType::Number, vec![Value::Number(2.0)]),
        ])
        .unwrap();
        let err = store.save("t", &other, IfExists::Append).unwrap_err();
        assert!(matches!(err, PreplineError::InvalidTable(_)));
    }

    #[test]
    fn test_load_missing() {
        let dir = TempDir::new().unwrap();
        let store = DirectoryStore::new(dir.path());
        let err = store.load("nothing").unwrap_err();
        assert!(matches!(err, PreplineError::TableNotFound(_)));
    }

    #[test]
    fn test_invalid_names() {
        let store = DirectoryStore::new("/tmp/unused");
        for name in ["", "../escape", "a b", "x.json"] {
            assert!(matches!(
                store.exists(name),
                Err(PreplineError::Config(_))
            ));
        }
        assert!(store.table_path("train_2024-01").is_ok());
    }
}
