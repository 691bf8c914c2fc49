//! Append-only JSON Lines sink
//!
//! Writes one `<table>.jsonl` file per record family under a destination
//! directory. Each record is one line; files are opened lazily in append
//! mode and fsynced on flush.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::errors::{StorageError, StorageResult};
use super::record::{Record, Table};
use super::sink::RecordSink;

/// File-backed sink
pub struct JsonlSink {
    /// Destination directory
    dest: PathBuf,
    /// Open handles, one per table written so far
    files: HashMap<Table, File>,
    /// Records written per table since open
    written: HashMap<Table, usize>,
}

impl JsonlSink {
    /// Opens a sink writing under `dest`, creating the directory if missing.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::CreateDir` if the directory cannot be created.
    pub fn open(dest: &Path) -> StorageResult<Self> {
        fs::create_dir_all(dest).map_err(|source| StorageError::CreateDir {
            path: dest.to_path_buf(),
            source,
        })?;

        Ok(Self {
            dest: dest.to_path_buf(),
            files: HashMap::new(),
            written: HashMap::new(),
        })
    }

    /// Path of the file holding `table`.
    pub fn path_for(&self, table: Table) -> PathBuf {
        table_path(&self.dest, table)
    }

    /// Number of records written to `table` by this sink.
    pub fn written(&self, table: Table) -> usize {
        self.written.get(&table).copied().unwrap_or(0)
    }

    fn file(&mut self, table: Table) -> StorageResult<&mut File> {
        let file = match self.files.entry(table) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let path = table_path(&self.dest, table);
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&path)
                    .map_err(|source| StorageError::Open {
                        table,
                        path,
                        source,
                    })?;
                entry.insert(file)
            }
        };
        Ok(file)
    }
}

impl RecordSink for JsonlSink {
    fn insert(&mut self, record: Record) -> StorageResult<()> {
        let table = record.table();
        let key = record.key();

        let mut line = serde_json::to_vec(record.fields()).map_err(|source| {
            StorageError::Encode {
                table,
                key: key.clone(),
                source,
            }
        })?;
        line.push(b'\n');

        self.file(table)?
            .write_all(&line)
            .map_err(|source| StorageError::Write { table, key, source })?;

        *self.written.entry(table).or_insert(0) += 1;
        Ok(())
    }

    fn flush(&mut self) -> StorageResult<()> {
        for (table, file) in self.files.iter_mut() {
            file.sync_all().map_err(|source| StorageError::Flush {
                table: *table,
                source,
            })?;
        }
        Ok(())
    }
}

fn table_path(dest: &Path, table: Table) -> PathBuf {
    dest.join(format!("{}.jsonl", table.name()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map, Value};
    use tempfile::TempDir;

    fn record(table: Table, key: &str) -> Record {
        let mut fields = Map::new();
        fields.insert(table.key_field().to_string(), json!(key));
        fields.insert("n".to_string(), json!(1));
        Record::new(table, fields)
    }

    fn read_lines(path: &Path) -> Vec<Value> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_sink_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("out").join("records");
        assert!(!dest.exists());

        let _sink = JsonlSink::open(&dest).unwrap();
        assert!(dest.exists());
    }

    #[test]
    fn test_uncreatable_destination() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let err = match JsonlSink::open(&blocker.join("records")) {
            Err(err) => err,
            Ok(_) => panic!("expected open to fail"),
        };
        assert_eq!(err.code(), "TAGPACK_SINK_CREATE_DIR_FAILED");
        assert_eq!(err.table(), None);
        assert!(err.to_string().contains("blocker"));
    }

    #[test]
    fn test_one_file_per_table() {
        let temp_dir = TempDir::new().unwrap();
        let mut sink = JsonlSink::open(temp_dir.path()).unwrap();

        sink.insert(record(Table::TagByAddress, "a")).unwrap();
        sink.insert(record(Table::TagByAddress, "b")).unwrap();
        sink.insert(record(Table::TaxonomyByKey, "entity")).unwrap();
        sink.flush().unwrap();

        assert_eq!(sink.written(Table::TagByAddress), 2);
        assert_eq!(sink.written(Table::TagByLabel), 0);

        let lines = read_lines(&sink.path_for(Table::TagByAddress));
        assert_eq!(lines, vec![json!({"address": "a", "n": 1}), json!({"address": "b", "n": 1})]);
        assert!(temp_dir.path().join("taxonomy_by_key.jsonl").exists());
        assert!(!temp_dir.path().join("tag_by_label.jsonl").exists());
    }

    #[test]
    fn test_reopen_appends() {
        let temp_dir = TempDir::new().unwrap();

        {
            let mut sink = JsonlSink::open(temp_dir.path()).unwrap();
            sink.insert(record(Table::TagpackByUri, "one")).unwrap();
            sink.flush().unwrap();
        }
        {
            let mut sink = JsonlSink::open(temp_dir.path()).unwrap();
            sink.insert(record(Table::TagpackByUri, "two")).unwrap();
            sink.flush().unwrap();
        }

        let lines = read_lines(&temp_dir.path().join("tagpack_by_uri.jsonl"));
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1]["uri"], json!("two"));
    }
}
