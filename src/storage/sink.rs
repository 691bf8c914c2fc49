//! Record sinks
//!
//! A sink receives flat records grouped by [`Table`]. Wire protocol and
//! batching are the sink's business; callers only insert and flush.

use super::errors::StorageResult;
use super::record::{Record, Table};

/// Destination for ingested records
pub trait RecordSink {
    /// Stores one record.
    fn insert(&mut self, record: Record) -> StorageResult<()>;

    /// Stores records in order, stopping at the first failure.
    ///
    /// Returns the number of records stored.
    fn insert_all(&mut self, records: Vec<Record>) -> StorageResult<usize> {
        let count = records.len();
        for record in records {
            self.insert(record)?;
        }
        Ok(count)
    }

    /// Makes previously inserted records durable.
    fn flush(&mut self) -> StorageResult<()> {
        Ok(())
    }
}

/// In-memory sink, used for inspection and tests
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Vec<Record>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All records in insertion order
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Records of one table in insertion order
    pub fn table(&self, table: Table) -> Vec<&Record> {
        self.records.iter().filter(|r| r.table() == table).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordSink for MemorySink {
    fn insert(&mut self, record: Record) -> StorageResult<()> {
        self.records.push(record);
        Ok(())
    }
}
