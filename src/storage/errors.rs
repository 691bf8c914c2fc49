//! Sink error types
//!
//! Error codes:
//! - TAGPACK_SINK_CREATE_DIR_FAILED
//! - TAGPACK_SINK_OPEN_FAILED
//! - TAGPACK_SINK_ENCODE_FAILED
//! - TAGPACK_SINK_WRITE_FAILED
//! - TAGPACK_SINK_FLUSH_FAILED
//!
//! Every error past directory creation names the record family and, where
//! one is involved, the key of the record that could not be stored.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use super::record::Table;

/// Result type for sink operations
pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to create destination directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to open {table} at {}: {source}", path.display())]
    Open {
        table: Table,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to encode {table} record {key}: {source}")]
    Encode {
        table: Table,
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write {table} record {key}: {source}")]
    Write {
        table: Table,
        key: String,
        #[source]
        source: io::Error,
    },

    #[error("fsync failed for {table}: {source}")]
    Flush {
        table: Table,
        #[source]
        source: io::Error,
    },
}

impl StorageError {
    /// Stable error code for reporting
    pub fn code(&self) -> &'static str {
        match self {
            StorageError::CreateDir { .. } => "TAGPACK_SINK_CREATE_DIR_FAILED",
            StorageError::Open { .. } => "TAGPACK_SINK_OPEN_FAILED",
            StorageError::Encode { .. } => "TAGPACK_SINK_ENCODE_FAILED",
            StorageError::Write { .. } => "TAGPACK_SINK_WRITE_FAILED",
            StorageError::Flush { .. } => "TAGPACK_SINK_FLUSH_FAILED",
        }
    }

    /// The record family the failure belongs to, if any
    pub fn table(&self) -> Option<Table> {
        match self {
            StorageError::CreateDir { .. } => None,
            StorageError::Open { table, .. }
            | StorageError::Encode { table, .. }
            | StorageError::Write { table, .. }
            | StorageError::Flush { table, .. } => Some(*table),
        }
    }

    /// Key of the record being stored, if any
    pub fn record_key(&self) -> Option<&str> {
        match self {
            StorageError::Encode { key, .. } | StorageError::Write { key, .. } => Some(key),
            _ => None,
        }
    }
}
