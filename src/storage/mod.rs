//! Serialization and sink adapter
//!
//! Turns validated TagPacks and loaded taxonomies into flat records for six
//! logical tables, and writes them through a [`RecordSink`].
//!
//! # Design Principles
//!
//! - Only validated documents are serialized
//! - Dates and timestamps become integer epoch seconds
//! - Sinks are append-only

mod errors;
mod ingest;
mod record;
mod sink;
mod writer;

pub use errors::{StorageError, StorageResult};
pub use ingest::{IngestStats, Ingestor};
pub use record::{
    concept_record, label_norm_prefix, normalize_label, tag_label_record, tag_record,
    tagpack_record, taxonomy_record, Record, Table, LABEL_PREFIX_LEN,
};
pub use sink::{MemorySink, RecordSink};
pub use writer::JsonlSink;
