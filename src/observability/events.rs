//! Lifecycle events
//!
//! Every log line emitted by the crate carries one of these names in its
//! `event` field, so runs can be grepped and compared.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration file parsed and checked
    ConfigLoaded,
    /// Schema definition loaded
    SchemaLoaded,
    /// Taxonomy concepts loaded into the registry
    TaxonomyLoaded,

    // Validation
    /// TagPack passed validation
    TagpackValidated,
    /// TagPack failed to load or validate
    TagpackRejected,

    // Ingest
    /// TagPack records handed to the sink
    TagpackIngested,
    /// Taxonomy and concept records handed to the sink
    TaxonomyIngested,
    /// Sink flushed, batch finished
    IngestComplete,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SchemaLoaded => "SCHEMA_LOADED",
            Event::TaxonomyLoaded => "TAXONOMY_LOADED",
            Event::TagpackValidated => "TAGPACK_VALIDATED",
            Event::TagpackRejected => "TAGPACK_REJECTED",
            Event::TagpackIngested => "TAGPACK_INGESTED",
            Event::TaxonomyIngested => "TAXONOMY_INGESTED",
            Event::IngestComplete => "INGEST_COMPLETE",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
