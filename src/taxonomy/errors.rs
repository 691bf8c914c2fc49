//! Taxonomy errors

use thiserror::Error;

/// Result type for taxonomy operations
pub type TaxonomyResult<T> = Result<T, TaxonomyError>;

#[derive(Debug, Error)]
pub enum TaxonomyError {
    #[error("Unknown taxonomy {0}")]
    UnknownTaxonomy(String),

    #[error("Taxonomy {0} is already registered")]
    DuplicateTaxonomy(String),

    #[error("Concept {id} is defined twice in taxonomy {taxonomy}")]
    DuplicateConcept { taxonomy: String, id: String },

    #[error("Cannot read concept feed for taxonomy {taxonomy} from {location}: {source}")]
    Io {
        taxonomy: String,
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed concept feed for taxonomy {taxonomy}: {source}")]
    Feed {
        taxonomy: String,
        #[source]
        source: csv::Error,
    },
}
