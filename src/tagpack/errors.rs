//! Structural TagPack errors
//!
//! These are raised while reading a document, before any schema is
//! consulted, and are kept apart from schema validation errors.

use thiserror::Error;

/// Result type for document operations
pub type TagPackResult<T> = Result<T, TagPackError>;

/// Gross structural defects in a TagPack file
#[derive(Debug, Error)]
pub enum TagPackError {
    #[error("Cannot read TagPack file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot parse YAML: {0}")]
    Parse(String),

    /// The document root is not a mapping
    #[error("Cannot extract TagPack fields: document root is {0}, expected a mapping")]
    CannotExtractFields(&'static str),

    #[error("Mandatory tags field is missing")]
    MissingTags,

    /// `tags` is present but is not a list of mappings
    #[error("Cannot extract TagPack fields: {0}")]
    MalformedTags(String),
}

impl TagPackError {
    /// Stable error code for reporting
    pub fn code(&self) -> &'static str {
        match self {
            TagPackError::Io { .. } => "TAGPACK_FILE_IO_ERROR",
            TagPackError::Parse(_) => "TAGPACK_FILE_PARSE_ERROR",
            TagPackError::CannotExtractFields(_) => "TAGPACK_FILE_CANNOT_EXTRACT_FIELDS",
            TagPackError::MissingTags => "TAGPACK_FILE_MISSING_TAGS",
            TagPackError::MalformedTags(_) => "TAGPACK_FILE_MALFORMED_TAGS",
        }
    }
}
