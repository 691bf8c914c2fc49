//! Schema error types
//!
//! Error codes:
//! - TAGPACK_SCHEMA_NOT_FOUND (FATAL)
//! - TAGPACK_SCHEMA_MALFORMED (FATAL)
//! - TAGPACK_SCHEMA_UNSUPPORTED_TYPE (FATAL)
//! - TAGPACK_SCHEMA_AMBIGUOUS_FIELD (FATAL)
//! - TAGPACK_SCHEMA_UNKNOWN_FIELD (REJECT)

use std::fmt;

/// Severity levels for schema errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The lookup or request is rejected, the process continues
    Reject,
    /// The schema cannot be used; startup must abort
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Schema file does not exist or cannot be read
    SchemaNotFound,
    /// Schema file is not a valid field definition document
    SchemaMalformed,
    /// A field declares a type other than text, datetime or list
    UnsupportedType,
    /// A field name is declared in both header and tag namespaces
    AmbiguousField,
    /// Lookup of a field the schema does not declare
    UnknownField,
}

impl SchemaErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::SchemaNotFound => "TAGPACK_SCHEMA_NOT_FOUND",
            SchemaErrorCode::SchemaMalformed => "TAGPACK_SCHEMA_MALFORMED",
            SchemaErrorCode::UnsupportedType => "TAGPACK_SCHEMA_UNSUPPORTED_TYPE",
            SchemaErrorCode::AmbiguousField => "TAGPACK_SCHEMA_AMBIGUOUS_FIELD",
            SchemaErrorCode::UnknownField => "TAGPACK_SCHEMA_UNKNOWN_FIELD",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            SchemaErrorCode::UnknownField => Severity::Reject,
            _ => Severity::Fatal,
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Schema error type with full context
#[derive(Debug)]
pub struct SchemaError {
    code: SchemaErrorCode,
    message: String,
    /// Schema file path or `<builtin>`
    origin: Option<String>,
    /// Field name if applicable
    field: Option<String>,
}

impl SchemaError {
    /// Create a schema not found error
    pub fn not_found(origin: impl Into<String>, reason: impl fmt::Display) -> Self {
        let origin = origin.into();
        Self {
            code: SchemaErrorCode::SchemaNotFound,
            message: format!("Cannot read schema file '{}': {}", origin, reason),
            origin: Some(origin),
            field: None,
        }
    }

    /// Create an error for a malformed schema file
    pub fn malformed(origin: impl Into<String>, reason: impl fmt::Display) -> Self {
        let origin = origin.into();
        Self {
            code: SchemaErrorCode::SchemaMalformed,
            message: format!("Malformed schema file '{}': {}", origin, reason),
            origin: Some(origin),
            field: None,
        }
    }

    /// Create an unsupported type error
    pub fn unsupported_type(
        origin: impl Into<String>,
        field: impl Into<String>,
        literal: &str,
    ) -> Self {
        let field = field.into();
        Self {
            code: SchemaErrorCode::UnsupportedType,
            message: format!("Unsupported schema type {} for field {}", literal, field),
            origin: Some(origin.into()),
            field: Some(field),
        }
    }

    /// Create an ambiguous field error
    pub fn ambiguous_field(field: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            code: SchemaErrorCode::AmbiguousField,
            message: format!("Field {} is declared in both header and tag", field),
            origin: None,
            field: Some(field),
        }
    }

    /// Create an unknown field error
    pub fn unknown_field(field: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            code: SchemaErrorCode::UnknownField,
            message: format!("Field {} is not defined in schema", field),
            origin: None,
            field: Some(field),
        }
    }

    /// Attaches the schema origin if not already set
    pub(crate) fn with_origin(mut self, origin: &str) -> Self {
        if self.origin.is_none() {
            self.origin = Some(origin.to_string());
        }
        self
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the schema origin if applicable
    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    /// Returns the field name if applicable
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Returns whether this is a fatal error
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code.severity(), self.code.code(), self.message)
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
