//! Validation error types
//!
//! Error codes:
//! - TAGPACK_UNKNOWN_HEADER_FIELD
//! - TAGPACK_UNKNOWN_TAG_FIELD
//! - TAGPACK_UNKNOWN_CATEGORY
//! - TAGPACK_MANDATORY_FIELD_MISSING
//! - TAGPACK_FIELD_NOT_ALLOWED
//! - TAGPACK_TYPE_MISMATCH
//! - TAGPACK_UNKNOWN_TAXONOMY
//! - TAGPACK_UNDEFINED_CONCEPT
//!
//! All of them reject one TagPack; none of them stop a batch.

use std::fmt;

use crate::schema::{FieldType, Namespace};
use crate::tagpack::{FieldValue, Tag};

/// Validation error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorCode {
    /// Top-level key declared in neither namespace
    UnknownHeaderField,
    /// Tag key not declared in the tag namespace
    UnknownTagField,
    /// Category value outside the configured vocabulary
    UnknownCategory,
    /// Mandatory field absent
    MandatoryFieldMissing,
    /// Field present in a namespace where it is not allowed
    FieldNotAllowed,
    /// Value shape does not match the declared type
    TypeMismatch,
    /// Field bound to a taxonomy the registry does not hold
    UnknownTaxonomy,
    /// Value is not a concept id of the bound taxonomy
    UndefinedConcept,
}

impl ValidationErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            ValidationErrorCode::UnknownHeaderField => "TAGPACK_UNKNOWN_HEADER_FIELD",
            ValidationErrorCode::UnknownTagField => "TAGPACK_UNKNOWN_TAG_FIELD",
            ValidationErrorCode::UnknownCategory => "TAGPACK_UNKNOWN_CATEGORY",
            ValidationErrorCode::MandatoryFieldMissing => "TAGPACK_MANDATORY_FIELD_MISSING",
            ValidationErrorCode::FieldNotAllowed => "TAGPACK_FIELD_NOT_ALLOWED",
            ValidationErrorCode::TypeMismatch => "TAGPACK_TYPE_MISMATCH",
            ValidationErrorCode::UnknownTaxonomy => "TAGPACK_UNKNOWN_TAXONOMY",
            ValidationErrorCode::UndefinedConcept => "TAGPACK_UNDEFINED_CONCEPT",
        }
    }

    /// True for the structural checks that run before the schema walk
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            ValidationErrorCode::UnknownHeaderField
                | ValidationErrorCode::UnknownTagField
                | ValidationErrorCode::UnknownCategory
        )
    }
}

impl fmt::Display for ValidationErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Location of a violation within a TagPack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDetails {
    /// Offending field name(s) or path
    pub fields: Vec<String>,
    /// Offending value, if a single value is implicated
    pub value: Option<String>,
    /// Zero-based index of the implicated tag
    pub tag_index: Option<usize>,
    /// Human-readable tag reference (`#2 (address ...)`)
    pub tag: Option<String>,
}

impl ValidationDetails {
    pub fn field(field: impl Into<String>) -> Self {
        Self {
            fields: vec![field.into()],
            value: None,
            tag_index: None,
            tag: None,
        }
    }

    pub fn fields(fields: Vec<String>) -> Self {
        Self {
            fields,
            value: None,
            tag_index: None,
            tag: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn in_tag(mut self, tag: Option<&Tag<'_>>) -> Self {
        if let Some(tag) = tag {
            self.tag_index = Some(tag.index());
            self.tag = Some(tag.describe());
        }
        self
    }
}

/// Schema validation error
#[derive(Debug, Clone)]
pub struct ValidationError {
    code: ValidationErrorCode,
    message: String,
    details: ValidationDetails,
}

impl ValidationError {
    fn new(code: ValidationErrorCode, message: String, details: ValidationDetails) -> Self {
        Self {
            code,
            message,
            details,
        }
    }

    /// Top-level keys declared in neither namespace
    pub fn unknown_header_fields(fields: Vec<String>) -> Self {
        let message = format!("Found unknown header field(s): {}", fields.join(", "));
        Self::new(
            ValidationErrorCode::UnknownHeaderField,
            message,
            ValidationDetails::fields(fields),
        )
    }

    /// Tag keys not declared in the tag namespace
    pub fn unknown_tag_fields(fields: Vec<String>, tag: &Tag<'_>) -> Self {
        let message = format!(
            "Found unknown tag field(s) {} in tag {}",
            fields.join(", "),
            tag.describe()
        );
        Self::new(
            ValidationErrorCode::UnknownTagField,
            message,
            ValidationDetails::fields(fields).in_tag(Some(tag)),
        )
    }

    /// Category outside the configured vocabulary; `path` locates the key
    pub fn unknown_category(path: impl Into<String>, value: impl Into<String>) -> Self {
        let path = path.into();
        let value = value.into();
        let message = format!("Found unknown category {} in {}", value, path);
        Self::new(
            ValidationErrorCode::UnknownCategory,
            message,
            ValidationDetails::field(path).with_value(value),
        )
    }

    pub fn mandatory_field_missing(field: &str, tag: Option<&Tag<'_>>) -> Self {
        let message = match tag {
            Some(t) => format!("Mandatory field {} missing in tag {}", field, t.describe()),
            None => format!("Mandatory field {} missing", field),
        };
        Self::new(
            ValidationErrorCode::MandatoryFieldMissing,
            message,
            ValidationDetails::field(field).in_tag(tag),
        )
    }

    pub fn field_not_allowed(field: &str, namespace: Namespace, tag: Option<&Tag<'_>>) -> Self {
        let message = match tag {
            Some(t) => format!(
                "Field {} not allowed in {} {}",
                field,
                namespace,
                t.describe()
            ),
            None => format!("Field {} not allowed in {}", field, namespace),
        };
        Self::new(
            ValidationErrorCode::FieldNotAllowed,
            message,
            ValidationDetails::field(field).in_tag(tag),
        )
    }

    pub fn type_mismatch(
        field: &str,
        expected: FieldType,
        actual: &FieldValue,
        tag: Option<&Tag<'_>>,
    ) -> Self {
        let mut message = format!(
            "Field {} must be of type {}, got {}",
            field,
            expected,
            actual.type_name()
        );
        if let Some(t) = tag {
            message.push_str(&format!(" in tag {}", t.describe()));
        }
        Self::new(
            ValidationErrorCode::TypeMismatch,
            message,
            ValidationDetails::field(field)
                .with_value(actual.to_string())
                .in_tag(tag),
        )
    }

    pub fn unknown_taxonomy(taxonomy: &str, field: &str) -> Self {
        Self::new(
            ValidationErrorCode::UnknownTaxonomy,
            format!("Unknown taxonomy {} bound to field {}", taxonomy, field),
            ValidationDetails::field(field).with_value(taxonomy),
        )
    }

    pub fn undefined_concept(field: &str, value: &str, tag: Option<&Tag<'_>>) -> Self {
        let mut message = format!("Undefined concept {} in field {}", value, field);
        if let Some(t) = tag {
            message.push_str(&format!(" of tag {}", t.describe()));
        }
        Self::new(
            ValidationErrorCode::UndefinedConcept,
            message,
            ValidationDetails::field(field).with_value(value).in_tag(tag),
        )
    }

    /// Returns the error code
    pub fn code(&self) -> ValidationErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns where the violation occurred
    pub fn details(&self) -> &ValidationDetails {
        &self.details
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Schema Validation Error: {}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Result type for validation
pub type ValidationResult<T> = Result<T, ValidationError>;
