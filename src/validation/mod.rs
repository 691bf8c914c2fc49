//! Validation engine
//!
//! Checks a [`TagPack`](crate::tagpack::TagPack) against a
//! [`TagPackSchema`](crate::schema::TagPackSchema), an optional
//! [`TaxonomyRegistry`](crate::taxonomy::TaxonomyRegistry) and an optional
//! category vocabulary. Fails fast: the first violation is returned.

mod errors;
mod validator;
mod vocabulary;

pub use errors::{ValidationDetails, ValidationError, ValidationErrorCode, ValidationResult};
pub use validator::{validate, ValidatedTagPack, Validator};
pub use vocabulary::{CategoryField, CategoryViolation, CategoryVocabulary};
