//! Schema definition subsystem
//!
//! The schema is the declarative contract for TagPack documents: which
//! fields exist in the header and tag namespaces, their types, whether they
//! are mandatory, and which taxonomy (if any) their values come from.
//!
//! Loaded once at startup and read-only afterwards.

mod errors;
mod loader;
mod types;

pub use errors::{SchemaError, SchemaErrorCode, SchemaResult, Severity};
pub use loader::BUILTIN_SCHEMA;
pub use types::{FieldDef, FieldType, Namespace, TagPackSchema};
