//! TagPack document model
//!
//! A TagPack is a YAML document with header fields and a `tags` list. Tags
//! inherit header-level fields of the tag namespace ("generic tag fields")
//! unless they set the field themselves.

mod document;
mod errors;
mod reader;
mod value;

pub use document::{Tag, TagPack, TAGS_FIELD};
pub use errors::{TagPackError, TagPackResult};
pub use reader::parse_document;
pub use value::{FieldMap, FieldValue};
