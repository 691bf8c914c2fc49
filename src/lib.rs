//! tagpack - validation and ingest of TagPack attribution files
//!
//! A TagPack is a YAML document attributing addresses to labels and
//! categories. This crate checks TagPacks against a schema definition,
//! external taxonomies and a category vocabulary, and turns accepted ones
//! into flat records for storage.
//!
//! ```ignore
//! use tagpack::schema::TagPackSchema;
//! use tagpack::tagpack::TagPack;
//! use tagpack::validation::Validator;
//!
//! let schema = TagPackSchema::builtin()?;
//! let pack = TagPack::load("https://example.com/packs", path)?;
//! Validator::new(&schema).validate(&pack)?;
//! ```

pub mod cli;
pub mod config;
pub mod observability;
pub mod schema;
pub mod storage;
pub mod tagpack;
pub mod taxonomy;
pub mod validation;
