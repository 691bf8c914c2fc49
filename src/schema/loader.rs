//! Schema loading from YAML field-definition files
//!
//! A schema file has two top-level groups, `header` and `tag`, each mapping
//! field name to `{type, mandatory, taxonomy?}`. Type literals are checked
//! here, so an unsupported type fails at startup rather than on first use.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::debug;

use super::errors::{SchemaError, SchemaResult};
use super::types::{FieldDef, FieldType, TagPackSchema};

/// Default schema shipped with the crate
pub const BUILTIN_SCHEMA: &str = include_str!("../../conf/tagpack_schema.yaml");

const BUILTIN_ORIGIN: &str = "<builtin>";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSchema {
    header: IndexMap<String, RawFieldDef>,
    tag: IndexMap<String, RawFieldDef>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFieldDef {
    #[serde(rename = "type")]
    field_type: String,
    mandatory: bool,
    #[serde(default)]
    taxonomy: Option<String>,
}

impl TagPackSchema {
    /// Loads a schema file from disk.
    ///
    /// Missing or malformed schema files are FATAL errors.
    pub fn load(path: &Path) -> SchemaResult<Self> {
        let origin = path.display().to_string();
        let content =
            fs::read_to_string(path).map_err(|e| SchemaError::not_found(origin.as_str(), e))?;
        Self::from_yaml_str(&content, &origin)
    }

    /// Parses a schema from YAML text; `origin` is used in error messages.
    pub fn from_yaml_str(source: &str, origin: &str) -> SchemaResult<Self> {
        let raw: RawSchema =
            serde_yaml::from_str(source).map_err(|e| SchemaError::malformed(origin, e))?;

        let header = convert_fields(raw.header, origin)?;
        let tag = convert_fields(raw.tag, origin)?;

        let schema = TagPackSchema::new(header, tag)
            .map_err(|e| e.with_origin(origin))?
            .with_definition(origin);

        debug!(
            origin,
            header_fields = schema.header_fields().len(),
            tag_fields = schema.tag_fields().len(),
            "schema parsed"
        );
        Ok(schema)
    }

    /// Returns the default schema shipped with the crate
    pub fn builtin() -> SchemaResult<Self> {
        Self::from_yaml_str(BUILTIN_SCHEMA, BUILTIN_ORIGIN)
    }
}

fn convert_fields(
    raw: IndexMap<String, RawFieldDef>,
    origin: &str,
) -> SchemaResult<IndexMap<String, FieldDef>> {
    raw.into_iter()
        .map(|(name, def)| {
            let field_type = FieldType::parse(&def.field_type).ok_or_else(|| {
                SchemaError::unsupported_type(origin, name.as_str(), &def.field_type)
            })?;
            let field = FieldDef {
                field_type,
                mandatory: def.mandatory,
                taxonomy: def.taxonomy,
            };
            Ok((name, field))
        })
        .collect()
}
