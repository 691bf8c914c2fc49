//! In-memory TagPack documents and their tags

use std::fmt;
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::errors::{TagPackError, TagPackResult};
use super::reader::parse_document;
use super::value::{FieldMap, FieldValue};
use crate::schema::TagPackSchema;

/// Name of the structural container holding the tag list
pub const TAGS_FIELD: &str = "tags";

/// A parsed TagPack: header fields plus a list of tags.
///
/// Views that depend on field namespaces (`header_fields`,
/// `generic_tag_fields`, `tags`) take the schema they are derived against.
#[derive(Debug, Clone)]
pub struct TagPack {
    base_uri: String,
    filename: String,
    fields: FieldMap,
}

impl TagPack {
    /// Reads and parses a TagPack file.
    ///
    /// The path as given becomes the TagPack's filename.
    pub fn load(base_uri: impl Into<String>, path: &Path) -> TagPackResult<Self> {
        let filename = path.display().to_string();
        let source = fs::read_to_string(path).map_err(|e| TagPackError::Io {
            path: filename.clone(),
            source: e,
        })?;
        Self::from_yaml_str(base_uri, filename, &source)
    }

    /// Parses a TagPack from YAML text.
    pub fn from_yaml_str(
        base_uri: impl Into<String>,
        filename: impl Into<String>,
        source: &str,
    ) -> TagPackResult<Self> {
        let root = parse_document(source)?;
        Self::from_value(base_uri, filename, root)
    }

    /// Builds a TagPack from an already parsed document root.
    ///
    /// # Errors
    ///
    /// - `CannotExtractFields` if the root is not a mapping
    /// - `MissingTags` if there is no (non-null) `tags` field
    /// - `MalformedTags` if `tags` is not a list of mappings
    pub fn from_value(
        base_uri: impl Into<String>,
        filename: impl Into<String>,
        root: FieldValue,
    ) -> TagPackResult<Self> {
        let fields = match root {
            FieldValue::Map(map) => map,
            other => return Err(TagPackError::CannotExtractFields(other.type_name())),
        };

        match fields.get(TAGS_FIELD) {
            None | Some(FieldValue::Null) => return Err(TagPackError::MissingTags),
            Some(FieldValue::List(items)) => {
                if let Some((i, item)) = items.iter().enumerate().find(|(_, t)| t.as_map().is_none())
                {
                    return Err(TagPackError::MalformedTags(format!(
                        "tag #{} is {}, expected a mapping",
                        i + 1,
                        item.type_name()
                    )));
                }
            }
            Some(other) => {
                return Err(TagPackError::MalformedTags(format!(
                    "tags is {}, expected a list",
                    other.type_name()
                )))
            }
        }

        Ok(Self {
            base_uri: base_uri.into(),
            filename: filename.into(),
            fields,
        })
    }

    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Globally unique identifier: base URI and filename joined by `/`
    pub fn tagpack_uri(&self) -> String {
        format!("{}/{}", self.base_uri.trim_end_matches('/'), self.filename)
    }

    /// Every top-level field, including `tags` and generic tag fields
    pub fn all_header_fields(&self) -> &FieldMap {
        &self.fields
    }

    /// Top-level fields declared in the schema's header namespace
    pub fn header_fields<'a>(&'a self, schema: &TagPackSchema) -> IndexMap<&'a str, &'a FieldValue> {
        self.fields
            .iter()
            .filter(|(k, _)| schema.is_header_field(k))
            .map(|(k, v)| (k.as_str(), v))
            .collect()
    }

    /// Top-level fields declared in the tag namespace, inherited by every tag
    pub fn generic_tag_fields<'a>(
        &'a self,
        schema: &TagPackSchema,
    ) -> IndexMap<&'a str, &'a FieldValue> {
        self.fields
            .iter()
            .filter(|(k, _)| k.as_str() != TAGS_FIELD && schema.is_tag_field(k))
            .map(|(k, v)| (k.as_str(), v))
            .collect()
    }

    /// Looks up a single generic tag field
    pub fn generic_tag_field(&self, schema: &TagPackSchema, name: &str) -> Option<&FieldValue> {
        if name == TAGS_FIELD || !schema.is_tag_field(name) {
            return None;
        }
        self.fields.get(name)
    }

    /// Raw tag entries; validated to be mappings at construction
    fn tag_entries(&self) -> impl Iterator<Item = &FieldMap> {
        self.fields
            .get(TAGS_FIELD)
            .and_then(FieldValue::as_list)
            .unwrap_or(&[])
            .iter()
            .filter_map(FieldValue::as_map)
    }

    /// Number of tags in the body
    pub fn tag_count(&self) -> usize {
        self.tag_entries().count()
    }

    /// Tags of this TagPack, resolved against `schema`
    pub fn tags<'a>(&'a self, schema: &'a TagPackSchema) -> impl Iterator<Item = Tag<'a>> {
        self.tag_entries()
            .enumerate()
            .map(move |(index, fields)| Tag {
                index,
                fields,
                pack: self,
                schema,
            })
    }
}

impl fmt::Display for TagPack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", FieldValue::Map(self.fields.clone()))
    }
}

/// A single tag, borrowing from its TagPack.
///
/// Field lookup is two-layered: explicit tag fields first, then the
/// TagPack's generic tag fields.
#[derive(Debug, Clone, Copy)]
pub struct Tag<'a> {
    index: usize,
    fields: &'a FieldMap,
    pack: &'a TagPack,
    schema: &'a TagPackSchema,
}

impl<'a> Tag<'a> {
    /// Zero-based position in the TagPack's tag list
    pub fn index(&self) -> usize {
        self.index
    }

    /// The owning TagPack
    pub fn tagpack(&self) -> &'a TagPack {
        self.pack
    }

    /// Fields written on the tag entry itself
    pub fn explicit_fields(&self) -> &'a FieldMap {
        self.fields
    }

    /// Looks up a field, falling back to the generic tag fields
    pub fn get(&self, name: &str) -> Option<&'a FieldValue> {
        self.fields
            .get(name)
            .or_else(|| self.pack.generic_tag_field(self.schema, name))
    }

    /// True if the field is set explicitly or inherited
    pub fn has_field(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Explicit and inherited fields; explicit values win on collision
    pub fn resolved_fields(&self) -> IndexMap<&'a str, &'a FieldValue> {
        let mut resolved: IndexMap<&'a str, &'a FieldValue> = self
            .fields
            .iter()
            .map(|(k, v)| (k.as_str(), v))
            .collect();
        for (k, v) in self.pack.generic_tag_fields(self.schema) {
            resolved.entry(k).or_insert(v);
        }
        resolved
    }

    /// Resolved fields with temporal values as integer epoch seconds
    pub fn fields(&self) -> Map<String, Value> {
        self.resolved_fields()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_json()))
            .collect()
    }

    /// The tag's address, if it is text
    pub fn address(&self) -> Option<&'a str> {
        self.get("address").and_then(FieldValue::as_str)
    }

    /// The tag's label, if it is text
    pub fn label(&self) -> Option<&'a str> {
        self.get("label").and_then(FieldValue::as_str)
    }

    /// Short human-readable reference used in error messages
    pub fn describe(&self) -> String {
        match self.fields.get("address") {
            Some(address) => format!("#{} (address {})", self.index + 1, address),
            None => format!("#{}", self.index + 1),
        }
    }
}

impl fmt::Display for Tag<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Value::Object(self.fields()))
    }
}
