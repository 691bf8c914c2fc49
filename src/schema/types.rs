//! TagPack schema definitions
//!
//! A schema has two disjoint namespaces of fields:
//! - header: fields describing the TagPack as a whole
//! - tag: fields of a single tag, which may also be set generically in the
//!   header and are then inherited by every tag
//!
//! Supported field types:
//! - text: string
//! - datetime: date or date/time (never a plain string)
//! - list: sequence

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use super::errors::{SchemaError, SchemaResult};

/// Supported field types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// String value
    Text,
    /// Date or timestamp value
    Datetime,
    /// Sequence value
    List,
}

impl FieldType {
    /// Parses a schema type literal
    pub fn parse(literal: &str) -> Option<Self> {
        match literal {
            "text" => Some(FieldType::Text),
            "datetime" => Some(FieldType::Datetime),
            "list" => Some(FieldType::List),
            _ => None,
        }
    }

    /// Returns the type name as written in schema files
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Datetime => "datetime",
            FieldType::List => "list",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// Field namespaces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    Header,
    Tag,
}

impl Namespace {
    pub fn as_str(&self) -> &'static str {
        match self {
            Namespace::Header => "header",
            Namespace::Tag => "tag",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Field definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDef {
    /// Field data type
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Whether field must be present
    pub mandatory: bool,
    /// Key of the taxonomy the field's values are drawn from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taxonomy: Option<String>,
}

impl FieldDef {
    /// Create a mandatory field of the given type
    pub fn mandatory(field_type: FieldType) -> Self {
        Self {
            field_type,
            mandatory: true,
            taxonomy: None,
        }
    }

    /// Create an optional field of the given type
    pub fn optional(field_type: FieldType) -> Self {
        Self {
            field_type,
            mandatory: false,
            taxonomy: None,
        }
    }

    /// Binds the field to a taxonomy
    pub fn with_taxonomy(mut self, taxonomy: impl Into<String>) -> Self {
        self.taxonomy = Some(taxonomy.into());
        self
    }
}

/// Complete TagPack schema definition.
///
/// Read-only once constructed; share it by reference across validations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagPackSchema {
    header: IndexMap<String, FieldDef>,
    tag: IndexMap<String, FieldDef>,
    /// Where the definition came from (file path or `<builtin>`)
    #[serde(skip)]
    definition: String,
}

impl TagPackSchema {
    /// Creates a schema, rejecting names declared in both namespaces.
    pub fn new(
        header: IndexMap<String, FieldDef>,
        tag: IndexMap<String, FieldDef>,
    ) -> SchemaResult<Self> {
        let schema = Self {
            header,
            tag,
            definition: "<in-memory>".into(),
        };
        schema.validate_structure()?;
        Ok(schema)
    }

    pub(crate) fn with_definition(mut self, definition: impl Into<String>) -> Self {
        self.definition = definition.into();
        self
    }

    /// Validates the schema structure itself (not a document)
    pub fn validate_structure(&self) -> SchemaResult<()> {
        if let Some(name) = self.header.keys().find(|k| self.tag.contains_key(*k)) {
            return Err(SchemaError::ambiguous_field(name.as_str()));
        }
        Ok(())
    }

    /// Returns the schema origin
    pub fn definition(&self) -> &str {
        &self.definition
    }

    /// Header namespace field definitions
    pub fn header_fields(&self) -> &IndexMap<String, FieldDef> {
        &self.header
    }

    /// Tag namespace field definitions
    pub fn tag_fields(&self) -> &IndexMap<String, FieldDef> {
        &self.tag
    }

    pub fn mandatory_header_fields(&self) -> impl Iterator<Item = (&str, &FieldDef)> {
        self.header
            .iter()
            .filter(|(_, def)| def.mandatory)
            .map(|(name, def)| (name.as_str(), def))
    }

    pub fn mandatory_tag_fields(&self) -> impl Iterator<Item = (&str, &FieldDef)> {
        self.tag
            .iter()
            .filter(|(_, def)| def.mandatory)
            .map(|(name, def)| (name.as_str(), def))
    }

    /// Union of both namespaces.
    ///
    /// Fails if a name is declared twice, which `new` already prevents.
    pub fn all_fields(&self) -> SchemaResult<IndexMap<&str, &FieldDef>> {
        let mut all = IndexMap::with_capacity(self.header.len() + self.tag.len());
        for (name, def) in self.header.iter().chain(self.tag.iter()) {
            if all.insert(name.as_str(), def).is_some() {
                return Err(SchemaError::ambiguous_field(name.as_str()));
            }
        }
        Ok(all)
    }

    /// Looks up a field in either namespace
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.header.get(name).or_else(|| self.tag.get(name))
    }

    /// Returns the namespace a field is declared in
    pub fn namespace_of(&self, name: &str) -> Option<Namespace> {
        if self.header.contains_key(name) {
            Some(Namespace::Header)
        } else if self.tag.contains_key(name) {
            Some(Namespace::Tag)
        } else {
            None
        }
    }

    /// True if the field is declared in either namespace
    pub fn is_declared(&self, name: &str) -> bool {
        self.namespace_of(name).is_some()
    }

    pub fn is_header_field(&self, name: &str) -> bool {
        self.header.contains_key(name)
    }

    pub fn is_tag_field(&self, name: &str) -> bool {
        self.tag.contains_key(name)
    }

    /// Returns the declared type of a field
    pub fn field_type(&self, name: &str) -> SchemaResult<FieldType> {
        self.field(name)
            .map(|def| def.field_type)
            .ok_or_else(|| SchemaError::unknown_field(name))
    }

    /// Returns the taxonomy binding of a field.
    ///
    /// `Ok(None)` means the field exists but is not bound to a taxonomy.
    pub fn field_taxonomy(&self, name: &str) -> SchemaResult<Option<&str>> {
        self.field(name)
            .map(|def| def.taxonomy.as_deref())
            .ok_or_else(|| SchemaError::unknown_field(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaErrorCode;

    fn sample_schema() -> TagPackSchema {
        let mut header = IndexMap::new();
        header.insert("title".into(), FieldDef::mandatory(FieldType::Text));
        header.insert("notmandatory".into(), FieldDef::optional(FieldType::Text));

        let mut tag = IndexMap::new();
        tag.insert("address".into(), FieldDef::mandatory(FieldType::Text));
        tag.insert("lastmod".into(), FieldDef::optional(FieldType::Datetime));
        tag.insert(
            "category".into(),
            FieldDef::optional(FieldType::Text).with_taxonomy("entity"),
        );

        TagPackSchema::new(header, tag).unwrap()
    }

    #[test]
    fn test_mandatory_fields() {
        let schema = sample_schema();
        let header: Vec<_> = schema.mandatory_header_fields().map(|(n, _)| n).collect();
        assert_eq!(header, vec!["title"]);
        let tag: Vec<_> = schema.mandatory_tag_fields().map(|(n, _)| n).collect();
        assert_eq!(tag, vec!["address"]);
    }

    #[test]
    fn test_all_fields() {
        let schema = sample_schema();
        let all = schema.all_fields().unwrap();
        for name in ["title", "notmandatory", "address", "lastmod", "category"] {
            assert!(all.contains_key(name), "missing {}", name);
        }
    }

    #[test]
    fn test_field_type_and_taxonomy() {
        let schema = sample_schema();
        assert_eq!(schema.field_type("title").unwrap(), FieldType::Text);
        assert_eq!(schema.field_type("lastmod").unwrap(), FieldType::Datetime);
        assert_eq!(schema.field_taxonomy("category").unwrap(), Some("entity"));
        assert_eq!(schema.field_taxonomy("title").unwrap(), None);
    }

    #[test]
    fn test_unknown_field_lookup_is_distinct() {
        let schema = sample_schema();
        let err = schema.field_taxonomy("nonexistent").unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::UnknownField);
        assert!(schema.field_type("nonexistent").is_err());
    }

    #[test]
    fn test_field_in_both_namespaces_rejected() {
        let mut header = IndexMap::new();
        header.insert("label".into(), FieldDef::optional(FieldType::Text));
        let mut tag = IndexMap::new();
        tag.insert("label".into(), FieldDef::mandatory(FieldType::Text));

        let err = TagPackSchema::new(header, tag).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::AmbiguousField);
        assert_eq!(err.field(), Some("label"));
    }

    #[test]
    fn test_namespace_of() {
        let schema = sample_schema();
        assert_eq!(schema.namespace_of("title"), Some(Namespace::Header));
        assert_eq!(schema.namespace_of("address"), Some(Namespace::Tag));
        assert_eq!(schema.namespace_of("failfield"), None);
    }

    #[test]
    fn test_field_type_literals() {
        assert_eq!(FieldType::parse("text"), Some(FieldType::Text));
        assert_eq!(FieldType::parse("datetime"), Some(FieldType::Datetime));
        assert_eq!(FieldType::parse("list"), Some(FieldType::List));
        assert_eq!(FieldType::parse("int"), None);
    }
}
