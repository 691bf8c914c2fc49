//! TagPack validator
//!
//! Validation runs in two phases and stops at the first violation.
//!
//! Phase A, structure:
//! - every top-level key is declared in the header or tag namespace
//! - every tag key is declared in the tag namespace
//! - every category value is in the configured vocabulary
//!
//! Phase B, schema:
//! - mandatory header fields are present
//! - header fields are declared, well-typed and use known concepts
//! - per tag: mandatory fields are present (explicitly or inherited), then
//!   explicit fields are declared, well-typed and use known concepts
//!
//! The validator holds only shared references and never mutates documents,
//! so one instance can validate many TagPacks, also from several threads.

use crate::schema::{FieldDef, FieldType, Namespace, TagPackSchema};
use crate::tagpack::{FieldValue, Tag, TagPack, TAGS_FIELD};
use crate::taxonomy::TaxonomyRegistry;

use super::errors::{ValidationError, ValidationResult};
use super::vocabulary::CategoryVocabulary;

/// A TagPack that passed validation against a schema.
///
/// Only [`Validator::admit`] creates one; ingest accepts nothing else.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedTagPack<'a> {
    pack: &'a TagPack,
    schema: &'a TagPackSchema,
}

impl<'a> ValidatedTagPack<'a> {
    pub fn tagpack(&self) -> &'a TagPack {
        self.pack
    }

    pub fn schema(&self) -> &'a TagPackSchema {
        self.schema
    }

    pub fn tags(&self) -> impl Iterator<Item = Tag<'a>> {
        self.pack.tags(self.schema)
    }
}

/// Validator enforcing a schema, and optionally taxonomies and a category
/// vocabulary, on TagPacks.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'a> {
    schema: &'a TagPackSchema,
    taxonomies: Option<&'a TaxonomyRegistry>,
    categories: Option<&'a CategoryVocabulary>,
}

impl<'a> Validator<'a> {
    /// Creates a validator that checks schema conformance only.
    pub fn new(schema: &'a TagPackSchema) -> Self {
        Self {
            schema,
            taxonomies: None,
            categories: None,
        }
    }

    /// Enables taxonomy checks for fields bound to a taxonomy.
    ///
    /// An empty registry means no taxonomies are configured and disables the
    /// checks, same as `None`.
    pub fn with_taxonomies(mut self, taxonomies: Option<&'a TaxonomyRegistry>) -> Self {
        self.taxonomies = taxonomies.filter(|registry| !registry.is_empty());
        self
    }

    /// Enables the category vocabulary guard.
    pub fn with_categories(mut self, categories: Option<&'a CategoryVocabulary>) -> Self {
        self.categories = categories;
        self
    }

    pub fn schema(&self) -> &'a TagPackSchema {
        self.schema
    }

    /// Validates a TagPack.
    ///
    /// # Errors
    ///
    /// Returns the first violation found. Structural violations are reported
    /// before schema violations; mandatory fields are checked before types
    /// and taxonomies.
    pub fn validate(&self, pack: &TagPack) -> ValidationResult<()> {
        self.check_structure(pack)?;
        self.check_schema(pack)
    }

    /// Validates a TagPack and returns it wrapped for ingest.
    pub fn admit<'p>(&self, pack: &'p TagPack) -> ValidationResult<ValidatedTagPack<'p>>
    where
        'a: 'p,
    {
        self.validate(pack)?;
        Ok(ValidatedTagPack {
            pack,
            schema: self.schema,
        })
    }

    /// Phase A: field names against namespaces, categories against the
    /// vocabulary.
    pub fn check_structure(&self, pack: &TagPack) -> ValidationResult<()> {
        let unknown: Vec<String> = pack
            .all_header_fields()
            .keys()
            .filter(|k| k.as_str() != TAGS_FIELD && !self.schema.is_declared(k))
            .cloned()
            .collect();
        if !unknown.is_empty() {
            return Err(ValidationError::unknown_header_fields(unknown));
        }

        for tag in pack.tags(self.schema) {
            let unknown: Vec<String> = tag
                .explicit_fields()
                .keys()
                .filter(|k| !self.schema.is_tag_field(k))
                .cloned()
                .collect();
            if !unknown.is_empty() {
                return Err(ValidationError::unknown_tag_fields(unknown, &tag));
            }
        }

        if let Some(vocabulary) = self.categories {
            if let Some(violation) = vocabulary.find_violation(pack.all_header_fields()) {
                return Err(ValidationError::unknown_category(
                    violation.path,
                    violation.value,
                ));
            }
        }

        Ok(())
    }

    /// Phase B: mandatory fields, types and taxonomy concepts.
    pub fn check_schema(&self, pack: &TagPack) -> ValidationResult<()> {
        let header_fields = pack.header_fields(self.schema);
        for (name, _) in self.schema.mandatory_header_fields() {
            if !header_fields.contains_key(name) {
                return Err(ValidationError::mandatory_field_missing(name, None));
            }
        }

        for (field, value) in pack.all_header_fields() {
            // tags is the structural container; only typed if declared
            if field == TAGS_FIELD && !self.schema.is_declared(field) {
                continue;
            }
            let def = self
                .schema
                .field(field)
                .ok_or_else(|| ValidationError::field_not_allowed(field, Namespace::Header, None))?;
            self.check_type(field, def, value, None)?;
            self.check_taxonomy(field, def, value, None)?;
        }

        let generic = pack.generic_tag_fields(self.schema);
        for tag in pack.tags(self.schema) {
            for (name, _) in self.schema.mandatory_tag_fields() {
                if !tag.explicit_fields().contains_key(name) && !generic.contains_key(name) {
                    return Err(ValidationError::mandatory_field_missing(name, Some(&tag)));
                }
            }

            for (field, value) in tag.explicit_fields() {
                let def = self.schema.tag_fields().get(field).ok_or_else(|| {
                    ValidationError::field_not_allowed(field, Namespace::Tag, Some(&tag))
                })?;
                self.check_type(field, def, value, Some(&tag))?;
                self.check_taxonomy(field, def, value, Some(&tag))?;
            }
        }

        Ok(())
    }

    fn check_type(
        &self,
        field: &str,
        def: &FieldDef,
        value: &FieldValue,
        tag: Option<&Tag<'_>>,
    ) -> ValidationResult<()> {
        let ok = match def.field_type {
            FieldType::Text => matches!(value, FieldValue::Text(_)),
            FieldType::Datetime => value.is_temporal(),
            FieldType::List => matches!(value, FieldValue::List(_)),
        };
        if ok {
            Ok(())
        } else {
            Err(ValidationError::type_mismatch(field, def.field_type, value, tag))
        }
    }

    fn check_taxonomy(
        &self,
        field: &str,
        def: &FieldDef,
        value: &FieldValue,
        tag: Option<&Tag<'_>>,
    ) -> ValidationResult<()> {
        let (Some(registry), Some(key)) = (self.taxonomies, def.taxonomy.as_deref()) else {
            return Ok(());
        };
        let taxonomy = registry
            .get(key)
            .ok_or_else(|| ValidationError::unknown_taxonomy(key, field))?;

        // list fields bound to a taxonomy hold several concept ids
        let values: &[FieldValue] = match value {
            FieldValue::List(items) => items,
            single => std::slice::from_ref(single),
        };
        for v in values {
            let known = v.as_str().is_some_and(|id| taxonomy.contains(id));
            if !known {
                return Err(ValidationError::undefined_concept(field, &v.to_string(), tag));
            }
        }
        Ok(())
    }
}

/// Validates `pack` against `schema` and, if given, the taxonomies.
pub fn validate(
    pack: &TagPack,
    schema: &TagPackSchema,
    taxonomies: Option<&TaxonomyRegistry>,
) -> ValidationResult<()> {
    Validator::new(schema).with_taxonomies(taxonomies).validate(pack)
}
