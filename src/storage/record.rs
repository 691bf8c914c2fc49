//! Record families handed to a sink
//!
//! | Table                    | Key                 | One record per        |
//! |--------------------------|---------------------|-----------------------|
//! | `tagpack_by_uri`         | `uri`               | TagPack               |
//! | `tag_by_address`         | `address`           | tag                   |
//! | `tag_by_category`        | `category`          | tag with a category   |
//! | `tag_by_label`           | `label_norm_prefix` | tag with a text label |
//! | `taxonomy_by_key`        | `key`               | taxonomy              |
//! | `concept_by_taxonomy_id` | `id`                | concept               |
//!
//! Temporal values are always written as integer epoch seconds.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::tagpack::{Tag, TAGS_FIELD};
use crate::taxonomy::{Concept, Taxonomy};
use crate::validation::ValidatedTagPack;

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\W_]+").expect("valid regex"));

/// Length of the label prefix used as partition key.
pub const LABEL_PREFIX_LEN: usize = 3;

/// Logical record family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    TagpackByUri,
    TagByAddress,
    TagByCategory,
    TagByLabel,
    TaxonomyByKey,
    ConceptByTaxonomyId,
}

impl Table {
    pub const ALL: [Table; 6] = [
        Table::TagpackByUri,
        Table::TagByAddress,
        Table::TagByCategory,
        Table::TagByLabel,
        Table::TaxonomyByKey,
        Table::ConceptByTaxonomyId,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Table::TagpackByUri => "tagpack_by_uri",
            Table::TagByAddress => "tag_by_address",
            Table::TagByCategory => "tag_by_category",
            Table::TagByLabel => "tag_by_label",
            Table::TaxonomyByKey => "taxonomy_by_key",
            Table::ConceptByTaxonomyId => "concept_by_taxonomy_id",
        }
    }

    /// Field identifying a record within the family
    pub fn key_field(&self) -> &'static str {
        match self {
            Table::TagpackByUri => "uri",
            Table::TagByAddress => "address",
            Table::TagByCategory => "category",
            Table::TagByLabel => "label_norm_prefix",
            Table::TaxonomyByKey => "key",
            Table::ConceptByTaxonomyId => "id",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A flat record bound for one table
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    table: Table,
    fields: Map<String, Value>,
}

impl Record {
    pub fn new(table: Table, fields: Map<String, Value>) -> Self {
        Self { table, fields }
    }

    pub fn table(&self) -> Table {
        self.table
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Record identity used in logs and errors
    pub fn key(&self) -> String {
        match self.fields.get(self.table.key_field()) {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => String::from("<none>"),
        }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}

/// Strips every non-alphanumeric character and lowercases the rest.
pub fn normalize_label(label: &str) -> String {
    NON_WORD.replace_all(label, "").to_lowercase()
}

/// First three characters of a normalized label, or all of it if shorter.
pub fn label_norm_prefix(label_norm: &str) -> String {
    label_norm.chars().take(LABEL_PREFIX_LEN).collect()
}

/// `{uri} ∪ header fields`, without the tag list.
pub fn tagpack_record(pack: &ValidatedTagPack<'_>) -> Record {
    let tagpack = pack.tagpack();
    let mut fields = Map::new();
    fields.insert("uri".into(), Value::String(tagpack.tagpack_uri()));
    for (name, value) in tagpack.header_fields(pack.schema()) {
        if name != TAGS_FIELD {
            fields.insert(name.to_string(), value.to_json());
        }
    }
    Record::new(Table::TagpackByUri, fields)
}

/// `{tagpack_uri} ∪ resolved tag fields`
pub fn tag_record(table: Table, tag: &Tag<'_>) -> Record {
    let mut fields = Map::new();
    fields.insert(
        "tagpack_uri".into(),
        Value::String(tag.tagpack().tagpack_uri()),
    );
    fields.extend(tag.fields());
    Record::new(table, fields)
}

/// Tag record with `label_norm` and `label_norm_prefix`; `None` if the tag
/// has no text label.
pub fn tag_label_record(tag: &Tag<'_>) -> Option<Record> {
    let label = tag.label()?;
    let norm = normalize_label(label);
    let prefix = label_norm_prefix(&norm);

    let mut record = tag_record(Table::TagByLabel, tag);
    record.fields.insert("label_norm".into(), Value::String(norm));
    record
        .fields
        .insert("label_norm_prefix".into(), Value::String(prefix));
    Some(record)
}

pub fn taxonomy_record(taxonomy: &Taxonomy) -> Record {
    let mut fields = Map::new();
    fields.insert("key".into(), Value::String(taxonomy.key().to_string()));
    fields.insert("uri".into(), Value::String(taxonomy.uri().to_string()));
    Record::new(Table::TaxonomyByKey, fields)
}

pub fn concept_record(concept: &Concept) -> Record {
    let mut fields = Map::new();
    fields.insert("taxonomy".into(), Value::String(concept.taxonomy.clone()));
    fields.insert("id".into(), Value::String(concept.id.clone()));
    fields.insert("uri".into(), Value::String(concept.uri.clone()));
    fields.insert("label".into(), Value::String(concept.label.clone()));
    fields.insert(
        "description".into(),
        Value::String(concept.description.clone()),
    );
    Record::new(Table::ConceptByTaxonomyId, fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::TagPackSchema;
    use crate::tagpack::TagPack;
    use crate::validation::Validator;
    use serde_json::json;

    const SCHEMA: &str = r#"
header:
  title: {type: text, mandatory: true}
  creator: {type: text, mandatory: true}
  tags: {type: list, mandatory: true}
tag:
  address: {type: text, mandatory: true}
  label: {type: text, mandatory: false}
  category: {type: text, mandatory: false}
  lastmod: {type: datetime, mandatory: false}
"#;

    const PACK: &str = r#"
title: Test TagPack
creator: Dev
lastmod: 1970-01-02
tags:
  - address: abc
    label: Foo Bar!
  - address: def
    category: exchange
"#;

    #[test]
    fn test_normalize_label() {
        assert_eq!(normalize_label("Foo Bar!"), "foobar");
        assert_eq!(normalize_label("Some_Label-42"), "somelabel42");
        assert_eq!(normalize_label("Zürich Börse"), "zürichbörse");
        assert_eq!(normalize_label(""), "");
    }

    #[test]
    fn test_normalize_label_idempotent() {
        for label in ["Foo Bar!", "a.b.c", "ÄÖÜ exchange", "x"] {
            let once = normalize_label(label);
            assert_eq!(normalize_label(&once), once);
        }
    }

    #[test]
    fn test_label_prefix_counts_chars() {
        assert_eq!(label_norm_prefix("foobar"), "foo");
        assert_eq!(label_norm_prefix("ab"), "ab");
        assert_eq!(label_norm_prefix("ärger"), "ärg");
    }

    #[test]
    fn test_tagpack_and_tag_records() {
        let schema = TagPackSchema::from_yaml_str(SCHEMA, "test").unwrap();
        let pack = TagPack::from_yaml_str("http://example.com/packs/", "test.yaml", PACK).unwrap();
        let validated = Validator::new(&schema).admit(&pack).unwrap();

        let record = tagpack_record(&validated);
        assert_eq!(record.table(), Table::TagpackByUri);
        assert_eq!(record.key(), "http://example.com/packs/test.yaml");
        assert_eq!(
            record.into_value(),
            json!({
                "uri": "http://example.com/packs/test.yaml",
                "title": "Test TagPack",
                "creator": "Dev",
            })
        );

        let tags: Vec<_> = validated.tags().collect();
        let record = tag_record(Table::TagByAddress, &tags[0]);
        assert_eq!(record.key(), "abc");
        assert_eq!(record.get("lastmod"), Some(&json!(86400)));
        assert_eq!(
            record.get("tagpack_uri"),
            Some(&json!("http://example.com/packs/test.yaml"))
        );

        let label = tag_label_record(&tags[0]).unwrap();
        assert_eq!(label.get("label_norm"), Some(&json!("foobar")));
        assert_eq!(label.get("label_norm_prefix"), Some(&json!("foo")));
        assert_eq!(label.key(), "foo");

        assert!(tag_label_record(&tags[1]).is_none());
    }

    #[test]
    fn test_taxonomy_records() {
        let mut taxonomy = Taxonomy::new("entity", "http://example.com/entity");
        let concept = taxonomy
            .add_concept("exchange", "Exchange", "Trading platform")
            .unwrap()
            .clone();

        assert_eq!(
            taxonomy_record(&taxonomy).into_value(),
            json!({"key": "entity", "uri": "http://example.com/entity"})
        );
        assert_eq!(
            concept_record(&concept).into_value(),
            json!({
                "taxonomy": "entity",
                "id": "exchange",
                "uri": "http://example.com/entity/exchange",
                "label": "Exchange",
                "description": "Trading platform",
            })
        );
    }
}
