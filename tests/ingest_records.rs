//! Ingest Record Tests
//!
//! - Record families and their shapes
//! - Label normalization and prefix
//! - JSON Lines sink output

use std::fs;

use serde_json::{json, Value};
use tagpack::schema::TagPackSchema;
use tagpack::storage::{
    label_norm_prefix, normalize_label, Ingestor, JsonlSink, MemorySink, Table,
};
use tagpack::tagpack::TagPack;
use tagpack::taxonomy::Taxonomy;
use tagpack::validation::Validator;
use tempfile::TempDir;

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
    label: Big Exchange
    category: exchange
"#;

fn read_jsonl(path: &std::path::Path) -> Vec<Value> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

#[test]
fn test_tagpack_records_in_memory() {
    let schema = TagPackSchema::from_yaml_str(SCHEMA, "ingest").unwrap();
    let pack = TagPack::from_yaml_str("http://example.com/", "packs/test.yaml", PACK).unwrap();
    let validated = Validator::new(&schema).admit(&pack).unwrap();

    let mut ingestor = Ingestor::new(MemorySink::new());
    ingestor.insert_tagpack(&validated).unwrap();
    let (sink, stats) = ingestor.finish().unwrap();
    assert_eq!(stats.tags, 2);

    let tagpacks = sink.table(Table::TagpackByUri);
    assert_eq!(
        tagpacks[0].clone().into_value(),
        json!({"uri": "http://example.com/packs/test.yaml", "title": "Test TagPack", "creator": "Dev"})
    );

    let by_address = sink.table(Table::TagByAddress);
    assert_eq!(
        by_address[0].clone().into_value(),
        json!({
            "tagpack_uri": "http://example.com/packs/test.yaml",
            "address": "abc",
            "label": "Foo Bar!",
            "lastmod": 86400,
        })
    );

    let by_category = sink.table(Table::TagByCategory);
    assert_eq!(by_category.len(), 1);
    assert_eq!(by_category[0].get("address"), Some(&json!("def")));

    let by_label = sink.table(Table::TagByLabel);
    assert_eq!(by_label[0].get("label_norm"), Some(&json!("foobar")));
    assert_eq!(by_label[0].get("label_norm_prefix"), Some(&json!("foo")));
    assert_eq!(by_label[1].get("label_norm"), Some(&json!("bigexchange")));
}

#[test]
fn test_label_norm_idempotent_and_prefixed() {
    for label in ["Foo Bar!", "__x__", "Ünïcode Label", "ab"] {
        let norm = normalize_label(label);
        assert_eq!(normalize_label(&norm), norm);
        assert!(norm.chars().all(|c| c.is_alphanumeric()));
        let prefix = label_norm_prefix(&norm);
        assert!(norm.starts_with(&prefix));
        assert_eq!(prefix.chars().count(), norm.chars().count().min(3));
    }
}

#[test]
fn test_jsonl_sink_output() {
    let dir = TempDir::new().unwrap();
    let schema = TagPackSchema::from_yaml_str(SCHEMA, "ingest").unwrap();
    let pack = TagPack::from_yaml_str("http://example.com", "test.yaml", PACK).unwrap();
    let validated = Validator::new(&schema).admit(&pack).unwrap();

    let mut taxonomy = Taxonomy::new("entity", "http://example.com/entity");
    taxonomy.add_concept("exchange", "Exchange", "Trading venue").unwrap();

    let mut ingestor = Ingestor::new(JsonlSink::open(dir.path()).unwrap());
    ingestor.insert_tagpack(&validated).unwrap();
    ingestor.insert_taxonomy(&taxonomy).unwrap();
    let (sink, _) = ingestor.finish().unwrap();

    assert_eq!(sink.written(Table::TagByAddress), 2);
    let labels = read_jsonl(&dir.path().join("tag_by_label.jsonl"));
    assert_eq!(labels.len(), 2);
    assert_eq!(labels[0]["lastmod"], json!(86400));

    let concepts = read_jsonl(&dir.path().join("concept_by_taxonomy_id.jsonl"));
    assert_eq!(
        concepts,
        vec![json!({
            "taxonomy": "entity",
            "id": "exchange",
            "uri": "http://example.com/entity/exchange",
            "label": "Exchange",
            "description": "Trading venue",
        })]
    );
    let taxonomies = read_jsonl(&dir.path().join("taxonomy_by_key.jsonl"));
    assert_eq!(taxonomies, vec![json!({"key": "entity", "uri": "http://example.com/entity"})]);
}
