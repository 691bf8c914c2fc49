//! Configuration Loading Tests
//!
//! - Config files resolve schema and taxonomy paths relative to themselves
//! - Invalid configuration is fatal with a config error code
//! - A config without taxonomies skips taxonomy checks

use std::fs;

use tagpack::cli::{validate, CliErrorCode};
use tagpack::config::{Config, ConfigError};
use tagpack::schema::SchemaErrorCode;
use tempfile::TempDir;

const SCHEMA: &str = r#"
header:
  title: {type: text, mandatory: true}
  tags: {type: list, mandatory: true}
tag:
  address: {type: text, mandatory: true}
  category: {type: text, mandatory: false, taxonomy: entity}
"#;

fn write_workspace(config: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("conf")).unwrap();
    fs::write(dir.path().join("conf/schema.yaml"), SCHEMA).unwrap();
    fs::write(
        dir.path().join("conf/entity.csv"),
        "id,uri,label,description\nexchange,http://example.com/entity/exchange,Exchange,\n",
    )
    .unwrap();
    fs::write(dir.path().join("conf/config.yaml"), config).unwrap();
    dir
}

#[test]
fn test_config_resolves_relative_paths() {
    let dir = write_workspace(
        "base_uri: http://example.com\n\
         schema: schema.yaml\n\
         categories: [exchange]\n\
         taxonomies:\n\
         \x20 entity: {uri: http://example.com/entity, path: entity.csv}\n",
    );
    let config = Config::load(&dir.path().join("conf/config.yaml")).unwrap();

    let schema = config.load_schema().unwrap();
    assert!(schema.is_tag_field("category"));
    assert!(!schema.is_declared("creator"));

    let registry = config.load_taxonomies().unwrap();
    assert!(registry.get("entity").unwrap().contains("exchange"));
}

#[test]
fn test_unsupported_schema_type_is_fatal() {
    let dir = write_workspace("base_uri: http://example.com\nschema: bad.yaml\n");
    fs::write(
        dir.path().join("conf/bad.yaml"),
        "header:\n  title: {type: number, mandatory: true}\ntag: {}\n",
    )
    .unwrap();

    let config = Config::load(&dir.path().join("conf/config.yaml")).unwrap();
    match config.load_schema().unwrap_err() {
        ConfigError::Schema(e) => {
            assert_eq!(e.code(), SchemaErrorCode::UnsupportedType);
            assert!(e.is_fatal());
        }
        other => panic!("unexpected error {}", other),
    }
}

#[test]
fn test_validate_command_stops_on_bad_config() {
    let dir = write_workspace("base_uri: http://example.com\ncategory_field: kind\n");
    let pack = dir.path().join("pack.yaml");
    fs::write(&pack, "title: T\ntags:\n  - address: a\n").unwrap();

    let mut out = Vec::new();
    let err = validate(&dir.path().join("conf/config.yaml"), &[pack], false, &mut out).unwrap_err();
    assert_eq!(err.code(), &CliErrorCode::ConfigError);
    assert!(out.is_empty());
}

#[test]
fn test_validate_command_with_config_schema() {
    let dir = write_workspace(
        "base_uri: http://example.com\n\
         schema: schema.yaml\n\
         taxonomies:\n\
         \x20 entity: {uri: http://example.com/entity, path: entity.csv}\n",
    );
    let good = dir.path().join("good.yaml");
    let bad = dir.path().join("bad.yaml");
    fs::write(&good, "title: T\ntags:\n  - address: a\n    category: exchange\n").unwrap();
    fs::write(&bad, "title: T\ntags:\n  - address: a\n    category: mixer\n").unwrap();

    let mut out = Vec::new();
    let err = validate(
        &dir.path().join("conf/config.yaml"),
        &[good.clone(), bad.clone()],
        false,
        &mut out,
    )
    .unwrap_err();
    assert_eq!(err.code(), &CliErrorCode::BatchFailed);

    let output = String::from_utf8(out).unwrap();
    assert!(output.contains(&format!("PASS {}", good.display())));
    assert!(output.contains(&format!("FAIL {}:", bad.display())));
}

#[test]
fn test_validate_command_without_configured_taxonomies() {
    let dir = write_workspace("base_uri: http://example.com\nschema: schema.yaml\n");
    let good = dir.path().join("good.yaml");
    fs::write(&good, "title: T\ntags:\n  - address: a\n    category: mixer\n").unwrap();

    let mut out = Vec::new();
    validate(&dir.path().join("conf/config.yaml"), &[good.clone()], false, &mut out).unwrap();

    let output = String::from_utf8(out).unwrap();
    assert!(output.contains(&format!("PASS {}", good.display())));
}

#[test]
fn test_shipped_config_loads() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("conf/config.yaml");
    let config = Config::load(&path).unwrap();

    let registry = config.load_taxonomies().unwrap();
    assert!(registry.get("entity").unwrap().contains("exchange"));
    assert!(registry.get("abuse").unwrap().contains("ransomware"));

    let vocabulary = config.category_vocabulary().unwrap().unwrap();
    assert!(vocabulary.contains("miner"));

    let schema = config.load_schema().unwrap();
    assert!(schema.is_header_field("title"));
}
