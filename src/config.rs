//! Configuration
//!
//! Loaded once at startup from a YAML file and passed by reference to
//! everything that needs it:
//!
//! ```yaml
//! base_uri: https://github.com/graphsense/graphsense-tagpacks/packs
//! schema: tagpack_schema.yaml
//! category_field: category
//! categories: [exchange, miner]
//! taxonomies:
//!   entity: { uri: https://example.com/entity, path: taxonomies/entity.csv }
//! ```
//!
//! Relative paths are resolved against the directory of the config file.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::observability::Event;
use crate::schema::{SchemaError, TagPackSchema};
use crate::taxonomy::{Taxonomy, TaxonomyError, TaxonomyRegistry};
use crate::validation::{CategoryField, CategoryVocabulary};

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Taxonomy(#[from] TaxonomyError),
}

/// Where a taxonomy's concept feed is read from
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaxonomySource {
    /// Taxonomy URI; concept URIs are derived from it by the feed
    pub uri: String,
    /// Local CSV file with `id,uri,label,description` rows
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Prefix of every TagPack URI
    pub base_uri: String,

    /// Schema definition file (optional, built-in schema otherwise)
    #[serde(default)]
    pub schema: Option<PathBuf>,

    /// Key checked by the category vocabulary guard
    #[serde(default = "default_category_field")]
    pub category_field: String,

    /// Allowed categories (optional, guard disabled otherwise)
    #[serde(default)]
    pub categories: Option<Vec<String>>,

    /// Taxonomy sources by key
    #[serde(default)]
    pub taxonomies: IndexMap<String, TaxonomySource>,

    /// Directory relative paths resolve against
    #[serde(skip)]
    root: PathBuf,
}

fn default_category_field() -> String {
    CategoryField::default().key().to_string()
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let root = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let config = Self::from_yaml_str(&content, &root)?;

        info!(
            event = %Event::ConfigLoaded,
            path = %path.display(),
            taxonomies = config.taxonomies.len(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Parses configuration text; relative paths resolve against `root`.
    pub fn from_yaml_str(source: &str, root: &Path) -> ConfigResult<Self> {
        let mut config: Config = serde_yaml::from_str(source)?;
        config.root = root.to_path_buf();
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.base_uri.trim().is_empty() {
            return Err(ConfigError::Invalid("base_uri must not be empty".into()));
        }

        self.category_field()?;

        if let Some(categories) = &self.categories {
            if categories.iter().any(|c| c.trim().is_empty()) {
                return Err(ConfigError::Invalid(
                    "categories must not contain empty entries".into(),
                ));
            }
        }

        for (key, source) in &self.taxonomies {
            if key.trim().is_empty() {
                return Err(ConfigError::Invalid("taxonomy key must not be empty".into()));
            }
            if source.uri.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "taxonomy {} has an empty uri",
                    key
                )));
            }
        }

        Ok(())
    }

    /// Parsed `category_field`
    pub fn category_field(&self) -> ConfigResult<CategoryField> {
        CategoryField::parse(&self.category_field).ok_or_else(|| {
            ConfigError::Invalid(format!(
                "Invalid category_field: '{}'. Must be 'category' or 'categories'.",
                self.category_field
            ))
        })
    }

    /// Resolves a configured path against the config file's directory
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Loads the configured schema, or the built-in one.
    pub fn load_schema(&self) -> ConfigResult<TagPackSchema> {
        let schema = match &self.schema {
            Some(path) => TagPackSchema::load(&self.resolve(path))?,
            None => TagPackSchema::builtin()?,
        };

        info!(
            event = %Event::SchemaLoaded,
            definition = schema.definition(),
            header_fields = schema.header_fields().len(),
            tag_fields = schema.tag_fields().len(),
            "Schema loaded"
        );
        Ok(schema)
    }

    /// The category vocabulary, if `categories` is configured.
    pub fn category_vocabulary(&self) -> ConfigResult<Option<CategoryVocabulary>> {
        let Some(categories) = &self.categories else {
            return Ok(None);
        };
        let field = self.category_field()?;
        Ok(Some(CategoryVocabulary::new(field, categories.iter())))
    }

    /// Reads every configured taxonomy into a registry.
    pub fn load_taxonomies(&self) -> ConfigResult<TaxonomyRegistry> {
        let mut registry = TaxonomyRegistry::new();
        for (key, source) in &self.taxonomies {
            let path = self.resolve(&source.path);
            let taxonomy = Taxonomy::from_csv_file(key.clone(), source.uri.clone(), &path)?;

            info!(
                event = %Event::TaxonomyLoaded,
                taxonomy = key.as_str(),
                concepts = taxonomy.len(),
                path = %path.display(),
                "Taxonomy loaded"
            );
            registry.insert(taxonomy)?;
        }
        Ok(registry)
    }
}
