//! Registry of taxonomies by key
//!
//! Built once before validation and shared read-only afterwards.

use std::collections::HashSet;

use indexmap::IndexMap;

use super::errors::{TaxonomyError, TaxonomyResult};
use super::types::{Concept, Taxonomy};

#[derive(Debug, Clone, Default)]
pub struct TaxonomyRegistry {
    taxonomies: IndexMap<String, Taxonomy>,
}

impl TaxonomyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a taxonomy under its key
    pub fn insert(&mut self, taxonomy: Taxonomy) -> TaxonomyResult<()> {
        if self.taxonomies.contains_key(taxonomy.key()) {
            return Err(TaxonomyError::DuplicateTaxonomy(taxonomy.key().to_string()));
        }
        self.taxonomies.insert(taxonomy.key().to_string(), taxonomy);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&Taxonomy> {
        self.taxonomies.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.taxonomies.contains_key(key)
    }

    /// Concept ids of a taxonomy, `None` if the key is unknown
    pub fn concept_ids(&self, key: &str) -> Option<HashSet<&str>> {
        self.get(key).map(Taxonomy::concept_ids)
    }

    /// Adds a concept to a registered taxonomy.
    pub fn add_concept(
        &mut self,
        key: &str,
        id: impl Into<String>,
        label: impl Into<String>,
        description: impl Into<String>,
    ) -> TaxonomyResult<&Concept> {
        self.taxonomies
            .get_mut(key)
            .ok_or_else(|| TaxonomyError::UnknownTaxonomy(key.to_string()))?
            .add_concept(id, label, description)
    }

    /// Taxonomies in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Taxonomy> {
        self.taxonomies.values()
    }

    pub fn len(&self) -> usize {
        self.taxonomies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taxonomies.is_empty()
    }
}
