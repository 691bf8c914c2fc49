//! Taxonomies and their concepts

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use super::errors::{TaxonomyError, TaxonomyResult};

/// One entry of a taxonomy.
///
/// `taxonomy` refers to the owning taxonomy by key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Concept {
    pub taxonomy: String,
    pub id: String,
    pub uri: String,
    pub label: String,
    pub description: String,
}

impl fmt::Display for Concept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{} | {} | {} | {} | {}]",
            self.taxonomy, self.id, self.uri, self.label, self.description
        )
    }
}

/// A controlled vocabulary identified by a key.
///
/// Concept ids are unique within a taxonomy; concepts keep insertion order.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    key: String,
    uri: String,
    concepts: Vec<Concept>,
    ids: HashSet<String>,
}

impl Taxonomy {
    pub fn new(key: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            uri: uri.into(),
            concepts: Vec::new(),
            ids: HashSet::new(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn concepts(&self) -> &[Concept] {
        &self.concepts
    }

    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    /// Set of concept ids
    pub fn concept_ids(&self) -> HashSet<&str> {
        self.ids.iter().map(String::as_str).collect()
    }

    /// Membership test on concept ids
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Adds a concept whose URI is derived as `<taxonomy uri>/<id>`.
    pub fn add_concept(
        &mut self,
        id: impl Into<String>,
        label: impl Into<String>,
        description: impl Into<String>,
    ) -> TaxonomyResult<&Concept> {
        let id = id.into();
        let uri = format!("{}/{}", self.uri, id);
        self.push_concept(id, uri, label.into(), description.into())
    }

    /// Adds a concept with an explicit URI, as read from a concept feed.
    pub fn push_concept(
        &mut self,
        id: String,
        uri: String,
        label: String,
        description: String,
    ) -> TaxonomyResult<&Concept> {
        if !self.ids.insert(id.clone()) {
            return Err(TaxonomyError::DuplicateConcept {
                taxonomy: self.key.clone(),
                id,
            });
        }
        self.concepts.push(Concept {
            taxonomy: self.key.clone(),
            id,
            uri,
            label,
            description,
        });
        Ok(&self.concepts[self.concepts.len() - 1])
    }
}

impl fmt::Display for Taxonomy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} | {}]", self.key, self.uri)
    }
}
