//! Category vocabulary guard
//!
//! A flat list of allowed category literals from configuration. Every key
//! named like the configured category field, at any depth of the document
//! and inside each tag, must hold a value from this list. This runs
//! independently of taxonomy bindings in the schema, so a value can pass one
//! check and fail the other when the two vocabularies diverge.

use std::fmt;

use indexmap::IndexSet;

use crate::tagpack::{FieldMap, FieldValue};

/// Name of the key the guard inspects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryField {
    /// Single-valued `category`
    #[default]
    Category,
    /// Multi-valued `categories`
    Categories,
}

impl CategoryField {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "category" => Some(CategoryField::Category),
            "categories" => Some(CategoryField::Categories),
            _ => None,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            CategoryField::Category => "category",
            CategoryField::Categories => "categories",
        }
    }
}

impl fmt::Display for CategoryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// A category value outside the vocabulary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryViolation {
    /// Path to the offending key, e.g. `tags[1].category`
    pub path: String,
    pub value: String,
}

#[derive(Debug, Clone, Default)]
pub struct CategoryVocabulary {
    field: CategoryField,
    categories: IndexSet<String>,
}

impl CategoryVocabulary {
    pub fn new<I, S>(field: CategoryField, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            field,
            categories: categories.into_iter().map(Into::into).collect(),
        }
    }

    pub fn field(&self) -> CategoryField {
        self.field
    }

    pub fn contains(&self, category: &str) -> bool {
        self.categories.contains(category)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Returns the first category value not in the vocabulary, in document
    /// order.
    pub fn find_violation(&self, document: &FieldMap) -> Option<CategoryViolation> {
        self.scan_map(document, "")
    }

    fn scan_map(&self, map: &FieldMap, prefix: &str) -> Option<CategoryViolation> {
        for (key, value) in map {
            let path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{}.{}", prefix, key)
            };

            if key == self.field.key() {
                if let Some(violation) = self.check_value(value, &path) {
                    return Some(violation);
                }
            }

            let nested = match value {
                FieldValue::Map(inner) => self.scan_map(inner, &path),
                FieldValue::List(items) => items.iter().enumerate().find_map(|(i, item)| {
                    item.as_map()
                        .and_then(|inner| self.scan_map(inner, &format!("{}[{}]", path, i)))
                }),
                _ => None,
            };
            if nested.is_some() {
                return nested;
            }
        }
        None
    }

    fn check_value(&self, value: &FieldValue, path: &str) -> Option<CategoryViolation> {
        match value {
            FieldValue::Map(_) => None,
            FieldValue::List(items) => items.iter().enumerate().find_map(|(i, item)| {
                self.check_value(item, &format!("{}[{}]", path, i))
            }),
            FieldValue::Text(s) if self.contains(s) => None,
            other => Some(CategoryViolation {
                path: path.to_string(),
                value: other.to_string(),
            }),
        }
    }
}
