//! Taxonomy registry
//!
//! Taxonomies are external controlled vocabularies. Schema fields bound to a
//! taxonomy may only hold ids of that taxonomy's concepts.

mod errors;
mod loader;
mod registry;
mod types;

pub use errors::{TaxonomyError, TaxonomyResult};
pub use registry::TaxonomyRegistry;
pub use types::{Concept, Taxonomy};
