//! # catalog-core
//!
//! Multi-index catalog orchestration.
//!
//! A [`Catalog`] owns a named, ordered set of indexes and fans document
//! updates out to all of them; queries name sub-queries per index and are
//! answered by smallest-first set intersection. Results come back as a
//! lazily resolved [`ResultSet`] bound to the identity registry.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use catalog_core::{field_index, Catalog, InMemoryIdRegistry, QueryMap, SearchOptions};
//! use catalog_types::{Document, Query, Record};
//!
//! let registry = Arc::new(InMemoryIdRegistry::new());
//! let mut catalog = Catalog::new(registry.clone());
//! catalog.add_index("name", field_index("name"));
//!
//! let doc: Arc<dyn Document> = Arc::new(Record::new().with("name", "bobo"));
//! let id = registry.register(doc.clone());
//! catalog.index_doc(id, doc.as_ref()).unwrap();
//!
//! let terms = QueryMap::from([("name".to_string(), Query::eq("bobo"))]);
//! let results = catalog
//!     .search_results(&terms, &SearchOptions::new())
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(results.len(), 1);
//! ```

pub mod attribute;
pub mod catalog;
pub mod error;
pub mod event;
pub mod registry;
pub mod result;
pub mod scope;

pub use attribute::AttributeIndex;
pub use catalog::{Catalog, CatalogIndex, QueryMap, SearchOptions};
pub use error::CatalogError;
pub use event::{EventRouter, LifecycleEvent, SharedCatalog};
pub use registry::InMemoryIdRegistry;
pub use result::ResultSet;
pub use scope::{located_within, FixedScope, Scope, ScopeResolver};

pub use catalog_text::TextIndexConfig;

use catalog_index::{FieldIndex, KeywordIndex};
use catalog_text::TextIndex;
use catalog_types::IndexError;

/// Field index over the plain attribute `name`.
pub fn field_index(name: &str) -> Box<dyn CatalogIndex> {
    Box::new(AttributeIndex::with_field(name, FieldIndex::new()))
}

/// Keyword index over the plain attribute `name`.
pub fn keyword_index(name: &str) -> Box<dyn CatalogIndex> {
    Box::new(AttributeIndex::with_field(name, KeywordIndex::new()))
}

/// Case-insensitive keyword index over the plain attribute `name`.
pub fn keyword_index_ci(name: &str) -> Box<dyn CatalogIndex> {
    Box::new(AttributeIndex::with_field(name, KeywordIndex::case_insensitive()))
}

/// Full-text index using the text defaults: the callable `searchable_text`
/// accessor behind the `searchable` capability.
pub fn text_index(config: TextIndexConfig) -> Result<Box<dyn CatalogIndex>, CatalogError> {
    let inner = TextIndex::open_or_create(config).map_err(IndexError::from)?;
    Ok(Box::new(AttributeIndex::from_defaults(inner)?))
}
