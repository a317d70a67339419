//! Catalog error types.

use thiserror::Error;

use catalog_types::{AccessError, IndexError, RegistryError};

/// Errors raised by catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A query or update referenced an index name the catalog does not hold
    #[error("no such index: {0}")]
    NoSuchIndex(String),

    /// Sorted retrieval was requested against an index without sort support
    #[error("index '{0}' does not support sorting")]
    NotSortable(String),

    /// An attribute index was built without a field name and the underlying
    /// index declares no default
    #[error("a field name is required")]
    MissingFieldName,

    /// A shared catalog lock was poisoned
    #[error("catalog is locked: {0}")]
    Locked(String),

    /// Error from a value index
    #[error("index error: {0}")]
    Index(#[from] IndexError),

    /// A derived-field accessor failed while extracting a value
    #[error("extraction failed: {0}")]
    Access(#[from] AccessError),

    /// Error from the identity registry
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),
}
