//! Shared error types.

use thiserror::Error;

use crate::query::DocId;

/// Errors raised by value indexes.
#[derive(Debug, Error)]
pub enum IndexError {
    /// The index does not understand this query shape
    #[error("unsupported query: {0}")]
    UnsupportedQuery(String),

    /// The extracted value cannot be stored by this index
    #[error("unsupported value: {0}")]
    UnsupportedValue(String),

    /// Failure in an index backend
    #[error("index backend error: {0}")]
    Backend(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Errors raised by the identity registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The document was never registered
    #[error("object is not registered")]
    UnregisteredObject,

    /// No document is registered under this identifier
    #[error("no object registered for id {0}")]
    UnknownId(DocId),
}

/// A failing derived-field accessor.
///
/// Never swallowed during indexing: the error reaches the caller of
/// `index_doc` unmodified.
#[derive(Debug, Error)]
#[error("accessor '{field}' failed: {message}")]
pub struct AccessError {
    /// Name of the accessor that failed
    pub field: String,
    /// What went wrong
    pub message: String,
}

impl AccessError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}
