//! Text index error types.

use thiserror::Error;

use catalog_types::IndexError;

/// Errors that can occur in the full-text index.
#[derive(Debug, Error)]
pub enum TextError {
    /// Tantivy index error
    #[error("tantivy error: {0}")]
    Tantivy(#[from] tantivy::TantivyError),

    /// Query parse error
    #[error("query parse error: {0}")]
    QueryParse(#[from] tantivy::query::QueryParserError),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Schema mismatch in a reopened index
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    /// Index writer is locked (a writer thread panicked)
    #[error("index writer is locked: {0}")]
    WriterLocked(String),
}

impl From<TextError> for IndexError {
    fn from(err: TextError) -> Self {
        IndexError::Backend(Box::new(err))
    }
}
