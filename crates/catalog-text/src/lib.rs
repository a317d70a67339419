//! # catalog-text
//!
//! Full-text value index for the document catalog, backed by an embedded
//! Tantivy index.
//!
//! The index satisfies the synchronous catalog contract: every mutation is
//! committed immediately and the reader is reloaded before each search, so
//! a successful `index_value` is visible to the next `apply`.

pub mod error;
pub mod index;
pub mod schema;

pub use error::TextError;
pub use index::{TextIndex, TextIndexConfig};
pub use schema::{build_text_schema, TextSchema};
