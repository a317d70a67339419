//! # catalog-index
//!
//! In-memory value indexes for the document catalog:
//! - [`FieldIndex`]: one ordered scalar per document, with exact and range
//!   lookups plus value-ordered sorting
//! - [`KeywordIndex`]: a keyword set per document, with any-of/all-of
//!   lookups and an optional case-insensitive mode
//!
//! Both implement the [`ValueIndex`](catalog_types::ValueIndex) contract and
//! are normally wrapped in an attribute index by catalog-core.

pub mod field;
pub mod key;
pub mod keyword;

pub use field::FieldIndex;
pub use key::IndexKey;
pub use keyword::KeywordIndex;
