//! # catalog-types
//!
//! Shared contracts for the document catalog.
//!
//! This crate defines the types every other catalog crate builds on:
//! - `Document`: how cataloged objects expose their fields
//! - `Query` / `DocIdSet`: sub-query shapes and result sets
//! - `ValueIndex` / `SortableIndex`: the contract a value index satisfies
//! - `IdRegistry`: the identity registry consumed by the catalog
//! - Shared error types
//!
//! ## Usage
//!
//! ```rust
//! use catalog_types::{DocId, Query};
//! ```

pub mod document;
pub mod error;
pub mod index;
pub mod query;
pub mod registry;

pub use document::{Document, Record};
pub use error::{AccessError, IndexError, RegistryError};
pub use index::{FieldBinding, SortableIndex, ValueIndex};
pub use query::{DocId, DocIdSet, Query};
pub use registry::IdRegistry;
