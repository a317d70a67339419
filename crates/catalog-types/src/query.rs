//! Query shapes and result-set types shared by all indexes.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stable document identifier, assigned exclusively by the identity
/// registry. The catalog never generates identifiers of its own.
pub type DocId = u64;

/// Deduplicated, order-independent set of document identifiers.
///
/// `Option<DocIdSet>` carries a three-way distinction throughout the
/// catalog: `None` means "not applicable", `Some` of an empty set means
/// "definitively zero matches". Collapsing the two changes query semantics.
pub type DocIdSet = BTreeSet<DocId>;

/// A sub-query dispatched to a single named index.
///
/// Each index kind supports the shapes it understands and rejects the rest
/// with [`IndexError::UnsupportedQuery`](crate::error::IndexError).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Query {
    /// Exact value match.
    Eq(Value),
    /// Inclusive range over indexed values. An open bound is `None`.
    Range {
        min: Option<Value>,
        max: Option<Value>,
    },
    /// Documents holding at least one of the keywords.
    AnyOf(Vec<String>),
    /// Documents holding every one of the keywords.
    AllOf(Vec<String>),
    /// Full-text query string.
    Text(String),
}

impl Query {
    /// Exact match on `value`.
    pub fn eq(value: impl Into<Value>) -> Self {
        Query::Eq(value.into())
    }

    /// Inclusive range between two optional bounds.
    pub fn range(min: Option<impl Into<Value>>, max: Option<impl Into<Value>>) -> Self {
        Query::Range {
            min: min.map(Into::into),
            max: max.map(Into::into),
        }
    }

    /// Documents holding at least one of `words`.
    pub fn any_of<S: Into<String>>(words: impl IntoIterator<Item = S>) -> Self {
        Query::AnyOf(words.into_iter().map(Into::into).collect())
    }

    /// Documents holding every one of `words`.
    pub fn all_of<S: Into<String>>(words: impl IntoIterator<Item = S>) -> Self {
        Query::AllOf(words.into_iter().map(Into::into).collect())
    }

    /// Full-text query.
    pub fn text(query: impl Into<String>) -> Self {
        Query::Text(query.into())
    }
}
