//! Contracts satisfied by every value index usable from a catalog.

use serde_json::Value;

use crate::error::IndexError;
use crate::query::{DocId, DocIdSet, Query};

/// How an attribute wrapper resolves the value a document contributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldBinding {
    /// Name of the field (or accessor) to read.
    pub field_name: String,
    /// Capability the document is adapted to before the field is read.
    pub capability: Option<String>,
    /// Invoke the field as an accessor instead of reading it directly.
    pub callable: bool,
}

impl FieldBinding {
    /// Bind to the plain field `name`.
    pub fn field(name: impl Into<String>) -> Self {
        Self {
            field_name: name.into(),
            capability: None,
            callable: false,
        }
    }

    /// Bind to the accessor `name`, invoked to obtain the value.
    pub fn callable(name: impl Into<String>) -> Self {
        Self {
            field_name: name.into(),
            capability: None,
            callable: true,
        }
    }

    /// Adapt documents to `capability` before reading the field.
    pub fn via(mut self, capability: impl Into<String>) -> Self {
        self.capability = Some(capability.into());
        self
    }
}

/// A single index over extracted field values.
///
/// Implementations hold postings keyed by document identifier: after
/// `unindex_value(id)` no posting for `id` remains, and `index_value`
/// replaces any prior value held for the document.
pub trait ValueIndex: Send {
    /// Store `value` for `id`, replacing any prior posting.
    fn index_value(&mut self, id: DocId, value: &Value) -> Result<(), IndexError>;

    /// Drop every posting for `id`. Unindexing an unknown id is a no-op.
    fn unindex_value(&mut self, id: DocId) -> Result<(), IndexError>;

    /// Drop all postings.
    fn clear(&mut self) -> Result<(), IndexError>;

    /// Answer a sub-query.
    ///
    /// `Ok(None)` means the index has nothing to say about this query and
    /// must be skipped by the caller; an empty set is a definitive miss.
    fn apply(&self, query: &Query) -> Result<Option<DocIdSet>, IndexError>;

    /// Sorting support, if this index kind orders its postings.
    fn sortable(&self) -> Option<&dyn SortableIndex> {
        None
    }

    /// Construction defaults contributed by this index kind.
    fn default_binding(&self) -> Option<FieldBinding> {
        None
    }
}

/// Ordering support over a result set.
pub trait SortableIndex {
    /// Order `ids` by indexed value. Reversal is applied before the limit;
    /// ids the index holds no posting for are omitted.
    fn sort(
        &self,
        ids: &DocIdSet,
        limit: Option<usize>,
        reverse: bool,
    ) -> Result<Vec<DocId>, IndexError>;
}
