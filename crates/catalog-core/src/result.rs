//! Lazily resolved search results.

use std::fmt;
use std::sync::Arc;

use catalog_types::{DocId, Document, IdRegistry, RegistryError};

/// An ordered sequence of matching identifiers, resolved to documents only
/// on iteration.
///
/// Every iteration resolves through the registry again; results are never
/// cached, since the underlying objects may have changed. A registry that
/// no longer holds an identifier surfaces as an `Err` item.
pub struct ResultSet {
    ids: Vec<DocId>,
    registry: Arc<dyn IdRegistry>,
}

impl ResultSet {
    pub fn new(ids: Vec<DocId>, registry: Arc<dyn IdRegistry>) -> Self {
        Self { ids, registry }
    }

    /// Number of matches. No resolution is performed.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The matching identifiers, in result order.
    pub fn ids(&self) -> &[DocId] {
        &self.ids
    }

    /// Resolve each identifier to its document, lazily.
    pub fn iter(
        &self,
    ) -> impl Iterator<Item = Result<Arc<dyn Document>, RegistryError>> + '_ {
        self.ids.iter().map(|id| self.registry.get_object(*id))
    }
}

impl fmt::Debug for ResultSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultSet").field("ids", &self.ids).finish()
    }
}
