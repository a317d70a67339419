//! Identity registry contract.
//!
//! Identifier assignment is owned by an external registry; the catalog only
//! consumes this interface and propagates any error it raises.

use std::sync::Arc;

use crate::document::Document;
use crate::error::RegistryError;
use crate::query::DocId;

/// Maps documents to stable identifiers and back.
pub trait IdRegistry: Send + Sync {
    /// Resolve a registered document to its identifier. Errors if the
    /// document was never registered.
    fn get_id(&self, doc: &Arc<dyn Document>) -> Result<DocId, RegistryError>;

    /// Resolve a document to its identifier without failing.
    fn query_id(&self, doc: &Arc<dyn Document>) -> Option<DocId>;

    /// Resolve an identifier back to its document.
    fn get_object(&self, id: DocId) -> Result<Arc<dyn Document>, RegistryError>;

    /// Snapshot of every (identifier, document) pair the registry holds.
    fn entries(&self) -> Vec<(DocId, Arc<dyn Document>)>;
}
