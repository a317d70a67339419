//! In-memory identity registry.
//!
//! Identifier assignment is owned by the registry, never by the catalog.
//! This implementation keys object identity by `Arc` pointer, which matches
//! the single-process, request-scoped execution model the catalog targets.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use catalog_types::{DocId, Document, IdRegistry, RegistryError};

#[derive(Default)]
struct RegistryState {
    ids: HashMap<usize, DocId>,
    objects: HashMap<DocId, Arc<dyn Document>>,
    last_id: DocId,
}

/// Registry mapping documents to monotonically assigned identifiers,
/// starting at 1.
#[derive(Default)]
pub struct InMemoryIdRegistry {
    state: RwLock<RegistryState>,
}

fn identity(doc: &Arc<dyn Document>) -> usize {
    Arc::as_ptr(doc) as *const () as usize
}

impl InMemoryIdRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // The state is updated atomically under the lock; a poisoned guard
    // still holds consistent data, so recover instead of propagating.
    fn read(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a document, assigning the next identifier. Registering the
    /// same document again returns its existing identifier.
    pub fn register(&self, doc: Arc<dyn Document>) -> DocId {
        let mut state = self.write();
        let key = identity(&doc);
        if let Some(id) = state.ids.get(&key) {
            return *id;
        }
        state.last_id += 1;
        let id = state.last_id;
        state.ids.insert(key, id);
        state.objects.insert(id, doc);
        debug!(id, "registered document");
        id
    }

    /// Drop a document from the registry, returning its released
    /// identifier.
    pub fn unregister(&self, doc: &Arc<dyn Document>) -> Option<DocId> {
        let mut state = self.write();
        let id = state.ids.remove(&identity(doc))?;
        state.objects.remove(&id);
        debug!(id, "unregistered document");
        Some(id)
    }

    /// Number of registered documents.
    pub fn len(&self) -> usize {
        self.read().objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().objects.is_empty()
    }
}

impl IdRegistry for InMemoryIdRegistry {
    fn get_id(&self, doc: &Arc<dyn Document>) -> Result<DocId, RegistryError> {
        self.read()
            .ids
            .get(&identity(doc))
            .copied()
            .ok_or(RegistryError::UnregisteredObject)
    }

    fn query_id(&self, doc: &Arc<dyn Document>) -> Option<DocId> {
        self.read().ids.get(&identity(doc)).copied()
    }

    fn get_object(&self, id: DocId) -> Result<Arc<dyn Document>, RegistryError> {
        self.read()
            .objects
            .get(&id)
            .cloned()
            .ok_or(RegistryError::UnknownId(id))
    }

    fn entries(&self) -> Vec<(DocId, Arc<dyn Document>)> {
        let mut entries: Vec<_> = self
            .read()
            .objects
            .iter()
            .map(|(id, doc)| (*id, Arc::clone(doc)))
            .collect();
        entries.sort_by_key(|(id, _)| *id);
        entries
    }
}
