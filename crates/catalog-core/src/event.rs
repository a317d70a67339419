//! Lifecycle event routing into catalogs.
//!
//! The owning application delivers added/modified/removed notifications;
//! the router turns them into catalog updates. Additions resolve
//! identifiers strictly (an unregistered document is an error, since the
//! registry must have seen it first); modifications and removals use the
//! tolerant lookup and silently skip catalogs that do not know the
//! document.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use catalog_types::Document;

use crate::catalog::Catalog;
use crate::error::CatalogError;

/// A shared, lockable catalog handle.
pub type SharedCatalog = Arc<Mutex<Catalog>>;

/// Object lifecycle notifications delivered by the owning application.
#[derive(Clone)]
pub enum LifecycleEvent {
    /// The document was added and registered with the identity registry.
    Added(Arc<dyn Document>),
    /// The document's content changed.
    Modified(Arc<dyn Document>),
    /// The document is being removed.
    Removed(Arc<dyn Document>),
}

/// Routes lifecycle events to a set of catalogs.
#[derive(Default)]
pub struct EventRouter {
    catalogs: Vec<SharedCatalog>,
}

impl EventRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a catalog to receive routed events.
    pub fn register(&mut self, catalog: SharedCatalog) {
        self.catalogs.push(catalog);
    }

    /// Single entry point for an external notification dispatcher.
    pub fn dispatch(&self, event: &LifecycleEvent) -> Result<(), CatalogError> {
        match event {
            LifecycleEvent::Added(doc) => self.on_added(doc),
            LifecycleEvent::Modified(doc) => self.on_modified(doc),
            LifecycleEvent::Removed(doc) => self.on_removed(doc),
        }
    }

    fn lock(catalog: &SharedCatalog) -> Result<MutexGuard<'_, Catalog>, CatalogError> {
        catalog.lock().map_err(|e| CatalogError::Locked(e.to_string()))
    }

    /// Index a newly added document into every registered catalog.
    pub fn on_added(&self, doc: &Arc<dyn Document>) -> Result<(), CatalogError> {
        if !doc.auto_index() {
            debug!("document opted out of auto-indexing");
            return Ok(());
        }
        for catalog in &self.catalogs {
            let mut catalog = Self::lock(catalog)?;
            let id = catalog.registry().get_id(doc)?;
            catalog.index_doc(id, doc.as_ref())?;
        }
        Ok(())
    }

    /// Reindex a modified document wherever it is known.
    pub fn on_modified(&self, doc: &Arc<dyn Document>) -> Result<(), CatalogError> {
        if !doc.auto_reindex() {
            debug!("document opted out of auto-reindexing");
            return Ok(());
        }
        for catalog in &self.catalogs {
            let mut catalog = Self::lock(catalog)?;
            if let Some(id) = catalog.registry().query_id(doc) {
                catalog.index_doc(id, doc.as_ref())?;
            }
        }
        Ok(())
    }

    /// Unindex a removed document wherever it is known.
    pub fn on_removed(&self, doc: &Arc<dyn Document>) -> Result<(), CatalogError> {
        for catalog in &self.catalogs {
            let mut catalog = Self::lock(catalog)?;
            if let Some(id) = catalog.registry().query_id(doc) {
                catalog.unindex_doc(id)?;
            }
        }
        Ok(())
    }

    /// Backfill a newly attached index. New indexes start empty and must be
    /// brought up to date against the already-registered documents.
    pub fn on_index_added(
        &self,
        catalog: &SharedCatalog,
        name: &str,
    ) -> Result<usize, CatalogError> {
        Self::lock(catalog)?.update_index(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::InMemoryIdRegistry;
    use crate::{field_index, QueryMap};
    use catalog_types::{DocId, DocIdSet, IdRegistry, Query, Record};

    struct OptedOut;

    impl Document for OptedOut {
        fn field(&self, _name: &str) -> Option<serde_json::Value> {
            None
        }

        fn auto_index(&self) -> bool {
            false
        }

        fn auto_reindex(&self) -> bool {
            false
        }
    }

    fn setup() -> (Arc<InMemoryIdRegistry>, SharedCatalog, EventRouter) {
        let registry = Arc::new(InMemoryIdRegistry::new());
        let mut catalog = Catalog::new(Arc::clone(&registry) as Arc<dyn IdRegistry>);
        catalog.add_index("name", field_index("name"));
        let catalog = Arc::new(Mutex::new(catalog));
        let mut router = EventRouter::new();
        router.register(Arc::clone(&catalog));
        (registry, catalog, router)
    }

    fn name_query(name: &str) -> QueryMap {
        QueryMap::from([("name".to_string(), Query::eq(name))])
    }

    fn apply(catalog: &SharedCatalog, terms: &QueryMap) -> Option<DocIdSet> {
        catalog.lock().unwrap().apply(terms).unwrap()
    }

    fn ids(items: &[DocId]) -> DocIdSet {
        items.iter().copied().collect()
    }

    #[test]
    fn test_on_added_indexes_registered_document() {
        let (registry, catalog, router) = setup();
        let doc: Arc<dyn Document> = Arc::new(Record::new().with("name", "bobo"));
        let id = registry.register(Arc::clone(&doc));

        router.on_added(&doc).unwrap();
        assert_eq!(apply(&catalog, &name_query("bobo")), Some(ids(&[id])));
    }

    #[test]
    fn test_on_added_unregistered_document_errors() {
        let (_registry, _catalog, router) = setup();
        let doc: Arc<dyn Document> = Arc::new(Record::new().with("name", "bobo"));

        let err = router.on_added(&doc).unwrap_err();
        assert!(matches!(err, CatalogError::Registry(_)));
    }

    #[test]
    fn test_on_added_respects_opt_out() {
        let (registry, catalog, router) = setup();
        let doc: Arc<dyn Document> = Arc::new(OptedOut);
        registry.register(Arc::clone(&doc));

        router.on_added(&doc).unwrap();
        // nothing was indexed; no index applied means a definitive miss
        assert_eq!(apply(&catalog, &name_query("anything")), Some(DocIdSet::new()));
    }

    /// Document with a mutable name, for modify-in-place scenarios.
    struct Renamable {
        name: std::sync::Mutex<String>,
    }

    impl Renamable {
        fn new(name: &str) -> Self {
            Self {
                name: std::sync::Mutex::new(name.to_string()),
            }
        }

        fn rename(&self, name: &str) {
            *self.name.lock().unwrap() = name.to_string();
        }
    }

    impl Document for Renamable {
        fn field(&self, name: &str) -> Option<serde_json::Value> {
            (name == "name").then(|| serde_json::Value::String(self.name.lock().unwrap().clone()))
        }
    }

    #[test]
    fn test_on_modified_reindexes_known_document() {
        let (registry, catalog, router) = setup();
        let inner = Arc::new(Renamable::new("bobo"));
        let doc: Arc<dyn Document> = Arc::clone(&inner) as Arc<dyn Document>;
        let id = registry.register(Arc::clone(&doc));
        router.on_added(&doc).unwrap();

        inner.rename("bubbles");
        router.on_modified(&doc).unwrap();

        assert_eq!(apply(&catalog, &name_query("bubbles")), Some(ids(&[id])));
        assert_eq!(apply(&catalog, &name_query("bobo")), Some(DocIdSet::new()));
    }

    #[test]
    fn test_on_modified_skips_unknown_document() {
        let (_registry, catalog, router) = setup();
        let doc: Arc<dyn Document> = Arc::new(Record::new().with("name", "ghost"));

        // tolerant lookup: no error, no indexing
        router.on_modified(&doc).unwrap();
        assert_eq!(apply(&catalog, &name_query("ghost")), Some(DocIdSet::new()));
    }

    #[test]
    fn test_on_removed_unindexes_known_document() {
        let (registry, catalog, router) = setup();
        let doc: Arc<dyn Document> = Arc::new(Record::new().with("name", "bobo"));
        registry.register(Arc::clone(&doc));
        router.on_added(&doc).unwrap();

        router.on_removed(&doc).unwrap();
        assert_eq!(apply(&catalog, &name_query("bobo")), Some(DocIdSet::new()));
    }

    #[test]
    fn test_on_removed_skips_unknown_document() {
        let (_registry, _catalog, router) = setup();
        let doc: Arc<dyn Document> = Arc::new(Record::new());
        router.on_removed(&doc).unwrap();
    }

    #[test]
    fn test_on_index_added_backfills() {
        let (registry, catalog, router) = setup();
        for name in ["bobo", "bubbles"] {
            let doc: Arc<dyn Document> = Arc::new(Record::new().with("name", name));
            registry.register(doc);
        }

        catalog
            .lock()
            .unwrap()
            .add_index("late", field_index("name"));
        let count = router.on_index_added(&catalog, "late").unwrap();
        assert_eq!(count, 2);

        let terms = QueryMap::from([("late".to_string(), Query::eq("bobo"))]);
        assert_eq!(apply(&catalog, &terms).unwrap().len(), 1);
    }

    #[test]
    fn test_dispatch_routes_by_event_kind() {
        let (registry, catalog, router) = setup();
        let doc: Arc<dyn Document> = Arc::new(Record::new().with("name", "bobo"));
        registry.register(Arc::clone(&doc));

        router.dispatch(&LifecycleEvent::Added(Arc::clone(&doc))).unwrap();
        assert_eq!(apply(&catalog, &name_query("bobo")).unwrap().len(), 1);

        router.dispatch(&LifecycleEvent::Removed(doc)).unwrap();
        assert_eq!(apply(&catalog, &name_query("bobo")), Some(DocIdSet::new()));
    }
}
