//! The catalog: a named, ordered collection of indexes plus the multi-index
//! query and update engine over them.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info};

use catalog_types::{DocId, DocIdSet, Document, IdRegistry, Query, SortableIndex};

use crate::error::CatalogError;
use crate::result::ResultSet;
use crate::scope::{located_within, ScopeResolver};

/// A document-level index held by a catalog.
///
/// Implementations resolve the values they store from the document itself;
/// [`AttributeIndex`](crate::AttributeIndex) is the standard way to build
/// one from a value index.
pub trait CatalogIndex: Send {
    fn index_doc(&mut self, id: DocId, doc: &dyn Document) -> Result<(), CatalogError>;

    fn unindex_doc(&mut self, id: DocId) -> Result<(), CatalogError>;

    fn clear(&mut self) -> Result<(), CatalogError>;

    /// `Ok(None)` = nothing to contribute; an empty set = definitive miss.
    fn apply(&self, query: &Query) -> Result<Option<DocIdSet>, CatalogError>;

    fn sortable(&self) -> Option<&dyn SortableIndex> {
        None
    }
}

/// Sub-queries keyed by index name.
pub type QueryMap = BTreeMap<String, Query>;

/// Control parameters for [`Catalog::search_results`].
///
/// Kept apart from the query terms so they can never leak into a sub-query.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Delegate ordering to this index; it must support sorting.
    pub sort_index: Option<String>,
    /// Maximum number of results, applied after any reversal.
    pub limit: Option<usize>,
    /// Reverse the result order.
    pub reverse: bool,
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sorted_by(mut self, index: impl Into<String>) -> Self {
        self.sort_index = Some(index.into());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn reversed(mut self) -> Self {
        self.reverse = true;
        self
    }
}

/// Named, insertion-ordered collection of indexes.
///
/// The catalog owns its indexes and fans every update out to each of them.
/// It performs no locking of its own: execution is single-writer and
/// request-scoped, with isolation provided by the layer that owns the
/// catalog.
pub struct Catalog {
    entries: Vec<(String, Box<dyn CatalogIndex>)>,
    registry: Arc<dyn IdRegistry>,
    scope: Option<Arc<dyn ScopeResolver>>,
}

impl Catalog {
    /// An empty catalog bound to an identity registry.
    pub fn new(registry: Arc<dyn IdRegistry>) -> Self {
        Self {
            entries: Vec::new(),
            registry,
            scope: None,
        }
    }

    /// Restrict full reindexing to the nearest enclosing scope.
    pub fn with_scope(mut self, scope: Arc<dyn ScopeResolver>) -> Self {
        self.scope = Some(scope);
        self
    }

    /// The identity registry this catalog resolves documents through.
    pub fn registry(&self) -> &Arc<dyn IdRegistry> {
        &self.registry
    }

    /// Add an index under `name`. An existing index with the same name is
    /// silently replaced, keeping its fan-out position.
    pub fn add_index(&mut self, name: impl Into<String>, index: Box<dyn CatalogIndex>) {
        let name = name.into();
        if let Some(entry) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = index;
        } else {
            debug!(index = %name, "added index");
            self.entries.push((name, index));
        }
    }

    /// Remove and return the index under `name`.
    pub fn remove_index(&mut self, name: &str) -> Option<Box<dyn CatalogIndex>> {
        let pos = self.entries.iter().position(|(n, _)| n == name)?;
        debug!(index = %name, "removed index");
        Some(self.entries.remove(pos).1)
    }

    /// Index names in fan-out (insertion) order.
    pub fn index_names(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn index(&self, name: &str) -> Option<&dyn CatalogIndex> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, index)| index.as_ref())
    }

    fn index_mut(&mut self, name: &str) -> Option<&mut Box<dyn CatalogIndex>> {
        self.entries
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, index)| index)
    }

    /// Clear every contained index.
    pub fn clear(&mut self) -> Result<(), CatalogError> {
        for (name, index) in &mut self.entries {
            index.clear()?;
            debug!(index = %name, "cleared");
        }
        Ok(())
    }

    /// Register `doc` with every contained index, in insertion order.
    ///
    /// Fan-out is not atomic: the first failing index stops the pass and
    /// indexes after it are left untouched. The catalog is then partially
    /// updated for this document until it is successfully reindexed.
    pub fn index_doc(&mut self, id: DocId, doc: &dyn Document) -> Result<(), CatalogError> {
        for (_, index) in &mut self.entries {
            index.index_doc(id, doc)?;
        }
        debug!(id, indexes = self.entries.len(), "indexed document");
        Ok(())
    }

    /// Remove `id` from every contained index, in insertion order. Same
    /// non-atomic fan-out policy as [`Catalog::index_doc`].
    pub fn unindex_doc(&mut self, id: DocId) -> Result<(), CatalogError> {
        for (_, index) in &mut self.entries {
            index.unindex_doc(id)?;
        }
        debug!(id, indexes = self.entries.len(), "unindexed document");
        Ok(())
    }

    /// Documents visible to a full reindex.
    ///
    /// A resolved scope that carries its own registry already bounds its
    /// entries, so they are used unfiltered; a scope without one filters the
    /// catalog's registry by location ancestry. Without a scope the whole
    /// registry is visible.
    fn visible_entries(&self) -> Vec<(DocId, Arc<dyn Document>)> {
        if let Some(resolver) = &self.scope {
            if let Some(scope) = resolver.nearest_scope() {
                if let Some(local) = scope.registry {
                    return local.entries();
                }
                return self
                    .registry
                    .entries()
                    .into_iter()
                    .filter(|(_, doc)| located_within(doc.location(), &scope.root))
                    .collect();
            }
        }
        self.registry.entries()
    }

    /// Reindex the named index against every visible document.
    pub fn update_index(&mut self, name: &str) -> Result<usize, CatalogError> {
        let docs = self.visible_entries();
        let index = self
            .index_mut(name)
            .ok_or_else(|| CatalogError::NoSuchIndex(name.to_string()))?;
        let mut count = 0;
        for (id, doc) in docs {
            index.index_doc(id, doc.as_ref())?;
            count += 1;
        }
        info!(index = %name, docs = count, "reindexed");
        Ok(count)
    }

    /// Reindex every contained index in a single pass over the visible
    /// documents: each document is resolved once and fanned out to all
    /// indexes.
    pub fn update_indexes(&mut self) -> Result<usize, CatalogError> {
        let docs = self.visible_entries();
        let mut count = 0;
        for (id, doc) in docs {
            for (_, index) in &mut self.entries {
                index.index_doc(id, doc.as_ref())?;
            }
            count += 1;
        }
        info!(docs = count, indexes = self.entries.len(), "reindexed all");
        Ok(count)
    }

    /// Evaluate a multi-index query.
    ///
    /// Per entry: an unknown index name is an error; `None` from an index
    /// does not narrow the result; an empty set short-circuits to an empty
    /// overall result. When no entry produced a usable set, the catalog
    /// itself was not applicable and the result is `None`. Produced sets
    /// are intersected smallest-first.
    pub fn apply(&self, query: &QueryMap) -> Result<Option<DocIdSet>, CatalogError> {
        let mut partial: Vec<DocIdSet> = Vec::new();
        for (name, sub) in query {
            let index = self
                .index(name)
                .ok_or_else(|| CatalogError::NoSuchIndex(name.clone()))?;
            match index.apply(sub)? {
                None => continue,
                Some(ids) if ids.is_empty() => {
                    debug!(index = %name, "empty sub-result, short-circuiting");
                    return Ok(Some(ids));
                }
                Some(ids) => partial.push(ids),
            }
        }

        partial.sort_by_key(DocIdSet::len);
        let mut sets = partial.into_iter();
        let Some(mut result) = sets.next() else {
            // no applicable index: the catalog could not answer at all
            return Ok(None);
        };
        for ids in sets {
            result = result.intersection(&ids).copied().collect();
            if result.is_empty() {
                break;
            }
        }
        Ok(Some(result))
    }

    /// Query, then order, limit, and wrap the matches for consumption.
    ///
    /// `None` from [`Catalog::apply`] passes through unchanged; callers can
    /// still tell "no applicable index" apart from an empty result set.
    pub fn search_results(
        &self,
        terms: &QueryMap,
        options: &SearchOptions,
    ) -> Result<Option<ResultSet>, CatalogError> {
        let Some(matched) = self.apply(terms)? else {
            return Ok(None);
        };

        let ids = match &options.sort_index {
            Some(name) => {
                let index = self
                    .index(name)
                    .ok_or_else(|| CatalogError::NoSuchIndex(name.clone()))?;
                let sortable = index
                    .sortable()
                    .ok_or_else(|| CatalogError::NotSortable(name.clone()))?;
                sortable.sort(&matched, options.limit, options.reverse)?
            }
            None => {
                let mut ids: Vec<DocId> = matched.into_iter().collect();
                if options.reverse {
                    ids.reverse();
                }
                if let Some(limit) = options.limit {
                    ids.truncate(limit);
                }
                ids
            }
        };

        debug!(results = ids.len(), "search complete");
        Ok(Some(ResultSet::new(ids, Arc::clone(&self.registry))))
    }
}
