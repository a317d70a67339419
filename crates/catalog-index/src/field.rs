//! Field index: one ordered scalar value per document.

use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;

use serde_json::Value;
use tracing::debug;

use catalog_types::{DocId, DocIdSet, IndexError, Query, SortableIndex, ValueIndex};

use crate::key::IndexKey;

/// Indexes a single scalar value per document.
///
/// Supports exact and inclusive-range lookups, and orders its postings by
/// value, so it can also drive sorted retrieval.
#[derive(Debug, Default)]
pub struct FieldIndex {
    forward: BTreeMap<IndexKey, DocIdSet>,
    backward: HashMap<DocId, IndexKey>,
}

impl FieldIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently indexed.
    pub fn len(&self) -> usize {
        self.backward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backward.is_empty()
    }

    fn remove_posting(&mut self, id: DocId) {
        if let Some(key) = self.backward.remove(&id) {
            if let Some(ids) = self.forward.get_mut(&key) {
                ids.remove(&id);
                if ids.is_empty() {
                    self.forward.remove(&key);
                }
            }
        }
    }

    fn bound(value: Option<&Value>) -> Result<Bound<IndexKey>, IndexError> {
        match value {
            Some(v) => Ok(Bound::Included(IndexKey::from_value(v)?)),
            None => Ok(Bound::Unbounded),
        }
    }
}

impl ValueIndex for FieldIndex {
    fn index_value(&mut self, id: DocId, value: &Value) -> Result<(), IndexError> {
        let key = IndexKey::from_value(value)?;
        self.remove_posting(id);
        self.forward.entry(key.clone()).or_default().insert(id);
        self.backward.insert(id, key);
        debug!(id, "indexed field value");
        Ok(())
    }

    fn unindex_value(&mut self, id: DocId) -> Result<(), IndexError> {
        self.remove_posting(id);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), IndexError> {
        self.forward.clear();
        self.backward.clear();
        Ok(())
    }

    fn apply(&self, query: &Query) -> Result<Option<DocIdSet>, IndexError> {
        match query {
            Query::Eq(value) => {
                let key = IndexKey::from_value(value)?;
                // A miss is definitive for a field index: empty, not None.
                Ok(Some(self.forward.get(&key).cloned().unwrap_or_default()))
            }
            Query::Range { min, max } => {
                let lo = Self::bound(min.as_ref())?;
                let hi = Self::bound(max.as_ref())?;
                if let (Bound::Included(a), Bound::Included(b)) = (&lo, &hi) {
                    if a > b {
                        return Ok(Some(DocIdSet::new()));
                    }
                }
                let mut out = DocIdSet::new();
                for ids in self.forward.range((lo, hi)).map(|(_, ids)| ids) {
                    out.extend(ids);
                }
                Ok(Some(out))
            }
            other => Err(IndexError::UnsupportedQuery(format!(
                "field index cannot answer {other:?}"
            ))),
        }
    }

    fn sortable(&self) -> Option<&dyn SortableIndex> {
        Some(self)
    }
}

impl SortableIndex for FieldIndex {
    fn sort(
        &self,
        ids: &DocIdSet,
        limit: Option<usize>,
        reverse: bool,
    ) -> Result<Vec<DocId>, IndexError> {
        let mut ordered: Vec<DocId> = self
            .forward
            .values()
            .flat_map(|set| set.iter().copied())
            .filter(|id| ids.contains(id))
            .collect();
        if reverse {
            ordered.reverse();
        }
        if let Some(limit) = limit {
            ordered.truncate(limit);
        }
        Ok(ordered)
    }
}
