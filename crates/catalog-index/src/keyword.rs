//! Keyword index: a set of keywords per document.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde_json::Value;
use tracing::debug;

use catalog_types::{DocId, DocIdSet, IndexError, Query, ValueIndex};

/// Indexes a keyword set per document.
///
/// Accepts a single JSON string or an array of strings as the document
/// value. Queries are any-of (union) or all-of (intersection); an empty
/// keyword list makes the query inapplicable rather than a miss.
#[derive(Debug, Default)]
pub struct KeywordIndex {
    forward: BTreeMap<String, DocIdSet>,
    backward: HashMap<DocId, BTreeSet<String>>,
    fold_case: bool,
}

impl KeywordIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keywords are compared case-insensitively, at index and query time.
    pub fn case_insensitive() -> Self {
        Self {
            fold_case: true,
            ..Self::default()
        }
    }

    /// Number of documents currently indexed.
    pub fn len(&self) -> usize {
        self.backward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backward.is_empty()
    }

    fn fold(&self, word: &str) -> String {
        if self.fold_case {
            word.to_lowercase()
        } else {
            word.to_string()
        }
    }

    fn keywords_from(&self, value: &Value) -> Result<BTreeSet<String>, IndexError> {
        match value {
            Value::String(s) => Ok(BTreeSet::from([self.fold(s)])),
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => Ok(self.fold(s)),
                    other => Err(IndexError::UnsupportedValue(format!(
                        "keywords must be strings, got {other}"
                    ))),
                })
                .collect(),
            other => Err(IndexError::UnsupportedValue(format!(
                "keyword values must be a string or an array of strings, got {other}"
            ))),
        }
    }

    fn remove_posting(&mut self, id: DocId) {
        if let Some(words) = self.backward.remove(&id) {
            for word in words {
                if let Some(ids) = self.forward.get_mut(&word) {
                    ids.remove(&id);
                    if ids.is_empty() {
                        self.forward.remove(&word);
                    }
                }
            }
        }
    }

    fn lookup(&self, word: &str) -> Option<&DocIdSet> {
        self.forward.get(&self.fold(word))
    }
}

impl ValueIndex for KeywordIndex {
    fn index_value(&mut self, id: DocId, value: &Value) -> Result<(), IndexError> {
        let words = self.keywords_from(value)?;
        self.remove_posting(id);
        if words.is_empty() {
            return Ok(());
        }
        for word in &words {
            self.forward.entry(word.clone()).or_default().insert(id);
        }
        debug!(id, keywords = words.len(), "indexed keyword set");
        self.backward.insert(id, words);
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
            Query::AnyOf(words) => {
                if words.is_empty() {
                    return Ok(None);
                }
                let mut out = DocIdSet::new();
                for word in words {
                    if let Some(ids) = self.lookup(word) {
                        out.extend(ids);
                    }
                }
                Ok(Some(out))
            }
            Query::AllOf(words) => {
                if words.is_empty() {
                    return Ok(None);
                }
                let mut out: Option<DocIdSet> = None;
                for word in words {
                    let Some(ids) = self.lookup(word) else {
                        return Ok(Some(DocIdSet::new()));
                    };
                    out = Some(match out {
                        Some(acc) => acc.intersection(ids).copied().collect(),
                        None => ids.clone(),
                    });
                }
                Ok(Some(out.unwrap_or_default()))
            }
            other => Err(IndexError::UnsupportedQuery(format!(
                "keyword index cannot answer {other:?}"
            ))),
        }
    }
}
