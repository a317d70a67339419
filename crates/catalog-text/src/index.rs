//! The Tantivy-backed text index.
//!
//! Wraps IndexWriter behind a mutex and commits on every mutation; the
//! reader is reloaded before each search so results always reflect the last
//! successful write.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::Value;
use tantivy::collector::DocSetCollector;
use tantivy::query::QueryParser;
use tantivy::schema::Value as _;
use tantivy::{doc, Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument, Term};
use tracing::{debug, info};

use catalog_types::{DocId, DocIdSet, FieldBinding, IndexError, Query, ValueIndex};

use crate::error::TextError;
use crate::schema::{build_text_schema, TextSchema};

/// Default memory budget for IndexWriter (50MB)
const DEFAULT_WRITER_MEMORY_MB: usize = 50;

/// Text index configuration.
#[derive(Debug, Clone)]
pub struct TextIndexConfig {
    /// On-disk index directory; `None` keeps the index in memory.
    pub path: Option<PathBuf>,
    /// Memory budget for the writer in MB.
    pub writer_memory_mb: usize,
}

impl Default for TextIndexConfig {
    fn default() -> Self {
        Self {
            path: None,
            writer_memory_mb: DEFAULT_WRITER_MEMORY_MB,
        }
    }
}

impl TextIndexConfig {
    /// In-memory index with default writer budget.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Persistent index at `path`, created on first open.
    pub fn persistent(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            writer_memory_mb: DEFAULT_WRITER_MEMORY_MB,
        }
    }

    pub fn with_memory_mb(mut self, mb: usize) -> Self {
        self.writer_memory_mb = mb;
        self
    }
}

/// Full-text value index over document text.
///
/// The indexed value is a string (or an array of strings, joined); queries
/// are [`Query::Text`]. A blank query is inapplicable rather than a miss.
pub struct TextIndex {
    index: Index,
    schema: TextSchema,
    writer: Mutex<IndexWriter>,
    reader: IndexReader,
}

impl TextIndex {
    /// Open an existing index or create a new one per the config.
    pub fn open_or_create(config: TextIndexConfig) -> Result<Self, TextError> {
        let index = match &config.path {
            Some(path) => open_or_create_in_dir(path)?,
            None => Index::create_in_ram(build_text_schema().schema().clone()),
        };
        let schema = TextSchema::from_schema(index.schema())?;

        let writer = index.writer(config.writer_memory_mb * 1024 * 1024)?;
        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?;

        info!(path = ?config.path, "opened text index");

        Ok(Self {
            index,
            schema,
            writer: Mutex::new(writer),
            reader,
        })
    }

    /// Number of committed documents.
    pub fn num_docs(&self) -> Result<u64, TextError> {
        self.reader.reload()?;
        let searcher = self.reader.searcher();
        Ok(searcher
            .segment_readers()
            .iter()
            .map(|r| r.num_docs() as u64)
            .sum())
    }

    fn text_from(value: &Value) -> Result<String, IndexError> {
        match value {
            Value::String(s) => Ok(s.clone()),
            Value::Array(items) => {
                let parts: Result<Vec<&str>, IndexError> = items
                    .iter()
                    .map(|item| {
                        item.as_str().ok_or_else(|| {
                            IndexError::UnsupportedValue(format!(
                                "text parts must be strings, got {item}"
                            ))
                        })
                    })
                    .collect();
                Ok(parts?.join(" "))
            }
            other => Err(IndexError::UnsupportedValue(format!(
                "text values must be a string or an array of strings, got {other}"
            ))),
        }
    }

    fn search_ids(&self, query: &str) -> Result<DocIdSet, TextError> {
        self.reader.reload()?;
        let searcher = self.reader.searcher();
        let parser = QueryParser::for_index(&self.index, vec![self.schema.text]);
        let parsed = parser.parse_query(query)?;
        let addresses = searcher.search(&parsed, &DocSetCollector)?;

        let mut out = DocIdSet::new();
        for address in addresses {
            let doc: TantivyDocument = searcher.doc(address)?;
            if let Some(id) = doc.get_first(self.schema.doc_id).and_then(|v| v.as_u64()) {
                out.insert(id);
            }
        }

        debug!(query, matches = out.len(), "text search");
        Ok(out)
    }
}

impl ValueIndex for TextIndex {
    fn index_value(&mut self, id: DocId, value: &Value) -> Result<(), IndexError> {
        let text = Self::text_from(value)?;
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| TextError::WriterLocked(e.to_string()))
            .map_err(IndexError::from)?;

        // Delete any existing posting for this id, then add the new one
        writer.delete_term(Term::from_field_u64(self.schema.doc_id, id));
        writer
            .add_document(doc!(
                self.schema.doc_id => id,
                self.schema.text => text
            ))
            .map_err(TextError::from)
            .map_err(IndexError::from)?;
        writer
            .commit()
            .map_err(TextError::from)
            .map_err(IndexError::from)?;

        debug!(id, "indexed text value");
        Ok(())
    }

    fn unindex_value(&mut self, id: DocId) -> Result<(), IndexError> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| TextError::WriterLocked(e.to_string()))
            .map_err(IndexError::from)?;

        writer.delete_term(Term::from_field_u64(self.schema.doc_id, id));
        writer
            .commit()
            .map_err(TextError::from)
            .map_err(IndexError::from)?;

        debug!(id, "unindexed text value");
        Ok(())
    }

    fn clear(&mut self) -> Result<(), IndexError> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| TextError::WriterLocked(e.to_string()))
            .map_err(IndexError::from)?;

        writer
            .delete_all_documents()
            .map_err(TextError::from)
            .map_err(IndexError::from)?;
        writer
            .commit()
            .map_err(TextError::from)
            .map_err(IndexError::from)?;
        Ok(())
    }

    fn apply(&self, query: &Query) -> Result<Option<DocIdSet>, IndexError> {
        let Query::Text(text) = query else {
            return Err(IndexError::UnsupportedQuery(format!(
                "text index cannot answer {query:?}"
            )));
        };
        if text.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(self.search_ids(text).map_err(IndexError::from)?))
    }

    fn default_binding(&self) -> Option<FieldBinding> {
        Some(FieldBinding::callable("searchable_text").via("searchable"))
    }
}

/// Open an existing index directory or create a new one.
pub fn open_or_create_in_dir(path: &Path) -> Result<Index, TextError> {
    if path.join("meta.json").exists() {
        debug!(path = ?path, "opening existing text index");
        Ok(Index::open_in_dir(path)?)
    } else {
        info!(path = ?path, "creating new text index");
        std::fs::create_dir_all(path)?;
        let schema = build_text_schema();
        Ok(Index::create_in_dir(path, schema.schema().clone())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn ids(items: &[DocId]) -> DocIdSet {
        items.iter().copied().collect()
    }

    fn in_memory() -> TextIndex {
        TextIndex::open_or_create(TextIndexConfig::in_memory()).unwrap()
    }

    #[test]
    fn test_index_and_search() {
        let mut index = in_memory();
        index
            .index_value(1, &json!("the quick brown fox"))
            .unwrap();
        index.index_value(2, &json!("lazy dogs sleep")).unwrap();

        let result = index.apply(&Query::text("fox")).unwrap();
        assert_eq!(result, Some(ids(&[1])));
    }

    #[test]
    fn test_search_miss_is_definitive_empty() {
        let mut index = in_memory();
        index.index_value(1, &json!("catalog entry")).unwrap();

        let result = index.apply(&Query::text("zeppelin")).unwrap();
        assert_eq!(result, Some(DocIdSet::new()));
    }

    #[test]
    fn test_blank_query_is_inapplicable() {
        let index = in_memory();
        assert_eq!(index.apply(&Query::text("")).unwrap(), None);
        assert_eq!(index.apply(&Query::text("   ")).unwrap(), None);
    }

    #[test]
    fn test_reindex_replaces_text() {
        let mut index = in_memory();
        index.index_value(1, &json!("old words")).unwrap();
        index.index_value(1, &json!("new words")).unwrap();

        assert_eq!(index.apply(&Query::text("old")).unwrap(), Some(DocIdSet::new()));
        assert_eq!(index.apply(&Query::text("new")).unwrap(), Some(ids(&[1])));
        assert_eq!(index.num_docs().unwrap(), 1);
    }

    #[test]
    fn test_unindex() {
        let mut index = in_memory();
        index.index_value(1, &json!("transient text")).unwrap();
        index.unindex_value(1).unwrap();

        assert_eq!(index.apply(&Query::text("transient")).unwrap(), Some(DocIdSet::new()));
    }

    #[test]
    fn test_clear() {
        let mut index = in_memory();
        index.index_value(1, &json!("one")).unwrap();
        index.index_value(2, &json!("two")).unwrap();
        index.clear().unwrap();

        assert_eq!(index.num_docs().unwrap(), 0);
    }

    #[test]
    fn test_array_values_are_joined() {
        let mut index = in_memory();
        index
            .index_value(1, &json!(["title words", "body words"]))
            .unwrap();

        assert_eq!(index.apply(&Query::text("body")).unwrap(), Some(ids(&[1])));
    }

    #[test]
    fn test_rejects_non_text_values() {
        let mut index = in_memory();
        let err = index.index_value(1, &json!(42)).unwrap_err();
        assert!(matches!(err, IndexError::UnsupportedValue(_)));
    }

    #[test]
    fn test_unsupported_query() {
        let index = in_memory();
        let err = index.apply(&Query::eq("fox")).unwrap_err();
        assert!(matches!(err, IndexError::UnsupportedQuery(_)));
    }

    #[test]
    fn test_persistent_index_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let config = TextIndexConfig::persistent(temp_dir.path());

        {
            let mut index = TextIndex::open_or_create(config.clone()).unwrap();
            index.index_value(7, &json!("durable entry")).unwrap();
        }

        let reopened = TextIndex::open_or_create(config).unwrap();
        assert_eq!(reopened.apply(&Query::text("durable")).unwrap(), Some(ids(&[7])));
    }

    #[test]
    fn test_default_binding() {
        let index = in_memory();
        let binding = index.default_binding().unwrap();
        assert_eq!(binding.field_name, "searchable_text");
        assert_eq!(binding.capability.as_deref(), Some("searchable"));
        assert!(binding.callable);
    }
}
