//! Attribute extraction: deriving the value a document contributes to an
//! index.

use serde_json::Value;

use catalog_types::{DocId, DocIdSet, Document, FieldBinding, Query, SortableIndex, ValueIndex};

use crate::catalog::CatalogIndex;
use crate::error::CatalogError;

/// Wraps a value index with the logic that resolves a document's field.
///
/// Resolution happens in a fixed order: adapt the document to the configured
/// capability (a document without it is skipped without touching the inner
/// index), read or invoke the named field, then index the value. An absent
/// value unindexes the document instead, since a transition to "no value"
/// is itself an indexing event.
///
/// Accessor failures are never swallowed; they surface from `index_doc`.
#[derive(Debug)]
pub struct AttributeIndex<I> {
    binding: FieldBinding,
    inner: I,
}

enum Resolution {
    /// Document does not participate in this index at all.
    Skip,
    /// The field resolved to no value; any prior posting is removed.
    Absent,
    Value(Value),
}

impl<I: ValueIndex> AttributeIndex<I> {
    /// Wrap `inner` with an explicit binding.
    pub fn new(binding: FieldBinding, inner: I) -> Self {
        Self { binding, inner }
    }

    /// Wrap `inner`, reading the plain field `name`.
    pub fn with_field(name: impl Into<String>, inner: I) -> Self {
        Self::new(FieldBinding::field(name), inner)
    }

    /// Wrap `inner` using the defaults it declares.
    ///
    /// Fails with [`CatalogError::MissingFieldName`] when the index kind
    /// contributes no default binding.
    pub fn from_defaults(inner: I) -> Result<Self, CatalogError> {
        let binding = inner
            .default_binding()
            .ok_or(CatalogError::MissingFieldName)?;
        Ok(Self::new(binding, inner))
    }

    pub fn binding(&self) -> &FieldBinding {
        &self.binding
    }

    pub fn inner(&self) -> &I {
        &self.inner
    }

    fn resolve(&self, doc: &dyn Document) -> Result<Resolution, CatalogError> {
        let adapted;
        let target: &dyn Document = match &self.binding.capability {
            Some(capability) => match doc.adapt(capability) {
                Some(view) => {
                    adapted = view;
                    adapted.as_ref()
                }
                None => return Ok(Resolution::Skip),
            },
            None => doc,
        };

        let value = if self.binding.callable {
            target.call(&self.binding.field_name)?
        } else {
            target.field(&self.binding.field_name)
        };

        Ok(match value {
            Some(value) => Resolution::Value(value),
            None => Resolution::Absent,
        })
    }
}

impl<I: ValueIndex> CatalogIndex for AttributeIndex<I> {
    fn index_doc(&mut self, id: DocId, doc: &dyn Document) -> Result<(), CatalogError> {
        match self.resolve(doc)? {
            Resolution::Skip => Ok(()),
            Resolution::Absent => {
                self.inner.unindex_value(id)?;
                Ok(())
            }
            Resolution::Value(value) => {
                self.inner.index_value(id, &value)?;
                Ok(())
            }
        }
    }

    fn unindex_doc(&mut self, id: DocId) -> Result<(), CatalogError> {
        self.inner.unindex_value(id)?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), CatalogError> {
        self.inner.clear()?;
        Ok(())
    }

    fn apply(&self, query: &Query) -> Result<Option<DocIdSet>, CatalogError> {
        Ok(self.inner.apply(query)?)
    }

    fn sortable(&self) -> Option<&dyn SortableIndex> {
        self.inner.sortable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_index::FieldIndex;
    use catalog_types::{AccessError, Record};
    use serde_json::json;

    fn ids(items: &[DocId]) -> DocIdSet {
        items.iter().copied().collect()
    }

    #[test]
    fn test_indexes_plain_field() {
        let mut index = AttributeIndex::with_field("name", FieldIndex::new());
        let doc = Record::new().with("name", "bobo");

        index.index_doc(11, &doc).unwrap();
        assert_eq!(index.apply(&Query::eq("bobo")).unwrap(), Some(ids(&[11])));
    }

    #[test]
    fn test_absent_field_unindexes_prior_value() {
        let mut index = AttributeIndex::with_field("name", FieldIndex::new());

        index.index_doc(11, &Record::new().with("name", "bobo")).unwrap();
        index.index_doc(11, &Record::new()).unwrap();

        assert_eq!(index.apply(&Query::eq("bobo")).unwrap(), Some(DocIdSet::new()));
    }

    #[test]
    fn test_from_defaults_requires_default_binding() {
        let err = AttributeIndex::from_defaults(FieldIndex::new()).unwrap_err();
        assert!(matches!(err, CatalogError::MissingFieldName));
    }

    /// Document whose view behind the "squared" capability exposes `y`.
    struct Adaptable {
        x: i64,
    }

    struct Squared {
        y: i64,
    }

    impl Document for Adaptable {
        fn field(&self, name: &str) -> Option<Value> {
            (name == "x").then(|| json!(self.x))
        }

        fn adapt(&self, capability: &str) -> Option<Box<dyn Document + '_>> {
            (capability == "squared").then(|| {
                Box::new(Squared { y: self.x * self.x }) as Box<dyn Document>
            })
        }
    }

    impl Document for Squared {
        fn field(&self, name: &str) -> Option<Value> {
            (name == "y").then(|| json!(self.y))
        }
    }

    #[test]
    fn test_adaptation_reads_the_adapted_view() {
        let binding = FieldBinding::field("y").via("squared");
        let mut index = AttributeIndex::new(binding, FieldIndex::new());

        index.index_doc(11, &Adaptable { x: 3 }).unwrap();
        assert_eq!(index.apply(&Query::eq(9)).unwrap(), Some(ids(&[11])));
    }

    #[test]
    fn test_failed_adaptation_skips_without_unindexing() {
        let mut index = AttributeIndex::new(
            FieldBinding::field("name").via("missing-capability"),
            FieldIndex::new(),
        );

        // Record does not provide any capability: nothing happens, no error.
        index.index_doc(11, &Record::new().with("name", "bobo")).unwrap();
        assert_eq!(index.apply(&Query::eq("bobo")).unwrap(), Some(DocIdSet::new()));
    }

    /// Document whose accessor fails when its state is incomplete.
    struct Flaky {
        ready: bool,
    }

    impl Document for Flaky {
        fn field(&self, _name: &str) -> Option<Value> {
            None
        }

        fn call(&self, name: &str) -> Result<Option<Value>, AccessError> {
            if name != "ratio" {
                return Ok(None);
            }
            if self.ready {
                Ok(Some(json!(42)))
            } else {
                Err(AccessError::new("ratio", "document state incomplete"))
            }
        }
    }

    #[test]
    fn test_failing_accessor_propagates() {
        let mut index = AttributeIndex::new(FieldBinding::callable("ratio"), FieldIndex::new());

        let err = index.index_doc(11, &Flaky { ready: false }).unwrap_err();
        assert!(matches!(err, CatalogError::Access(_)));
        // nothing was indexed for the failing document
        assert_eq!(index.apply(&Query::eq(42)).unwrap(), Some(DocIdSet::new()));

        index.index_doc(11, &Flaky { ready: true }).unwrap();
        assert_eq!(index.apply(&Query::eq(42)).unwrap(), Some(ids(&[11])));
    }

    #[test]
    fn test_missing_accessor_is_treated_as_absent() {
        let mut index = AttributeIndex::new(FieldBinding::callable("other"), FieldIndex::new());
        index.index_doc(11, &Flaky { ready: true }).unwrap();
        assert!(index.inner().is_empty());
    }

    #[test]
    fn test_sortable_forwards_to_inner() {
        let index = AttributeIndex::with_field("name", FieldIndex::new());
        assert!(index.sortable().is_some());
    }
}
