//! The document contract: how cataloged objects expose their fields.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AccessError;

/// A cataloged object.
///
/// Field access is dynamic: indexes resolve the values they store through
/// this trait rather than through concrete document types, so one catalog
/// can hold heterogeneous documents.
pub trait Document: Send + Sync {
    /// Read a plain field. A missing field is `None`, never an error.
    fn field(&self, name: &str) -> Option<Value>;

    /// Invoke a derived-field accessor.
    ///
    /// A missing accessor is `Ok(None)`. A failing accessor body returns an
    /// error, which indexing propagates to its caller unmodified.
    fn call(&self, name: &str) -> Result<Option<Value>, AccessError> {
        Ok(self.field(name))
    }

    /// Adapt this document to a named capability view.
    ///
    /// `None` means the capability is not provided; indexes configured with
    /// that capability then skip the document entirely.
    fn adapt(&self, _capability: &str) -> Option<Box<dyn Document + '_>> {
        None
    }

    /// Slash-separated path of this document in the containment hierarchy.
    /// Only consulted by scope-restricted reindexing.
    fn location(&self) -> Option<&str> {
        None
    }

    /// Whether lifecycle routing may index this document on addition.
    fn auto_index(&self) -> bool {
        true
    }

    /// Whether lifecycle routing may reindex this document on modification.
    fn auto_reindex(&self) -> bool {
        true
    }
}

/// A plain map-backed document.
///
/// Convenient for tests and for callers whose data already is JSON-shaped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Record {
    fields: BTreeMap<String, Value>,
    location: Option<String>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, builder-style.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Place the record at a containment path.
    pub fn at(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

impl Document for Record {
    fn field(&self, name: &str) -> Option<Value> {
        self.fields.get(name).cloned()
    }

    fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }
}
