//! Containment scopes for restricted reindexing.
//!
//! A catalog living inside a location hierarchy only reindexes the
//! documents of its nearest enclosing scope. Scope resolution is injected;
//! the catalog never consults ambient state.

use std::sync::Arc;

use catalog_types::IdRegistry;

/// The nearest enclosing scope of a catalog.
#[derive(Clone)]
pub struct Scope {
    /// Root path of the scope.
    pub root: String,
    /// Identity registry registered at this scope, if it carries its own.
    /// A local registry already bounds its entries to the scope, so
    /// ancestry filtering is skipped for it.
    pub registry: Option<Arc<dyn IdRegistry>>,
}

impl Scope {
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            registry: None,
        }
    }

    pub fn with_registry(mut self, registry: Arc<dyn IdRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }
}

/// Resolves the nearest enclosing scope for a catalog.
pub trait ScopeResolver: Send + Sync {
    fn nearest_scope(&self) -> Option<Scope>;
}

/// A resolver with a fixed answer.
pub struct FixedScope {
    scope: Option<Scope>,
}

impl FixedScope {
    pub fn new(scope: Scope) -> Self {
        Self { scope: Some(scope) }
    }

    /// A resolver that yields no scope at all.
    pub fn none() -> Self {
        Self { scope: None }
    }
}

impl ScopeResolver for FixedScope {
    fn nearest_scope(&self) -> Option<Scope> {
        self.scope.clone()
    }
}

/// Whether `location` lies at or below `root`.
pub fn located_within(location: Option<&str>, root: &str) -> bool {
    match location {
        Some(path) => {
            path == root
                || path
                    .strip_prefix(root)
                    .is_some_and(|rest| rest.starts_with('/'))
        }
        None => false,
    }
}
