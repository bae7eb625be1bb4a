//! Factory registry - named source factories plus the cache policy
//!
//! Built with a fluent API and handed read-only to [`crate::bind`]:
//!
//! ```
//! use bigmodel::{FactoryRegistry, Source};
//! use serde_json::json;
//!
//! let registry = FactoryRegistry::new()
//!     .set_allow_cache(true)
//!     .with_source("A", json!({"UserId": 100}))
//!     .with_factory("B", || Source::record(json!({"UserName": "guanming"})));
//!
//! assert!(registry.allow_cache());
//! assert_eq!(registry.names(), vec!["A", "B"]);
//! ```
//!
//! Re-registering a name replaces the previous factory (last write wins).

use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::factory::SourceFactory;
use crate::source::Source;

/// Named collection of source factories
///
/// Factories sit behind `Rc` so bound accessors keep them alive after the
/// registry itself is dropped.
#[derive(Debug, Default)]
pub struct FactoryRegistry {
    allow_cache: bool,
    factories: FxHashMap<String, Rc<SourceFactory>>,
}

impl FactoryRegistry {
    /// Create an empty registry with caching disabled
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cache policy for every slot bound through this registry
    pub fn set_allow_cache(mut self, allow_cache: bool) -> Self {
        self.allow_cache = allow_cache;
        self
    }

    /// Register a static source under `name`
    pub fn with_source(self, name: impl Into<String>, source: impl Into<Source>) -> Self {
        self.with(name, SourceFactory::from_source(source))
    }

    /// Register a lazy producer under `name`
    pub fn with_factory<F>(self, name: impl Into<String>, producer: F) -> Self
    where
        F: Fn() -> Source + 'static,
    {
        self.with(name, SourceFactory::from_producer(producer))
    }

    /// Register an already built factory under `name`
    pub fn with(mut self, name: impl Into<String>, factory: SourceFactory) -> Self {
        self.factories.insert(name.into(), Rc::new(factory));
        self
    }

    pub fn allow_cache(&self) -> bool {
        self.allow_cache
    }

    /// Look up the factory registered under `name`
    pub fn factory(&self, name: &str) -> Option<&Rc<SourceFactory>> {
        self.factories.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Registered source names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
