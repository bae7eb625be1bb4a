//! Data source factories
//!
//! A factory produces a [`Source`] on demand:
//! - `Static` holds one source since construction and hands it out on every call
//! - `Lazy` runs a producer on every call, so each call may see a fresh source
//!
//! Neither variant memoizes. Caching belongs to the bound accessor.

use std::fmt;

use crate::source::Source;

/// Boxed zero-argument source producer
pub type Producer = Box<dyn Fn() -> Source>;

/// Produces source values for one registry entry
pub enum SourceFactory {
    Static(Source),
    Lazy(Producer),
}

impl SourceFactory {
    /// Create a static factory around an already computed source
    pub fn from_source(source: impl Into<Source>) -> Self {
        SourceFactory::Static(source.into())
    }

    /// Create a lazy factory around a producer
    pub fn from_producer<F>(producer: F) -> Self
    where
        F: Fn() -> Source + 'static,
    {
        SourceFactory::Lazy(Box::new(producer))
    }

    /// Produce the current source value
    pub fn produce(&self) -> Source {
        match self {
            SourceFactory::Static(source) => source.clone(),
            SourceFactory::Lazy(producer) => producer(),
        }
    }

    /// Static factories are idempotent and may be resolved once at bind time
    pub fn is_static(&self) -> bool {
        matches!(self, SourceFactory::Static(_))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SourceFactory::Static(_) => "static",
            SourceFactory::Lazy(_) => "lazy",
        }
    }
}

impl fmt::Debug for SourceFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceFactory::Static(source) => f.debug_tuple("Static").field(source).finish(),
            SourceFactory::Lazy(_) => f.write_str("Lazy(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn static_returns_same_value_every_call() {
        let factory = SourceFactory::from_source(json!({"UserId": 100}));
        assert!(factory.is_static());
        for _ in 0..3 {
            assert_eq!(factory.produce().extract("UserId"), Some(json!(100)));
        }
    }

    #[test]
    fn lazy_invokes_producer_every_call() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let factory = SourceFactory::from_producer(move || {
            counter.set(counter.get() + 1);
            Source::record(json!({"n": counter.get()}))
        });
        assert!(!factory.is_static());

        assert_eq!(factory.produce().extract("n"), Some(json!(1)));
        assert_eq!(factory.produce().extract("n"), Some(json!(2)));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn kinds_and_debug() {
        let lazy = SourceFactory::from_producer(|| Source::record(json!({})));
        assert_eq!(lazy.kind(), "lazy");
        assert_eq!(format!("{lazy:?}"), "Lazy(..)");

        let fixed = SourceFactory::from_source(json!({"a": 1}));
        assert_eq!(fixed.kind(), "static");
        assert!(format!("{fixed:?}").starts_with("Static(Record("));
    }
}
