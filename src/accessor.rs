//! Bound accessors - the values installed into model slots
//!
//! An [`Accessor<T>`] starts unbound. Binding installs a [`Binding`]: the
//! effective field name, the shared factory, the cache policy and, for static
//! factories, the source resolved at bind time. Each accessor owns a private
//! cache cell.
//!
//! With caching on, the cell moves `Empty -> Filled` on the first successful
//! `get()` and never goes back. Failed reads leave it empty. With caching off
//! every `get()` reads the source again.
//!
//! Values are decoded from JSON into `T`; nothing is coerced. A number does
//! not become a string, a string does not become a number, and an integer
//! does not widen into a float. A decoded value must serialize back to
//! exactly the raw source value, so members `T` would silently drop are
//! rejected too.

use std::any::type_name;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::trace;

use crate::error::{BindError, Result};
use crate::factory::SourceFactory;
use crate::source::Source;

/// Everything a slot captures at bind time, independent of its output type
pub struct Binding {
    slot: String,
    source_name: String,
    field: String,
    factory: Rc<SourceFactory>,
    /// Static sources are resolved once, here
    resolved: Option<Source>,
    allow_cache: bool,
}

impl Binding {
    pub(crate) fn new(
        slot: impl Into<String>,
        source_name: impl Into<String>,
        field: impl Into<String>,
        factory: Rc<SourceFactory>,
        allow_cache: bool,
    ) -> Self {
        let resolved = factory.is_static().then(|| factory.produce());
        Self {
            slot: slot.into(),
            source_name: source_name.into(),
            field: field.into(),
            factory,
            resolved,
            allow_cache,
        }
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn allow_cache(&self) -> bool {
        self.allow_cache
    }

    /// Read the raw field value from the current source
    ///
    /// Static sources are read as resolved at bind time; lazy factories
    /// produce a fresh source on every call. Nothing is cached here.
    pub fn extract(&self) -> Result<Value> {
        let produced;
        let source = match &self.resolved {
            Some(source) => source,
            None => {
                produced = self.factory.produce();
                &produced
            }
        };
        if let Source::Unavailable(reason) = source {
            return Err(BindError::SourceUnavailable {
                source_name: self.source_name.clone(),
                reason: reason.clone(),
            });
        }
        source.extract(&self.field).ok_or_else(|| BindError::FieldNotFound {
            source_name: self.source_name.clone(),
            field: self.field.clone(),
        })
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("slot", &self.slot)
            .field("source", &self.source_name)
            .field("field", &self.field)
            .field("factory", &self.factory.kind())
            .field("allow_cache", &self.allow_cache)
            .finish()
    }
}

/// A slot that can receive a [`Binding`]
///
/// Implemented by [`Accessor<T>`]; this is the "zero-argument, single-output"
/// slot shape the binder accepts. Other implementors read values through
/// [`Binding::extract`].
pub trait Bindable {
    fn install(&mut self, binding: Binding);

    /// Declared output type, for diagnostics
    fn output_type(&self) -> &'static str;
}

/// Zero-argument accessor slot producing a `T`
pub struct Accessor<T> {
    bound: Option<Bound<T>>,
}

struct Bound<T> {
    binding: Binding,
    cache: RefCell<Option<T>>,
}

impl<T> Default for Accessor<T> {
    fn default() -> Self {
        Self { bound: None }
    }
}

impl<T> Accessor<T> {
    /// An unbound accessor
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_bound(&self) -> bool {
        self.bound.is_some()
    }

    /// True once a cached value is held
    pub fn is_cached(&self) -> bool {
        self.bound
            .as_ref()
            .map(|b| b.cache.borrow().is_some())
            .unwrap_or(false)
    }

    /// The binding installed by `bind`, if any
    pub fn binding(&self) -> Option<&Binding> {
        self.bound.as_ref().map(|b| &b.binding)
    }

    /// Effective field name this accessor extracts
    pub fn field(&self) -> Option<&str> {
        self.binding().map(Binding::field)
    }

    /// Source name this accessor reads from
    pub fn source_name(&self) -> Option<&str> {
        self.binding().map(Binding::source_name)
    }
}

impl<T> Accessor<T>
where
    T: DeserializeOwned + Serialize + Clone,
{
    /// Fetch the slot value
    pub fn get(&self) -> Result<T> {
        let bound = self.bound.as_ref().ok_or(BindError::Unbound {
            type_name: type_name::<T>(),
        })?;
        bound.get()
    }
}

impl<T> Bound<T>
where
    T: DeserializeOwned + Serialize + Clone,
{
    fn get(&self) -> Result<T> {
        let binding = &self.binding;
        if binding.allow_cache {
            if let Some(value) = self.cache.borrow().as_ref() {
                trace!(slot = %binding.slot, "cache hit");
                return Ok(value.clone());
            }
        }

        let raw = binding.extract()?;
        let value = decode::<T>(raw).map_err(|details| BindError::TypeMismatch {
            source_name: binding.source_name.clone(),
            field: binding.field.clone(),
            expected: type_name::<T>(),
            details,
        })?;

        if binding.allow_cache {
            trace!(slot = %binding.slot, "cache filled");
            *self.cache.borrow_mut() = Some(value.clone());
        }
        Ok(value)
    }
}

/// Decode `raw` into `T`, rejecting anything serde would convert on the way
fn decode<T>(raw: Value) -> std::result::Result<T, String>
where
    T: DeserializeOwned + Serialize,
{
    let value: T = serde_json::from_value(raw.clone()).map_err(|e| e.to_string())?;
    match serde_json::to_value(&value) {
        Ok(round_trip) if round_trip == raw => Ok(value),
        Ok(round_trip) => Err(format!("source holds {raw}, which decodes as {round_trip}")),
        Err(e) => Err(e.to_string()),
    }
}

impl<T: 'static> Bindable for Accessor<T> {
    fn install(&mut self, binding: Binding) {
        self.bound = Some(Bound {
            binding,
            cache: RefCell::new(None),
        });
    }

    fn output_type(&self) -> &'static str {
        type_name::<T>()
    }
}

impl<T> fmt::Debug for Accessor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.bound {
            Some(bound) => f
                .debug_struct("Accessor")
                .field("source", &bound.binding.source_name)
                .field("field", &bound.binding.field)
                .field("cached", &bound.cache.borrow().is_some())
                .finish(),
            None => f.write_str("Accessor(unbound)"),
        }
    }
}
