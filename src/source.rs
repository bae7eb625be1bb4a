//! Data sources - the values slots read from
//!
//! A source is one of three shapes:
//! - `Getter`: exposes an explicit named lookup, always preferred
//! - `Record`: a plain JSON object, read by member name
//! - `Shared`: a reference to a mutable record, dereferenced on every read
//! - `Unavailable`: a source that could not be acquired, with the reason
//!
//! Extraction is a match over the variant; there is no runtime type switch.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde_json::Value;

/// Explicit named-lookup capability
///
/// The returned value is used as-is; `Value::Null` is a legitimate answer.
pub trait Getter {
    fn get(&self, field: &str) -> Value;
}

impl<F> Getter for F
where
    F: Fn(&str) -> Value,
{
    fn get(&self, field: &str) -> Value {
        self(field)
    }
}

/// A source value produced by a factory
#[derive(Clone)]
pub enum Source {
    /// Source with the Getter capability
    Getter(Rc<dyn Getter>),
    /// Plain structural record
    Record(Value),
    /// Reference to a record that may change between reads
    Shared(Rc<RefCell<Value>>),
    /// Acquisition failed; reads report the reason instead of a missing field
    Unavailable(String),
}

impl Source {
    /// Wrap a Getter implementation
    pub fn getter(getter: impl Getter + 'static) -> Self {
        Source::Getter(Rc::new(getter))
    }

    /// Wrap a plain record
    pub fn record(value: impl Into<Value>) -> Self {
        Source::Record(value.into())
    }

    /// Wrap a shared record; the caller keeps its handle to mutate it
    pub fn shared(value: Rc<RefCell<Value>>) -> Self {
        Source::Shared(value)
    }

    /// A source that failed to load
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Source::Unavailable(reason.into())
    }

    /// Extract the value named `field`
    ///
    /// Getter sources answer directly. Structural sources return `None`
    /// when the record is not an object or has no such member. Unavailable
    /// sources have no members.
    pub fn extract(&self, field: &str) -> Option<Value> {
        match self {
            Source::Getter(getter) => Some(getter.get(field)),
            Source::Record(record) => member(record, field),
            Source::Shared(cell) => member(&cell.borrow(), field),
            Source::Unavailable(_) => None,
        }
    }

    /// Short variant name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Source::Getter(_) => "getter",
            Source::Record(_) => "record",
            Source::Shared(_) => "shared",
            Source::Unavailable(_) => "unavailable",
        }
    }
}

fn member(record: &Value, field: &str) -> Option<Value> {
    record.as_object()?.get(field).cloned()
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Getter(_) => f.write_str("Getter(..)"),
            Source::Record(value) => f.debug_tuple("Record").field(value).finish(),
            Source::Shared(cell) => f.debug_tuple("Shared").field(&cell.borrow()).finish(),
            Source::Unavailable(reason) => f.debug_tuple("Unavailable").field(reason).finish(),
        }
    }
}

impl From<Value> for Source {
    fn from(value: Value) -> Self {
        Source::Record(value)
    }
}

impl From<Rc<RefCell<Value>>> for Source {
    fn from(value: Rc<RefCell<Value>>) -> Self {
        Source::Shared(value)
    }
}
