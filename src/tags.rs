//! Slot metadata - `source` and `field` tags
//!
//! Tags can be written in struct-tag syntax:
//!
//! ```text
//! source:"A" field:"UserId"
//! ```
//!
//! Unknown keys are ignored. An absent key and an empty value are the same
//! thing: `field:""` falls back to the slot name just like a missing `field`.

use once_cell::sync::Lazy;
use regex::Regex;

/// `key:"value"` pairs, values may contain escaped quotes
static TAG_PAIR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([A-Za-z_][A-Za-z0-9_]*):"((?:[^"\\]|\\.)*)""#).expect("valid tag regex")
});

/// Binding annotations of one slot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tags {
    source: Option<String>,
    field: Option<String>,
}

impl Tags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tags bound to `source` with no explicit field
    pub fn source(name: impl Into<String>) -> Self {
        Self::new().with("source", name)
    }

    /// Parse struct-tag syntax, e.g. `source:"A" field:"UserId"`
    ///
    /// Later duplicates win. Text that is not a `key:"value"` pair is skipped.
    pub fn parse(raw: &str) -> Self {
        TAG_PAIR
            .captures_iter(raw)
            .fold(Self::new(), |tags, caps| tags.with(&caps[1], unescape(&caps[2])))
    }

    /// Set one tag by key; keys other than `source` and `field` are ignored
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        match key {
            "source" => self.source = Some(value.into()),
            "field" => self.field = Some(value.into()),
            _ => {}
        }
        self
    }

    /// Set the `field` tag
    pub fn with_field(self, field: impl Into<String>) -> Self {
        self.with("field", field)
    }

    /// The `source` tag, if present and non-empty
    pub fn source_name(&self) -> Option<&str> {
        non_empty(self.source.as_deref())
    }

    /// The `field` tag, if present and non-empty
    pub fn field(&self) -> Option<&str> {
        non_empty(self.field.as_deref())
    }

    /// Name used to extract the value: the `field` tag or the slot's own name
    pub fn effective_field<'a>(&'a self, slot: &'a str) -> &'a str {
        self.field().unwrap_or(slot)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}
