//! Model descriptors
//!
//! A model is a record whose fields are accessor slots. Instead of inspecting
//! the record at runtime, the record describes itself through [`Model`]:
//! it lists its slots in declaration order, each with a name, [`Tags`] and a
//! shape.
//!
//! Three ways to get a `Model`:
//! - the [`model!`](crate::model!) macro, which generates the impl at build time
//! - a hand-written impl
//! - [`DynamicModel`], loaded from a YAML descriptor
//!
//! ```
//! use bigmodel::{bind, model, Accessor, FactoryRegistry};
//! use serde_json::json;
//!
//! model! {
//!     pub struct User {
//!         #[bind(source = "A", field = "UserId")]
//!         pub id: Accessor<i64>,
//!         #[bind(source = "A")]
//!         pub name: Accessor<String>,
//!     }
//! }
//!
//! let registry = FactoryRegistry::new()
//!     .with_source("A", json!({"UserId": 7, "name": "ada"}));
//! let mut user = User::default();
//! bind(&mut user, &registry).unwrap();
//! assert_eq!(user.id.get().unwrap(), 7);
//! assert_eq!(user.name.get().unwrap(), "ada");
//! ```

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::accessor::{Accessor, Bindable};
use crate::error::{BindError, Result};
use crate::tags::Tags;

/// Shape of one slot
pub enum SlotShape<'a> {
    /// Zero-argument, single-output accessor
    Accessor(&'a mut dyn Bindable),
    /// Anything else; carries the declared type name
    Other(&'static str),
}

/// One field of a model descriptor
pub struct Slot<'a> {
    pub name: &'a str,
    pub tags: Tags,
    pub shape: SlotShape<'a>,
}

impl<'a> Slot<'a> {
    /// An accessor slot
    pub fn accessor(name: &'a str, tags: Tags, target: &'a mut dyn Bindable) -> Self {
        Self {
            name,
            tags,
            shape: SlotShape::Accessor(target),
        }
    }

    /// A slot of some other shape; binding it is a defect
    pub fn other(name: &'a str, tags: Tags, type_name: &'static str) -> Self {
        Self {
            name,
            tags,
            shape: SlotShape::Other(type_name),
        }
    }
}

impl fmt::Debug for Slot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shape = match &self.shape {
            SlotShape::Accessor(target) => target.output_type(),
            SlotShape::Other(type_name) => *type_name,
        };
        f.debug_struct("Slot")
            .field("name", &self.name)
            .field("tags", &self.tags)
            .field("shape", &shape)
            .finish()
    }
}

/// What a bind target turned out to be
pub enum Target<'a> {
    /// A record; slots in declaration order
    Record(Vec<Slot<'a>>),
    /// Not a record; carries a short description of what it is
    Other(&'static str),
}

/// Schema description of a bindable record
pub trait Model {
    fn target(&mut self) -> Target<'_>;
}

/// Declare a model struct and generate its [`Model`] impl.
///
/// Every field must be an [`Accessor<T>`](crate::Accessor) and carry a
/// `#[bind(...)]` attribute listing its tags. `source` is required at bind
/// time; `field` defaults to the Rust field name. Other attributes may follow
/// the `#[bind]` attribute. The struct derives `Default`.
#[macro_export]
macro_rules! model {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                #[bind($($key:ident = $value:literal),* $(,)?)]
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Default)]
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl $crate::model::Model for $name {
            fn target(&mut self) -> $crate::model::Target<'_> {
                $crate::model::Target::Record(vec![
                    $(
                        $crate::model::Slot::accessor(
                            stringify!($field),
                            $crate::tags::Tags::new()$(.with(stringify!($key), $value))*,
                            &mut self.$field,
                        ),
                    )*
                ])
            }
        }
    };
}

// ═══════════════════════════════════════════════════════════════
// DynamicModel - descriptor loaded from YAML
// ═══════════════════════════════════════════════════════════════

/// Declared slot kind in a YAML descriptor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotKind {
    #[default]
    Accessor,
    Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SlotDecl {
    #[serde(default)]
    kind: SlotKind,
    tag: Option<String>,
    source: Option<String>,
    field: Option<String>,
}

impl SlotDecl {
    /// Explicit `source`/`field` entries override the struct-tag string
    fn tags(&self) -> Tags {
        let mut tags = self.tag.as_deref().map(Tags::parse).unwrap_or_default();
        if let Some(source) = &self.source {
            tags = tags.with("source", source.as_str());
        }
        if let Some(field) = &self.field {
            tags = tags.with_field(field.as_str());
        }
        tags
    }
}

#[derive(Debug)]
struct DynamicSlot {
    name: String,
    tags: Tags,
    kind: SlotKind,
    accessor: Accessor<Value>,
}

/// A model whose slots come from a YAML descriptor
///
/// ```yaml
/// ID:
///   tag: 'source:"A" field:"UserId"'
/// UserName:
///   source: B
/// ```
///
/// Slots keep document order. Every accessor slot yields raw JSON values.
#[derive(Debug)]
pub struct DynamicModel {
    /// Set when the document is not a mapping
    not_record: Option<&'static str>,
    slots: Vec<DynamicSlot>,
}

impl DynamicModel {
    /// Parse a YAML descriptor
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let doc: serde_yaml::Value =
            serde_yaml::from_str(yaml).map_err(|e| BindError::DescriptorError {
                details: e.to_string(),
            })?;

        let mapping = match doc {
            serde_yaml::Value::Mapping(mapping) => mapping,
            other => {
                return Ok(Self {
                    not_record: Some(yaml_kind(&other)),
                    slots: Vec::new(),
                })
            }
        };

        let mut slots = Vec::with_capacity(mapping.len());
        for (key, decl) in mapping {
            let name = match key {
                serde_yaml::Value::String(name) => name,
                other => {
                    return Err(BindError::DescriptorError {
                        details: format!("slot names must be strings, found {}", yaml_kind(&other)),
                    })
                }
            };
            let decl = if decl.is_null() {
                SlotDecl::default()
            } else {
                serde_yaml::from_value::<SlotDecl>(decl).map_err(|e| {
                    BindError::DescriptorError {
                        details: format!("slot '{}': {}", name, e),
                    }
                })?
            };
            slots.push(DynamicSlot {
                tags: decl.tags(),
                kind: decl.kind,
                name,
                accessor: Accessor::new(),
            });
        }

        Ok(Self {
            not_record: None,
            slots,
        })
    }

    /// Read and parse a YAML descriptor file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn is_record(&self) -> bool {
        self.not_record.is_none()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slot names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|s| s.name.as_str())
    }

    /// Accessor of the slot named `name`
    pub fn accessor(&self, name: &str) -> Option<&Accessor<Value>> {
        self.slots
            .iter()
            .find(|s| s.name == name && s.kind == SlotKind::Accessor)
            .map(|s| &s.accessor)
    }

    /// Read every accessor slot once, in declaration order
    pub fn values(&self) -> Vec<(&str, Result<Value>)> {
        self.slots
            .iter()
            .filter(|s| s.kind == SlotKind::Accessor)
            .map(|s| (s.name.as_str(), s.accessor.get()))
            .collect()
    }
}

impl Model for DynamicModel {
    fn target(&mut self) -> Target<'_> {
        if let Some(kind) = self.not_record {
            return Target::Other(kind);
        }
        Target::Record(
            self.slots
                .iter_mut()
                .map(|slot| match slot.kind {
                    SlotKind::Accessor => {
                        Slot::accessor(&slot.name, slot.tags.clone(), &mut slot.accessor)
                    }
                    SlotKind::Value => Slot::other(&slot.name, slot.tags.clone(), "value"),
                })
                .collect(),
        )
    }
}

fn yaml_kind(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "bool",
        serde_yaml::Value::Number(_) => "number",
        serde_yaml::Value::String(_) => "string",
        serde_yaml::Value::Sequence(_) => "sequence",
        serde_yaml::Value::Mapping(_) => "mapping",
        serde_yaml::Value::Tagged(_) => "tagged value",
    }
}
