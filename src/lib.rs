//! bigmodel - bind model slots to named data sources
//!
//! A [`FactoryRegistry`] maps source names to [`SourceFactory`]s. [`bind`]
//! walks a [`Model`] and installs an [`Accessor`] into every slot, reading
//! the `source` and `field` tags to decide where the value comes from.
//!
//! ```
//! use bigmodel::{bind, model, Accessor, FactoryRegistry, Source};
//! use serde_json::json;
//!
//! model! {
//!     pub struct Hello {
//!         #[bind(source = "A", field = "UserId")]
//!         pub id: Accessor<i64>,
//!         #[bind(source = "B", field = "UserName")]
//!         pub user_name: Accessor<String>,
//!     }
//! }
//!
//! let registry = FactoryRegistry::new()
//!     .set_allow_cache(true)
//!     .with_source("A", json!({"UserId": 100}))
//!     .with_factory("B", || Source::getter(|_: &str| json!("guanming")));
//!
//! let mut hello = Hello::default();
//! bind(&mut hello, &registry).unwrap();
//! assert_eq!(hello.id.get().unwrap(), 100);
//! assert_eq!(hello.user_name.get().unwrap(), "guanming");
//! ```

pub mod accessor;
pub mod binder;
pub mod config;
pub mod error;
pub mod factory;
pub mod model;
pub mod registry;
pub mod source;
pub mod tags;

pub use accessor::{Accessor, Bindable, Binding};
pub use binder::bind;
pub use config::{RegistryConfig, SourceConfig};
pub use error::{BindError, Defect, FixSuggestion, Result};
pub use factory::SourceFactory;
pub use model::{DynamicModel, Model, Slot, SlotShape, Target};
pub use registry::FactoryRegistry;
pub use source::{Getter, Source};
pub use tags::Tags;
