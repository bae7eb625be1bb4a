//! Model binder - installs accessors into every slot of a model
//!
//! Slots are processed in declaration order. For each slot:
//! 1. the shape must be an accessor (else panic: descriptor defect)
//! 2. the `source` tag must be present and non-empty (else panic)
//! 3. the named factory must be registered (else `MissingFactory`)
//!
//! Binding is not atomic: when slot N fails with `MissingFactory`, slots
//! 0..N keep the accessors already installed.

use std::rc::Rc;

use tracing::{debug, instrument, warn};

use crate::accessor::Binding;
use crate::error::{BindError, Defect, Result};
use crate::model::{Model, SlotShape, Target};
use crate::registry::FactoryRegistry;

/// Bind every slot of `model` to its source in `registry`
///
/// # Panics
///
/// Panics when a slot is not an accessor or has no `source` tag. Those are
/// defects in the model declaration, not runtime conditions.
#[instrument(skip_all, fields(allow_cache = registry.allow_cache()))]
pub fn bind<M>(model: &mut M, registry: &FactoryRegistry) -> Result<()>
where
    M: Model + ?Sized,
{
    let slots = match model.target() {
        Target::Record(slots) => slots,
        Target::Other(kind) => {
            return Err(BindError::InvalidTarget {
                kind: kind.to_string(),
            })
        }
    };

    for slot in slots {
        let target = match slot.shape {
            SlotShape::Accessor(target) => target,
            SlotShape::Other(found) => defect(Defect::InvalidSlotShape {
                slot: slot.name.to_string(),
                found: found.to_string(),
            }),
        };

        let Some(source_name) = slot.tags.source_name() else {
            defect(Defect::MissingSourceTag {
                slot: slot.name.to_string(),
            })
        };

        let Some(factory) = registry.factory(source_name) else {
            warn!(slot = slot.name, source = source_name, "no factory for source");
            return Err(BindError::MissingFactory {
                source_name: source_name.to_string(),
            });
        };

        let field = slot.tags.effective_field(slot.name);
        debug!(
            slot = slot.name,
            source = source_name,
            field,
            factory = factory.kind(),
            output = target.output_type(),
            "binding slot"
        );
        target.install(Binding::new(
            slot.name,
            source_name,
            field,
            Rc::clone(factory),
            registry.allow_cache(),
        ));
    }

    Ok(())
}

fn defect(defect: Defect) -> ! {
    panic!("{defect}")
}
