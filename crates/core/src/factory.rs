//! Object factory and type dispatch
//!
//! Relationship endpoints return heterogeneous collections. Each raw entry is
//! turned into a [`DirectoryObject`] whose tag comes from the entry's OData
//! discriminator:
//!
//! 1. a recognised discriminator selects the matching type
//! 2. an unrecognised discriminator selects the generic fallback
//! 3. no discriminator at all selects the caller's hint, else the fallback
//!
//! [`filter_by_type`] narrows a raw collection before any construction
//! happens, so discarded entries are never built.

use std::sync::Arc;

use dirgraph_domain::{ObjectType, Properties};
use serde_json::Value;
use tracing::{debug, warn};

use crate::context::DirectoryContext;
use crate::object::DirectoryObject;

/// Trait for turning raw property bags into typed objects
pub trait ObjectFactory: Send + Sync {
    fn construct(
        &self,
        context: Arc<DirectoryContext>,
        raw: Properties,
        hint: Option<ObjectType>,
    ) -> DirectoryObject;
}

/// Discriminator-table dispatch
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultObjectFactory;

impl ObjectFactory for DefaultObjectFactory {
    fn construct(
        &self,
        context: Arc<DirectoryContext>,
        raw: Properties,
        hint: Option<ObjectType>,
    ) -> DirectoryObject {
        let object_type = resolve_type(&raw, hint);
        DirectoryObject::new(context, object_type, raw)
    }
}

/// Decide the type tag for a raw entry.
pub fn resolve_type(raw: &Properties, hint: Option<ObjectType>) -> ObjectType {
    match ObjectType::discriminator_of(raw) {
        Some(discriminator) => ObjectType::from_discriminator(discriminator).unwrap_or_else(|| {
            debug!(discriminator, "unrecognised discriminator, using generic directory object");
            ObjectType::DirectoryObject
        }),
        None => hint.unwrap_or(ObjectType::DirectoryObject),
    }
}

/// Keep only entries whose discriminator maps to one of `wanted`.
///
/// Entries without a recognised discriminator cannot be proven to match and
/// are dropped. Order is preserved.
pub fn filter_by_type(entries: Vec<Value>, wanted: &[ObjectType]) -> Vec<Value> {
    entries
        .into_iter()
        .filter(|entry| {
            entry
                .as_object()
                .and_then(ObjectType::declared_by)
                .is_some_and(|object_type| wanted.contains(&object_type))
        })
        .collect()
}

/// Unwrap a raw entry into its property bag, skipping non-object entries.
pub fn entry_properties(entry: Value) -> Option<Properties> {
    match entry {
        Value::Object(properties) => Some(properties),
        other => {
            warn!(entry = %other, "skipping non-object entry in directory collection");
            None
        }
    }
}
