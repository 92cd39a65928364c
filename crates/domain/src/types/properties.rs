//! Schema-less property bag
//!
//! Directory entities are heterogeneous JSON objects. The core keeps them as
//! an ordered map and only types individual fields at the edges.

use serde_json::{Map, Value};

use crate::constants::{DISPLAY_NAME_PROPERTY, ID_PROPERTY};

/// Property name → JSON value
pub type Properties = Map<String, Value>;

/// Typed read accessors over a [`Properties`] bag.
pub trait PropertyBagExt {
    fn as_string(&self, key: &str) -> Option<&str>;

    fn as_bool(&self, key: &str) -> Option<bool>;

    /// String elements of an array property; non-string elements are skipped.
    fn as_string_list(&self, key: &str) -> Vec<&str>;

    /// Stable remote identifier, ignoring empty strings.
    fn id(&self) -> Option<&str> {
        self.as_string(ID_PROPERTY).filter(|id| !id.is_empty())
    }

    fn display_name(&self) -> Option<&str> {
        self.as_string(DISPLAY_NAME_PROPERTY)
    }
}

impl PropertyBagExt for Properties {
    fn as_string(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    fn as_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    fn as_string_list(&self, key: &str) -> Vec<&str> {
        self.get(key)
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }
}

/// Shallow merge: keys in `patch` overwrite keys in `base`.
///
/// Returns a new bag and leaves `base` untouched so callers can stage the
/// result until a remote write succeeds.
pub fn merge_properties(base: &Properties, patch: Properties) -> Properties {
    let mut merged = base.clone();
    for (key, value) in patch {
        merged.insert(key, value);
    }
    merged
}
