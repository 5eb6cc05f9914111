//! Nested document to flat key-space.

use crate::keypath::{encode_segment, join_key};
use serde_json::Value;
use std::collections::BTreeMap;

/// Flat key to leaf value. Ordered by key so output is deterministic.
pub type FlatMap = BTreeMap<String, Value>;

/// Flatten `value` under `prefix`.
///
/// - Mappings recurse with `prefix.key`.
/// - List elements get `prefix[i]`; mapping elements recurse, anything else
///   (including a nested list) is stored as-is.
/// - Scalars are stored under `prefix`.
///
/// Empty mappings and lists produce no entries.
pub fn flatten(value: Value, prefix: &str) -> FlatMap {
    let mut out = FlatMap::new();
    flatten_into(value, prefix, &mut out);
    out
}

/// Flatten into an existing map, overwriting keys that are already present.
pub fn flatten_into(value: Value, prefix: &str, out: &mut FlatMap) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                flatten_into(child, &join_key(prefix, &key), out);
            }
        }
        Value::Array(items) => {
            for (i, item) in items.into_iter().enumerate() {
                let key = encode_segment(prefix, Some(i));
                if item.is_object() {
                    flatten_into(item, &key, out);
                } else {
                    out.insert(key, item);
                }
            }
        }
        scalar => {
            out.insert(prefix.to_string(), scalar);
        }
    }
}
