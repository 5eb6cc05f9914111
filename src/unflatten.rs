//! Flat key-space back to a nested document.
//!
//! Keys are decoded with the key-path codec and walked from the root, building
//! mappings for plain segments and lists for indexed ones. Lists are padded
//! with vacant slots up to the highest index seen. A vacant slot is distinct
//! from an explicit `null` while the tree is being built: it may still turn
//! into a mapping, an explicit `null` may not. Both come out as `null`.
//!
//! Two keys that disagree about the shape of a shared path fail with
//! [`ConvertError::PathConflict`], whatever order they arrive in. An index
//! above [`MAX_INDEX`] fails with [`ConvertError::IndexTooLarge`] before any
//! padding is allocated.

use crate::error::{ConvertError, ConvertResult};
use crate::keypath::{Segment, split_key};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Highest list index accepted when expanding a key.
pub const MAX_INDEX: usize = 1 << 20;

#[derive(Debug)]
enum Node {
    /// Padding slot in a list.
    Vacant,
    Leaf(Value),
    Map(BTreeMap<String, Node>),
    List(Vec<Node>),
}

impl Node {
    fn into_value(self) -> Value {
        match self {
            Node::Vacant => Value::Null,
            Node::Leaf(value) => value,
            Node::Map(entries) => Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, v.into_value()))
                    .collect::<Map<String, Value>>(),
            ),
            Node::List(items) => Value::Array(items.into_iter().map(Node::into_value).collect()),
        }
    }
}

/// Rebuild a nested document from flat `(key, value)` pairs.
///
/// The result is always a mapping at the root.
pub fn unflatten<I>(flat: I) -> ConvertResult<Value>
where
    I: IntoIterator<Item = (String, Value)>,
{
    let mut root: BTreeMap<String, Node> = BTreeMap::new();

    for (key, value) in flat {
        let segments = split_key(&key);
        let Some((last, parents)) = segments.split_last() else {
            continue;
        };
        if let Some(index) = segments
            .iter()
            .filter_map(|s| s.index)
            .find(|&i| i > MAX_INDEX)
        {
            return Err(ConvertError::IndexTooLarge { key, index });
        }

        let mut current = &mut root;
        for (depth, segment) in parents.iter().enumerate() {
            current = match descend(current, segment) {
                Some(child) => child,
                None => return Err(ConvertError::conflict(&key, path_of(&segments[..=depth]))),
            };
        }

        if !assign(current, last, value) {
            return Err(ConvertError::conflict(&key, path_of(&segments)));
        }
    }

    Ok(Node::Map(root).into_value())
}

/// Step into the mapping addressed by a non-terminal segment, creating it if needed.
fn descend<'a>(
    map: &'a mut BTreeMap<String, Node>,
    segment: &Segment,
) -> Option<&'a mut BTreeMap<String, Node>> {
    let slot = match segment.index {
        None => map
            .entry(segment.name.clone())
            .or_insert_with(|| Node::Map(BTreeMap::new())),
        Some(index) => {
            let list = map
                .entry(segment.name.clone())
                .or_insert_with(|| Node::List(Vec::new()));
            let Node::List(items) = list else {
                return None;
            };
            let slot = slot_at(items, index);
            if matches!(slot, Node::Vacant) {
                *slot = Node::Map(BTreeMap::new());
            }
            slot
        }
    };

    match slot {
        Node::Map(child) => Some(child),
        _ => None,
    }
}

/// Store `value` at the terminal segment. Returns false if the slot is taken.
fn assign(map: &mut BTreeMap<String, Node>, segment: &Segment, value: Value) -> bool {
    match segment.index {
        None => {
            if map.contains_key(&segment.name) {
                return false;
            }
            map.insert(segment.name.clone(), Node::Leaf(value));
            true
        }
        Some(index) => {
            let list = map
                .entry(segment.name.clone())
                .or_insert_with(|| Node::List(Vec::new()));
            let Node::List(items) = list else {
                return false;
            };
            let slot = slot_at(items, index);
            if !matches!(slot, Node::Vacant) {
                return false;
            }
            *slot = Node::Leaf(value);
            true
        }
    }
}

fn slot_at(items: &mut Vec<Node>, index: usize) -> &mut Node {
    if items.len() <= index {
        items.resize_with(index + 1, || Node::Vacant);
    }
    &mut items[index]
}

fn path_of(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(Segment::encode)
        .collect::<Vec<_>>()
        .join(".")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flatten::{FlatMap, flatten};
    use serde_json::json;

    fn pairs(value: Value) -> Vec<(String, Value)> {
        match value {
            Value::Object(map) => map.into_iter().collect(),
            _ => panic!("expected object"),
        }
    }

    fn unflat(value: Value) -> Value {
        unflatten(pairs(value)).unwrap()
    }

    #[test]
    fn test_plain_keys_round_trip() {
        let flat = json!({"a": "1", "b": 2, "c": true, "d": null});
        let nested = unflat(flat.clone());
        assert_eq!(nested, flat);
        assert_eq!(serde_json::to_value(flatten(nested, "")).unwrap(), flat);
    }

    #[test]
    fn test_dotted_keys_build_mappings() {
        let nested = unflat(json!({
            "db.host": "localhost",
            "db.port": 5432,
            "db.pool.size": 10
        }));
        assert_eq!(
            nested,
            json!({"db": {"host": "localhost", "port": 5432, "pool": {"size": 10}}})
        );
    }

    #[test]
    fn test_list_of_mappings_round_trip() {
        let original = json!({"list": [{"a": 1}, {"a": 2}]});
        let flat = flatten(original.clone(), "");
        assert_eq!(
            serde_json::to_value(&flat).unwrap(),
            json!({"list[0].a": 1, "list[1].a": 2})
        );
        assert_eq!(unflatten(flat).unwrap(), original);
    }

    #[test]
    fn test_sparse_list_is_null_padded() {
        let nested = unflat(json!({"items[3]": "x"}));
        assert_eq!(nested, json!({"items": [null, null, null, "x"]}));
    }

    #[test]
    fn test_vacant_slot_becomes_mapping() {
        let nested = unflat(json!({"items[2]": "late", "items[0].name": "first"}));
        assert_eq!(nested, json!({"items": [{"name": "first"}, null, "late"]}));
    }

    #[test]
    fn test_mixed_nesting() {
        let nested = unflat(json!({
            "svc.replicas[0].ports[1]": 443,
            "svc.replicas[0].ports[0]": 80,
            "svc.replicas[1].name": "b"
        }));
        assert_eq!(
            nested,
            json!({"svc": {"replicas": [{"ports": [80, 443]}, {"name": "b"}]}})
        );
    }

    #[test]
    fn test_malformed_index_is_literal_key() {
        let nested = unflat(json!({"item[x]": "v", "cfg.item[x].y": 1}));
        assert_eq!(nested, json!({"item[x]": "v", "cfg": {"item[x]": {"y": 1}}}));
    }

    #[test]
    fn test_raw_list_leaf_is_kept() {
        let original = json!({"matrix": [[1, 2], [3]]});
        let nested = unflatten(flatten(original.clone(), "")).unwrap();
        assert_eq!(nested, original);
    }

    #[test]
    fn test_empty_collections_are_lost() {
        let original = json!({"arr": [], "name": "x"});
        let flat = flatten(original, "");
        assert!(!flat.contains_key("arr"));
        let nested = unflatten(flat).unwrap();
        assert_eq!(nested, json!({"name": "x"}));
    }

    #[test]
    fn test_huge_index_is_rejected() {
        for key in ["a[18446744073709551615]", "a[100000000000]", "a[2000000].b"] {
            let err = unflatten(vec![(key.to_string(), json!(1))]).unwrap_err();
            assert!(
                matches!(err, ConvertError::IndexTooLarge { .. }),
                "{key}: {err}"
            );
        }
    }

    #[test]
    fn test_index_just_over_limit_is_rejected() {
        let over = format!("a[{}]", MAX_INDEX + 1);
        match unflatten(vec![(over.clone(), json!(1))]).unwrap_err() {
            ConvertError::IndexTooLarge { key, index } => {
                assert_eq!(key, over);
                assert_eq!(index, MAX_INDEX + 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_input_gives_empty_mapping() {
        assert_eq!(unflatten(FlatMap::new()).unwrap(), json!({}));
    }

    #[test]
    fn test_scalar_then_mapping_conflicts() {
        let err = unflatten(pairs(json!({"a": 1, "a.b": 2}))).unwrap_err();
        assert!(matches!(err, ConvertError::PathConflict { .. }));
    }

    #[test]
    fn test_mapping_vs_list_conflicts() {
        let err = unflatten(pairs(json!({"a.b": 1, "a[0]": 2}))).unwrap_err();
        assert!(matches!(err, ConvertError::PathConflict { .. }));
    }

    #[test]
    fn test_explicit_null_is_not_a_placeholder() {
        let err = unflatten(pairs(json!({"a[0]": null, "a[0].b": 1}))).unwrap_err();
        assert!(matches!(err, ConvertError::PathConflict { .. }));
    }

    #[test]
    fn test_aliased_indices_conflict() {
        let err = unflatten(pairs(json!({"a[1]": "x", "a[01]": "y"}))).unwrap_err();
        match err {
            ConvertError::PathConflict { path, .. } => assert_eq!(path, "a[1]"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_conflicts_do_not_depend_on_order() {
        let forward = vec![
            ("a.b".to_string(), json!(1)),
            ("a".to_string(), json!(2)),
        ];
        let backward: Vec<_> = forward.iter().cloned().rev().collect();
        assert!(unflatten(forward).is_err());
        assert!(unflatten(backward).is_err());
    }

    #[test]
    fn test_result_does_not_depend_on_order() {
        let entries = vec![
            ("x[1].y".to_string(), json!("b")),
            ("x[0].y".to_string(), json!("a")),
            ("z".to_string(), json!(true)),
        ];
        let reversed: Vec<_> = entries.iter().cloned().rev().collect();
        assert_eq!(unflatten(entries).unwrap(), unflatten(reversed).unwrap());
    }
}
