//! Structural delta: the nested diff description consumed by the renderer.
//!
//! On the wire a delta node carries no discriminant. Its variant is implied
//! by shape alone:
//!
//! | Variant  | Shape                                   |
//! |----------|-----------------------------------------|
//! | Added    | `[new]`                                 |
//! | Modified | `[old, new]`                            |
//! | Deleted  | `[old, 0, 0]`                           |
//! | Moved    | `[_, to_index, 3]`                      |
//! | Array    | `{ "_t": "a", "<idx>": .., "_<idx>": .. }` |
//! | Object   | any other mapping `{ "<key>": .. }`     |
//!
//! [`classify`] answers the shape question for a single raw node. [`Delta`]
//! is the decoded tree: every node is classified exactly once at ingestion and
//! everything downstream matches on the explicit variant.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Map;
use tracing::debug;

use crate::error::{TypeError, TypeResult};
use crate::JsonValue;

/// Field that marks a mapping as an array delta when it equals `"a"`.
pub const ARRAY_MARKER_FIELD: &str = "_t";

/// Deepest delta node decoded by [`Delta::decode`] and [`Delta::decode_strict`].
pub const DEFAULT_MAX_DEPTH: usize = 256;

const ARRAY_MARKER_VALUE: &str = "a";
const DELETED_MARKER: f64 = 0.0;
const MOVED_MARKER: f64 = 3.0;

/// The variant a raw delta node represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeltaKind {
    Added,
    Deleted,
    Modified,
    Moved,
    Object,
    Array,
    /// The node matches none of the known shapes.
    Unrecognized,
}

impl fmt::Display for DeltaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Added => "added",
            Self::Deleted => "deleted",
            Self::Modified => "modified",
            Self::Moved => "moved",
            Self::Object => "object",
            Self::Array => "array",
            Self::Unrecognized => "unrecognized",
        };
        f.write_str(name)
    }
}

fn slot_equals(items: &[JsonValue], index: usize, marker: f64) -> bool {
    items
        .get(index)
        .and_then(JsonValue::as_f64)
        .is_some_and(|n| n == marker)
}

fn is_array_marked(map: &Map<String, JsonValue>) -> bool {
    map.get(ARRAY_MARKER_FIELD)
        .and_then(JsonValue::as_str)
        .is_some_and(|t| t == ARRAY_MARKER_VALUE)
}

/// `[new]`
pub fn is_added(node: &JsonValue) -> bool {
    node.as_array().is_some_and(|items| items.len() == 1)
}

/// `[old, 0, 0]`
pub fn is_deleted(node: &JsonValue) -> bool {
    node.as_array().is_some_and(|items| {
        items.len() == 3
            && slot_equals(items, 1, DELETED_MARKER)
            && slot_equals(items, 2, DELETED_MARKER)
    })
}

/// `[old, new]`
pub fn is_modified(node: &JsonValue) -> bool {
    node.as_array().is_some_and(|items| items.len() == 2)
}

/// `[_, to_index, 3]`
pub fn is_moved(node: &JsonValue) -> bool {
    node.as_array()
        .is_some_and(|items| items.len() == 3 && slot_equals(items, 2, MOVED_MARKER))
}

/// A mapping carrying `"_t": "a"`.
pub fn is_array_delta(node: &JsonValue) -> bool {
    node.as_object().is_some_and(is_array_marked)
}

/// Any mapping that is not an array delta.
pub fn is_object_delta(node: &JsonValue) -> bool {
    node.as_object().is_some_and(|map| !is_array_marked(map))
}

/// Classify a raw delta node by shape. Never fails: shapes outside the wire
/// contract (scalars, text diffs, other sequence lengths) are
/// [`DeltaKind::Unrecognized`].
pub fn classify(node: &JsonValue) -> DeltaKind {
    if is_added(node) {
        DeltaKind::Added
    } else if is_deleted(node) {
        DeltaKind::Deleted
    } else if is_moved(node) {
        DeltaKind::Moved
    } else if is_modified(node) {
        DeltaKind::Modified
    } else if is_array_delta(node) {
        DeltaKind::Array
    } else if is_object_delta(node) {
        DeltaKind::Object
    } else {
        DeltaKind::Unrecognized
    }
}

/// Which side of an array diff an entry key addresses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ArrayKey {
    /// Plain `"<idx>"` key: an index into the `to` array.
    New(usize),
    /// Underscore-prefixed `"_<idx>"` key: an index into the `from` array.
    Old(usize),
}

impl ArrayKey {
    /// Parse a wire key. Returns `None` for the `_t` marker and for keys
    /// that are not indices.
    pub fn parse(key: &str) -> Option<Self> {
        match key.strip_prefix('_') {
            Some(rest) => rest.parse().ok().map(Self::Old),
            None => key.parse().ok().map(Self::New),
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Self::New(i) | Self::Old(i) => *i,
        }
    }
}

impl fmt::Display for ArrayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::New(i) => write!(f, "{i}"),
            Self::Old(i) => write!(f, "_{i}"),
        }
    }
}

/// One entry of an array delta.
#[derive(Clone, Debug, PartialEq)]
pub struct ArrayEntry {
    pub key: ArrayKey,
    pub delta: Delta,
}

/// A decoded structural delta node.
#[derive(Clone, Debug, PartialEq)]
pub enum Delta {
    /// Present only in `to`.
    Added(JsonValue),
    /// Present only in `from`.
    Deleted(JsonValue),
    /// Scalar or whole-subtree replacement.
    Modified { old: JsonValue, new: JsonValue },
    /// Array element relocated; its value is unchanged.
    Moved { to_index: Option<usize> },
    /// Per-key changes of a nested object.
    Object(BTreeMap<String, Delta>),
    /// Per-index changes of a nested array, in wire key order.
    Array(Vec<ArrayEntry>),
    /// A node outside the wire contract, kept verbatim.
    Unrecognized(JsonValue),
    /// A node nested below the decoding depth limit. Its subtree is not
    /// inspected.
    Truncated,
}

impl Delta {
    /// Decode a raw delta. Total: unknown shapes become
    /// [`Delta::Unrecognized`] wherever they occur in the tree, and nodes
    /// deeper than [`DEFAULT_MAX_DEPTH`] become [`Delta::Truncated`].
    pub fn decode(raw: &JsonValue) -> Self {
        Self::decode_with_limit(raw, DEFAULT_MAX_DEPTH)
    }

    /// Lenient decoding with an explicit depth limit. The root is depth 0.
    pub fn decode_with_limit(raw: &JsonValue, max_depth: usize) -> Self {
        let decoder = Decoder { strict: false, max_depth };
        // Lenient decoding cannot fail.
        decoder.decode_at(raw, "", 0).unwrap_or(Self::Truncated)
    }

    /// Decode a raw delta, rejecting the first node that matches no known
    /// shape or lies deeper than [`DEFAULT_MAX_DEPTH`].
    pub fn decode_strict(raw: &JsonValue) -> TypeResult<Self> {
        Self::decode_strict_with_limit(raw, DEFAULT_MAX_DEPTH)
    }

    /// Strict decoding with an explicit depth limit.
    pub fn decode_strict_with_limit(raw: &JsonValue, max_depth: usize) -> TypeResult<Self> {
        Decoder { strict: true, max_depth }.decode_at(raw, "", 0)
    }

    /// The variant tag of this node. A truncated node reports
    /// [`DeltaKind::Unrecognized`] since its shape was never inspected.
    pub fn kind(&self) -> DeltaKind {
        match self {
            Self::Added(_) => DeltaKind::Added,
            Self::Deleted(_) => DeltaKind::Deleted,
            Self::Modified { .. } => DeltaKind::Modified,
            Self::Moved { .. } => DeltaKind::Moved,
            Self::Object(_) => DeltaKind::Object,
            Self::Array(_) => DeltaKind::Array,
            Self::Unrecognized(_) | Self::Truncated => DeltaKind::Unrecognized,
        }
    }

    /// Returns `true` for a container delta with no entries.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Object(entries) => entries.is_empty(),
            Self::Array(entries) => entries.is_empty(),
            _ => false,
        }
    }
}

struct Decoder {
    strict: bool,
    max_depth: usize,
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        "/".into()
    } else {
        path.into()
    }
}

impl Decoder {
    fn decode_at(&self, raw: &JsonValue, path: &str, depth: usize) -> TypeResult<Delta> {
        if depth > self.max_depth {
            if self.strict {
                return Err(TypeError::DepthExceeded {
                    path: display_path(path),
                    max_depth: self.max_depth,
                });
            }
            debug!(path, max_depth = self.max_depth, "delta nested below depth limit; not decoded");
            return Ok(Delta::Truncated);
        }

        let kind = classify(raw);
        let delta = match (kind, raw) {
            (DeltaKind::Added, JsonValue::Array(items)) => Delta::Added(items[0].clone()),
            (DeltaKind::Deleted, JsonValue::Array(items)) => Delta::Deleted(items[0].clone()),
            (DeltaKind::Modified, JsonValue::Array(items)) => Delta::Modified {
                old: items[0].clone(),
                new: items[1].clone(),
            },
            (DeltaKind::Moved, JsonValue::Array(items)) => Delta::Moved {
                to_index: items[1].as_u64().and_then(|i| usize::try_from(i).ok()),
            },
            (DeltaKind::Object, JsonValue::Object(map)) => {
                let mut entries = BTreeMap::new();
                for (key, child) in map {
                    let child_path = format!("{path}/{key}");
                    entries.insert(key.clone(), self.decode_at(child, &child_path, depth + 1)?);
                }
                Delta::Object(entries)
            }
            (DeltaKind::Array, JsonValue::Object(map)) => {
                let mut entries = Vec::with_capacity(map.len().saturating_sub(1));
                for (key, child) in map {
                    if key == ARRAY_MARKER_FIELD {
                        continue;
                    }
                    let Some(array_key) = ArrayKey::parse(key) else {
                        debug!(path, key = %key, "dropping non-index array delta key");
                        continue;
                    };
                    let child_path = format!("{path}/{array_key}");
                    entries.push(ArrayEntry {
                        key: array_key,
                        delta: self.decode_at(child, &child_path, depth + 1)?,
                    });
                }
                Delta::Array(entries)
            }
            _ if self.strict => {
                return Err(TypeError::UnrecognizedDelta {
                    path: display_path(path),
                    shape: raw.to_string(),
                });
            }
            _ => Delta::Unrecognized(raw.clone()),
        };
        Ok(delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classifies_every_wire_shape() {
        assert_eq!(classify(&json!([1])), DeltaKind::Added);
        assert_eq!(classify(&json!([1, 2])), DeltaKind::Modified);
        assert_eq!(classify(&json!([1, 0, 0])), DeltaKind::Deleted);
        assert_eq!(classify(&json!(["", 4, 3])), DeltaKind::Moved);
        assert_eq!(classify(&json!({"_t": "a", "0": [1]})), DeltaKind::Array);
        assert_eq!(classify(&json!({"a": [1]})), DeltaKind::Object);
        assert_eq!(classify(&json!({})), DeltaKind::Object);
    }

    #[test]
    fn unknown_shapes_are_unrecognized() {
        assert_eq!(classify(&json!(null)), DeltaKind::Unrecognized);
        assert_eq!(classify(&json!(7)), DeltaKind::Unrecognized);
        assert_eq!(classify(&json!([])), DeltaKind::Unrecognized);
        assert_eq!(classify(&json!([1, 2, 3, 4])), DeltaKind::Unrecognized);
        // text diff
        assert_eq!(classify(&json!(["@@ -1 +1 @@", 0, 2])), DeltaKind::Unrecognized);
    }

    #[test]
    fn zero_markers_accept_float_zero() {
        assert_eq!(classify(&json!([1, 0.0, 0.0])), DeltaKind::Deleted);
        assert_eq!(classify(&json!([1, "0", 0])), DeltaKind::Unrecognized);
    }

    #[test]
    fn array_marker_must_equal_a() {
        assert_eq!(classify(&json!({"_t": "b"})), DeltaKind::Object);
        assert!(is_object_delta(&json!({"_t": 1})));
        assert!(!is_array_delta(&json!([{"_t": "a"}])));
    }

    #[test]
    fn array_key_parsing() {
        assert_eq!(ArrayKey::parse("3"), Some(ArrayKey::New(3)));
        assert_eq!(ArrayKey::parse("_12"), Some(ArrayKey::Old(12)));
        assert_eq!(ArrayKey::parse("_t"), None);
        assert_eq!(ArrayKey::parse("x"), None);
        assert_eq!(ArrayKey::Old(2).to_string(), "_2");
    }

    #[test]
    fn decodes_nested_object_delta() {
        let raw = json!({
            "name": ["old", "new"],
            "tags": {"_t": "a", "_0": ["x", 0, 0], "1": ["y"], "_2": ["", 0, 3]},
            "meta": {"owner": ["bob"]}
        });

        let Delta::Object(entries) = Delta::decode(&raw) else {
            panic!("expected object delta");
        };
        assert_eq!(
            entries["name"],
            Delta::Modified { old: json!("old"), new: json!("new") }
        );
        match &entries["tags"] {
            Delta::Array(items) => {
                assert_eq!(items.len(), 3);
                assert!(items.contains(&ArrayEntry {
                    key: ArrayKey::Old(0),
                    delta: Delta::Deleted(json!("x")),
                }));
                assert!(items.contains(&ArrayEntry {
                    key: ArrayKey::New(1),
                    delta: Delta::Added(json!("y")),
                }));
                assert!(items.contains(&ArrayEntry {
                    key: ArrayKey::Old(2),
                    delta: Delta::Moved { to_index: Some(0) },
                }));
            }
            other => panic!("expected array delta, got {other:?}"),
        }
        assert_eq!(entries["meta"].kind(), DeltaKind::Object);
    }

    #[test]
    fn lenient_decode_keeps_unrecognized_nodes() {
        let raw = json!({"a": "not a delta", "b": [1]});
        let Delta::Object(entries) = Delta::decode(&raw) else {
            panic!("expected object delta");
        };
        assert_eq!(entries["a"], Delta::Unrecognized(json!("not a delta")));
        assert_eq!(entries["b"], Delta::Added(json!(1)));
    }

    #[test]
    fn strict_decode_reports_path() {
        let raw = json!({"outer": {"list": {"_t": "a", "_1": [1, 2, 3, 4]}}});
        let err = Delta::decode_strict(&raw).unwrap_err();
        match err {
            TypeError::UnrecognizedDelta { path, .. } => assert_eq!(path, "/outer/list/_1"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn strict_decode_rejects_top_level_scalar() {
        let err = Delta::decode_strict(&json!(true)).unwrap_err();
        assert!(err.to_string().contains("at /"));
    }

    #[test]
    fn empty_container_deltas() {
        assert!(Delta::decode(&json!({})).is_empty());
        assert!(Delta::decode(&json!({"_t": "a"})).is_empty());
        assert!(!Delta::decode(&json!([1])).is_empty());
    }

    fn nested_object_delta(levels: usize) -> JsonValue {
        let mut raw = json!([1]);
        for _ in 0..levels {
            let mut map = Map::new();
            map.insert("k".to_string(), raw);
            raw = JsonValue::Object(map);
        }
        raw
    }

    fn object_depth(delta: &Delta) -> (usize, &Delta) {
        let mut depth = 0;
        let mut node = delta;
        while let Delta::Object(entries) = node {
            node = &entries["k"];
            depth += 1;
        }
        (depth, node)
    }

    #[test]
    fn lenient_decode_stops_at_depth_limit() {
        let raw = nested_object_delta(10);
        let delta = Delta::decode_with_limit(&raw, 4);
        let (depth, leaf) = object_depth(&delta);
        assert_eq!(depth, 5);
        assert_eq!(*leaf, Delta::Truncated);
        assert_eq!(leaf.kind(), DeltaKind::Unrecognized);

        let deep = Delta::decode_with_limit(&raw, 10);
        let (depth, leaf) = object_depth(&deep);
        assert_eq!(depth, 10);
        assert_eq!(*leaf, Delta::Added(json!(1)));
    }

    #[test]
    fn strict_decode_rejects_excess_depth() {
        let raw = nested_object_delta(6);
        let err = Delta::decode_strict_with_limit(&raw, 3).unwrap_err();
        assert_eq!(
            err,
            TypeError::DepthExceeded {
                path: "/k/k/k/k".into(),
                max_depth: 3,
            }
        );
        assert!(Delta::decode_strict_with_limit(&raw, 6).is_ok());
    }

    #[test]
    fn pathologically_deep_delta_does_not_overflow() {
        let raw = nested_object_delta(20_000);
        let delta = Delta::decode(&raw);
        let (depth, leaf) = object_depth(&delta);
        assert_eq!(depth, DEFAULT_MAX_DEPTH + 1);
        assert_eq!(*leaf, Delta::Truncated);
        assert!(matches!(
            Delta::decode_strict(&raw),
            Err(TypeError::DepthExceeded { .. })
        ));
        // Dropping a 20k-level `Value` recurses once per level.
        std::mem::forget(raw);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn arb_json() -> impl Strategy<Value = JsonValue> {
            let leaf = prop_oneof![
                Just(JsonValue::Null),
                any::<bool>().prop_map(JsonValue::from),
                any::<i32>().prop_map(JsonValue::from),
                "[a-z_]{0,3}".prop_map(JsonValue::from),
            ];
            leaf.prop_recursive(3, 24, 4, |inner| {
                prop_oneof![
                    prop::collection::vec(inner.clone(), 0..5).prop_map(JsonValue::from),
                    prop::collection::btree_map("_?[a-c0-9t]", inner, 0..4).prop_map(|m| {
                        JsonValue::Object(m.into_iter().collect())
                    }),
                ]
            })
        }

        proptest! {
            #[test]
            fn classify_never_panics_and_decode_agrees(raw in arb_json()) {
                let kind = classify(&raw);
                prop_assert_eq!(Delta::decode(&raw).kind(), kind);
            }

            #[test]
            fn shape_predicates_are_mutually_exclusive(raw in arb_json()) {
                let hits = [
                    is_added(&raw),
                    is_deleted(&raw),
                    is_moved(&raw),
                    is_modified(&raw),
                    is_array_delta(&raw),
                    is_object_delta(&raw),
                ]
                .iter()
                .filter(|hit| **hit)
                .count();
                prop_assert!(hits <= 1);
            }
        }
    }
}
