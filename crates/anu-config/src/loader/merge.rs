//! Deep merge of configuration mappings.

use serde_json::{Map, Value};

/// Merge `overlay` into `base`, key by key.
///
/// A key present on both sides whose values are both mappings is merged
/// recursively. Any other collision is won by the overlay: scalars replace
/// scalars, a scalar replaces a mapping (and the reverse), and lists are
/// replaced wholesale rather than concatenated. Keys present only in `base`
/// are kept; keys present only in `overlay` are appended in overlay order,
/// while replaced keys keep their original position.
pub(crate) fn merge_maps(base: &mut Map<String, Value>, overlay: &Map<String, Value>) {
    for (key, value) in overlay {
        if let (Some(Value::Object(base_child)), Value::Object(overlay_child)) =
            (base.get_mut(key), value)
        {
            merge_maps(base_child, overlay_child);
            continue;
        }
        base.insert(key.clone(), value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn merged(base: Value, overlay: Value) -> Value {
        let mut base = object(base);
        merge_maps(&mut base, &object(overlay));
        Value::Object(base)
    }

    #[test]
    fn nested_maps_merge_and_overlay_wins() {
        assert_eq!(
            merged(
                json!({"logging": {"prefix": "base", "port": 1}, "keep": true}),
                json!({"logging": {"prefix": "over", "host": "h"}, "extra": [1]}),
            ),
            json!({
                "logging": {"prefix": "over", "port": 1, "host": "h"},
                "keep": true,
                "extra": [1]
            })
        );
    }

    #[test]
    fn scalar_and_tree_conflicts_take_overlay() {
        assert_eq!(
            merged(
                json!({"a": {"nested": 1}, "b": 2, "c": [1, 2]}),
                json!({"a": "flat", "b": {"nested": 3}, "c": [9]}),
            ),
            json!({"a": "flat", "b": {"nested": 3}, "c": [9]})
        );
    }

    #[test]
    fn replaced_keys_keep_their_position() {
        let value = merged(json!({"first": 1, "second": 2}), json!({"third": 3, "first": 10}));
        let keys: Vec<_> = object(value).keys().cloned().collect();
        assert_eq!(keys, vec!["first", "second", "third"]);
    }
}
