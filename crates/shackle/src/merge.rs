//! Deep-merge and cleanup primitives for configuration values.

use serde_json::{Map, Value};

/// Recursively merge `incoming` into `target`.
///
/// Objects merge key by key, arrays concatenate, and everything else is
/// replaced by the incoming value. Concatenation (rather than replacement)
/// is deliberate: overlay merges accumulate lists such as entry files and
/// rule uses.
pub fn merge_values(target: &mut Value, incoming: &Value) {
    match (target, incoming) {
        (Value::Object(target_map), Value::Object(incoming_map)) => {
            for (key, value) in incoming_map {
                merge_values(
                    target_map.entry(key.clone()).or_insert(Value::Null),
                    value,
                );
            }
        }
        (Value::Array(target_items), Value::Array(incoming_items)) => {
            target_items.extend(incoming_items.iter().cloned());
        }
        (slot, _) => {
            *slot = incoming.clone();
        }
    }
}

/// Shallow cleanup applied at the end of materialization: drop entries whose
/// value is null, an empty array, or an empty object.
pub fn clean(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, value)| !is_empty_value(value))
                .collect(),
        ),
        other => other,
    }
}

/// `clean` an object and collapse it to `None` when nothing remains.
pub(crate) fn clean_to_option(map: Map<String, Value>) -> Option<Value> {
    match clean(Value::Object(map)) {
        Value::Object(map) if map.is_empty() => None,
        other => Some(other),
    }
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn objects_merge_recursively() {
        let mut target = json!({"a": {"x": 1}});
        merge_values(&mut target, &json!({"a": {"y": 2}, "b": 3}));
        assert_eq!(target, json!({"a": {"x": 1, "y": 2}, "b": 3}));
    }

    #[test]
    fn arrays_concatenate() {
        let mut target = json!({"list": [1, 2]});
        merge_values(&mut target, &json!({"list": [3]}));
        assert_eq!(target, json!({"list": [1, 2, 3]}));
    }

    #[test]
    fn scalars_replace() {
        let mut target = json!({"mode": "development"});
        merge_values(&mut target, &json!({"mode": "production"}));
        assert_eq!(target, json!({"mode": "production"}));
    }

    #[test]
    fn incoming_object_replaces_scalar() {
        let mut target = json!({"out": "dist"});
        merge_values(&mut target, &json!({"out": {"path": "dist"}}));
        assert_eq!(target, json!({"out": {"path": "dist"}}));
    }

    #[test]
    fn clean_drops_empty_entries() {
        let cleaned = clean(json!({
            "a": null,
            "b": [],
            "c": {},
            "d": 0,
            "e": "x",
        }));
        assert_eq!(cleaned, json!({"d": 0, "e": "x"}));
    }

    #[test]
    fn clean_is_shallow() {
        let cleaned = clean(json!({"outer": {"inner": {}}}));
        assert_eq!(cleaned, json!({"outer": {"inner": {}}}));
    }
}
