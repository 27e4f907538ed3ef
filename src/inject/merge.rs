use serde_json::{Map, Value};

/// Merge `incoming` into `target` key by key.
///
/// Nested objects present on both sides are merged recursively; any other
/// value from `incoming` (arrays, scalars, null) replaces the existing one.
pub fn merge_object(target: &mut Map<String, Value>, incoming: Map<String, Value>) {
    for (key, value) in incoming {
        match target.get_mut(&key) {
            Some(Value::Object(existing)) if value.is_object() => {
                if let Value::Object(nested) = value {
                    merge_object(existing, nested);
                }
            }
            Some(slot) => *slot = value,
            None => {
                target.insert(key, value);
            }
        }
    }
}
