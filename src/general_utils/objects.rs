//! Object shaping helpers over JSON maps.
//!
//! Every function takes the input map by reference and returns a new map;
//! key order follows the input unless the callback reorders it.

use log::debug;
use serde_json::{Map, Value};

pub type Object = Map<String, Value>;

/// True only for JSON objects (not null, not arrays, not scalars).
pub fn is_non_null_object(value: &Value) -> bool {
    value.is_object()
}

/// Hand the whole entry list to `f` and rebuild an object from what it returns.
///
/// Later duplicates of a key overwrite earlier ones.
pub fn on_entries<F>(obj: &Object, f: F) -> Object
where
    F: FnOnce(Vec<(String, Value)>) -> Vec<(String, Value)>,
{
    let entries = obj.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
    f(entries).into_iter().collect()
}

pub fn map_entries<F>(obj: &Object, mut f: F) -> Object
where
    F: FnMut(&str, &Value) -> (String, Value),
{
    obj.iter().map(|(k, v)| f(k, v)).collect()
}

pub fn filter_entries<F>(obj: &Object, mut keep: F) -> Object
where
    F: FnMut(&str, &Value) -> bool,
{
    obj.iter()
        .filter(|(k, v)| keep(k, v))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Hand the key list to `f`; the result holds the returned keys, in the
/// returned order, with their original values. Keys `obj` does not have are
/// dropped.
pub fn on_keys<F>(obj: &Object, f: F) -> Object
where
    F: FnOnce(Vec<String>) -> Vec<String>,
{
    f(obj.keys().cloned().collect())
        .into_iter()
        .filter_map(|k| obj.get(&k).cloned().map(|v| (k, v)))
        .collect()
}

/// Rename every key. Renames that collide keep the last value.
pub fn map_keys<F>(obj: &Object, mut f: F) -> Object
where
    F: FnMut(&str) -> String,
{
    obj.iter().map(|(k, v)| (f(k), v.clone())).collect()
}

pub fn filter_keys<F>(obj: &Object, mut keep: F) -> Object
where
    F: FnMut(&str) -> bool,
{
    filter_entries(obj, |k, _| keep(k))
}

/// Hand the value list to `f` and zip the result back onto the keys in
/// order. Extra keys or values are dropped.
pub fn on_values<F>(obj: &Object, f: F) -> Object
where
    F: FnOnce(Vec<Value>) -> Vec<Value>,
{
    obj.keys()
        .cloned()
        .zip(f(obj.values().cloned().collect()))
        .collect()
}

pub fn map_values<F>(obj: &Object, mut f: F) -> Object
where
    F: FnMut(&Value) -> Value,
{
    obj.iter().map(|(k, v)| (k.clone(), f(v))).collect()
}

pub fn filter_values<F>(obj: &Object, mut keep: F) -> Object
where
    F: FnMut(&Value) -> bool,
{
    filter_entries(obj, |_, v| keep(v))
}

/// Map and filter in one pass: `None` drops the entry.
pub fn transform_entries<F>(obj: &Object, mut f: F) -> Object
where
    F: FnMut(&str, &Value) -> Option<(String, Value)>,
{
    obj.iter().filter_map(|(k, v)| f(k, v)).collect()
}

/// `obj` when `condition` holds, otherwise an empty object. Meant for
/// conditionally merging fields into a larger object.
pub fn obj_if(condition: bool, obj: Object) -> Object {
    if condition {
        obj
    } else {
        Object::new()
    }
}

/// Parse JSON, returning `None` instead of an error.
pub fn safe_parse(input: &str) -> Option<Value> {
    match serde_json::from_str(input) {
        Ok(value) => Some(value),
        Err(err) => {
            debug!("safe_parse: ignoring invalid JSON: {}", err);
            None
        }
    }
}

pub fn safe_parse_or(input: &str, fallback: Value) -> Value {
    safe_parse(input).unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Object {
        match json!({"a": 1, "b": null, "c": "three"}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_is_non_null_object() {
        assert!(is_non_null_object(&json!({})));
        assert!(!is_non_null_object(&Value::Null));
        assert!(!is_non_null_object(&json!([1, 2])));
        assert!(!is_non_null_object(&json!("x")));
    }

    #[test]
    fn test_on_entries_reverses() {
        let out = on_entries(&sample(), |mut entries| {
            entries.reverse();
            entries
        });
        assert_eq!(out.keys().collect::<Vec<_>>(), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_on_keys_selects_and_orders() {
        let out = on_keys(&sample(), |_| vec!["c".into(), "missing".into(), "a".into()]);
        assert_eq!(Value::Object(out), json!({"c": "three", "a": 1}));
        let out = on_keys(&sample(), |_| vec!["c".into(), "a".into()]);
        assert_eq!(out.keys().collect::<Vec<_>>(), vec!["c", "a"]);
    }

    #[test]
    fn test_on_values_truncates() {
        let out = on_values(&sample(), |values| values.into_iter().take(2).collect());
        assert_eq!(Value::Object(out), json!({"a": 1, "b": null}));
    }

    #[test]
    fn test_transform_entries() {
        let out = transform_entries(&sample(), |k, v| {
            (!v.is_null()).then(|| (k.to_uppercase(), v.clone()))
        });
        assert_eq!(Value::Object(out), json!({"A": 1, "C": "three"}));
    }

    #[test]
    fn test_map_keys_collision_keeps_last() {
        let out = map_keys(&sample(), |_| "k".to_string());
        assert_eq!(Value::Object(out), json!({"k": "three"}));
    }

    #[test]
    fn test_safe_parse() {
        assert_eq!(safe_parse(r#"{"x": [1]}"#), Some(json!({"x": [1]})));
        assert_eq!(safe_parse("{not json"), None);
        assert_eq!(safe_parse_or("", json!({})), json!({}));
    }
}
