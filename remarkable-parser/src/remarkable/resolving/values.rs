//! Value assignment helpers for metadata maps
//!
//! A predicate holds a single value until it is asserted again, at which point it becomes an
//! ordered list. Keys that must hold maps coerce a lone value into `{ value: <old> }`.

use serde_json::{Map, Value};

/// Key holding claims made by other subjects.
pub const CLAIMS: &str = "@claims";
/// The subject owning the metadata block.
pub const DEFAULT_SUBJECT: &str = "@this";
/// Prefix of namespaced sub-maps.
pub const NAMESPACE_PREFIX: &str = "@ns:";
/// Key that receives a lone value when a map is coerced.
pub const VALUE: &str = "value";

/// Assign `value` to `key`, promoting to a list on repeated assignment.
///
/// `@claims` always resolves to a map; a plain value asserted on it lands under `value`.
pub fn set_or_append(target: &mut Map<String, Value>, key: &str, value: Value) {
    if key == CLAIMS {
        with_map_entry(target, CLAIMS, |claims| set_or_append(claims, VALUE, value));
        return;
    }

    match target.get_mut(key) {
        None => {
            target.insert(key.to_string(), value);
        }
        Some(Value::Array(values)) => values.push(value),
        Some(current) => {
            let previous = current.take();
            *current = Value::Array(vec![previous, value]);
        }
    }
}

/// Run `f` on the map stored under `key`, created when missing and coerced when it holds
/// anything else.
pub fn with_map_entry<F>(target: &mut Map<String, Value>, key: &str, f: F)
where
    F: FnOnce(&mut Map<String, Value>),
{
    let entry = target.entry(key.to_string()).or_insert(Value::Null);
    let mut map = match entry.take() {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        lone => Map::from_iter([(VALUE.to_string(), lone)]),
    };
    f(&mut map);
    *entry = Value::Object(map);
}

/// Move the value(s) under `key` onto `new_key` and remove `key`.
///
/// Lists are moved element by element, so `new_key` accumulates a flat list. Returns the
/// removed value.
pub fn merge_into(node: &mut Map<String, Value>, key: &str, new_key: &str) -> Option<Value> {
    let previous = node.remove(key)?;
    match &previous {
        Value::Array(values) => {
            for value in values {
                set_or_append(node, new_key, value.clone());
            }
        }
        value => set_or_append(node, new_key, value.clone()),
    }
    Some(previous)
}
