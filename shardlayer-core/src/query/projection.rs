//! Field projection for query results.
//!
//! A projection names the top-level fields to keep. In its canonical form it is
//! an object whose *values* are field names (`{"a": "name", "b": "level"}`);
//! an array of names or a single name string are accepted too. Entries that
//! are not strings are skipped.

use serde_json::{Map, Value};

use crate::query::matcher::is_empty_spec;

/// Builds the projected copy of `document`.
///
/// An empty projection keeps the whole document. Fields the document does
/// not have are left out, so a projection may yield an empty object.
pub fn project(document: &Value, projection: &Value) -> Value {
    if is_empty_spec(projection) {
        return document.clone();
    }

    let names: Vec<&Value> = match projection {
        Value::Object(map) => map.values().collect(),
        Value::Array(values) => values.iter().collect(),
        other => vec![other],
    };

    let mut projected = Map::new();
    for name in names.into_iter().filter_map(Value::as_str) {
        if let Some(value) = document.as_object().and_then(|map| map.get(name)) {
            projected.insert(name.to_string(), value.clone());
        }
    }

    Value::Object(projected)
}
