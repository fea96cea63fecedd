use crate::order::compare;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};

const INDENT: &[u8] = b"    ";

/// Recursively sort every array in the tree. Object key order is preserved.
pub fn normalize_value(value: Value) -> Value {
    match value {
        Value::Array(items) => {
            let mut items: Vec<Value> = items.into_iter().map(normalize_value).collect();
            items.sort_by(compare);
            Value::Array(items)
        }
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, normalize_value(v)))
                .collect(),
        ),
        scalar => scalar,
    }
}

/// Recursively reorder object keys lexicographically.
pub fn sort_object_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let mut sorted = Map::with_capacity(entries.len());
            for (k, v) in entries {
                sorted.insert(k, sort_object_keys(v));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_object_keys).collect()),
        scalar => scalar,
    }
}

/// Serialize with 4-space indentation and a trailing newline.
pub fn to_canonical_bytes(value: &Value) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    value.serialize(&mut ser)?;
    buf.push(b'\n');
    Ok(buf)
}

/// Full in-memory pipeline: optional key sort, array normalization, serialization.
pub fn normalize_document(value: Value, sort_keys: bool) -> Result<Vec<u8>, serde_json::Error> {
    let value = if sort_keys {
        sort_object_keys(value)
    } else {
        value
    };
    to_canonical_bytes(&normalize_value(value))
}
