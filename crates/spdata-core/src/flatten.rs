//! Structural JSON flattening.
//!
//! Walks a JSON tree depth-first and emits one [`FlatRecord`] per scalar
//! leaf. Object keys become path segments. Array positions become segments
//! too: an element's index is held as "pending" and written in front of the
//! next key, so `{"a": [{"b": 1}]}` yields the path `a, 0, b`.
//!
//! Record order follows the map's key order and array order. Consumers
//! must not rely on it.

use serde_json::Value;

use crate::error::FlattenError;
use crate::record::{FlatRecord, LeafValue};

/// Flatten the value reported for `data_type`.
///
/// Total over any JSON value. Empty containers and a bare scalar root
/// produce no records, since there is no path to name the leaf by.
pub fn flatten(data_type: &str, root: &Value) -> Vec<FlatRecord> {
    let mut records = Vec::new();
    let mut path = Vec::new();
    walk(data_type, root, &mut path, None, &mut records);
    records
}

/// Parse a `system_profiler -json` document and flatten every data type in it.
///
/// The document must be an object whose top-level keys are data type names.
pub fn flatten_output(text: &str) -> Result<Vec<FlatRecord>, FlattenError> {
    let document: Value = serde_json::from_str(text)?;
    let types = match document {
        Value::Object(types) => types,
        other => return Err(FlattenError::NotAnObject(kind(&other))),
    };

    let mut records = Vec::new();
    for (data_type, value) in &types {
        records.extend(flatten(data_type, value));
    }
    Ok(records)
}

fn walk(
    data_type: &str,
    value: &Value,
    path: &mut Vec<String>,
    pending_index: Option<usize>,
    out: &mut Vec<FlatRecord>,
) {
    let depth = path.len();
    // A pending index always lands in the path, whatever comes next.
    if let Some(index) = pending_index {
        path.push(index.to_string());
    }
    let step = path.len();

    match value {
        Value::Object(map) => {
            for (key, child) in map {
                path.push(key.clone());
                walk(data_type, child, path, None, out);
                path.truncate(step);
            }
        }
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                walk(data_type, item, path, Some(index), out);
            }
        }
        scalar => {
            if !path.is_empty() {
                out.push(FlatRecord {
                    data_type: data_type.to_string(),
                    path_segments: path.clone(),
                    leaf_value: leaf(scalar),
                });
            }
        }
    }

    path.truncate(depth);
}

fn leaf(value: &Value) -> LeafValue {
    match value {
        Value::Number(n) => LeafValue::Number(n.clone()),
        Value::String(s) => LeafValue::String(s.clone()),
        Value::Bool(b) => LeafValue::Bool(*b),
        Value::Null | Value::Object(_) | Value::Array(_) => LeafValue::Null,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
