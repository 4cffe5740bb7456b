//! Helpers for the document-in-column pattern: several tables keep nested
//! structures (medicines, assessments, progress notes) as JSON text inside a
//! single column, decoded on read and re-encoded on write.

use serde_json::Value;

/// Replaces JSON-text columns in a row with their parsed values. Columns that
/// are absent, null, or hold invalid JSON are left as-is.
pub fn decode_columns(row: &mut Value, columns: &[&str]) {
    let Some(object) = row.as_object_mut() else {
        return;
    };
    for column in columns {
        if let Some(Value::String(text)) = object.get(*column) {
            if let Ok(parsed) = serde_json::from_str::<Value>(text) {
                object.insert((*column).to_string(), parsed);
            }
        }
    }
}

/// Encodes a value to the JSON text stored in a blob column.
pub fn encode_column(value: &Value) -> Value {
    match value {
        Value::Null => Value::Null,
        other => Value::String(other.to_string()),
    }
}

/// Parses a JSON-text column into an array, tolerating null/missing/garbage.
pub fn decode_array(raw: Option<&Value>) -> Vec<Value> {
    match raw {
        Some(Value::String(text)) => serde_json::from_str::<Value>(text)
            .ok()
            .and_then(|v| v.as_array().cloned())
            .unwrap_or_default(),
        Some(Value::Array(items)) => items.clone(),
        _ => Vec::new(),
    }
}
