//! # Truthiness
//!
//! Absence is decided by falsiness, not only by a missing key: `null`,
//! `false`, `0` and `""` all count as absent, so they trigger default and
//! required handling exactly like a missing field. Objects and arrays are
//! never falsy, even when empty.
//!
//! Callers who need a legitimate `0`, `false` or `""` to pass through a
//! field must make it optional or give it a default.

use serde_json::Value;

/// Whether `value` counts as absent.
pub fn is_falsy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Bool(b)) => !*b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f == 0.0),
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => false,
    }
}

/// JSON type name of `value`, for diagnostics.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
