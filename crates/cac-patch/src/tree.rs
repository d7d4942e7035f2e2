//! The schema-less configuration tree

use serde_json::Value;

/// A configuration document: string-keyed objects, ordered arrays and
/// scalars.
pub type ConfigTree = Value;

/// The top level of a configuration document.
pub type Tree = serde_json::Map<String, Value>;

/// Whether `value` is the zero value of its type.
///
/// `null`, `false`, `0`, `""`, `[]` and `{}` are zero. A non-empty object is
/// never zero, whatever its members hold.
pub fn is_zero(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}
