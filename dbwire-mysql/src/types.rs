//! Type conversion utilities for MySQL.

use mysql_async::{Params, Value};
use serde_json::Value as JsonValue;

/// Convert a JSON argument to a MySQL Value.
///
/// Arrays and objects are sent as their JSON text.
pub fn json_to_mysql(value: &JsonValue) -> Value {
    match value {
        JsonValue::Null => Value::NULL,
        JsonValue::Bool(b) => Value::from(*b),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else if let Some(u) = n.as_u64() {
                Value::UInt(u)
            } else {
                Value::Double(n.as_f64().unwrap_or_default())
            }
        }
        JsonValue::String(s) => Value::from(s.as_str()),
        JsonValue::Array(_) | JsonValue::Object(_) => Value::from(value.to_string()),
    }
}

/// Convert JSON arguments to positional statement parameters.
pub fn json_to_params(values: &[JsonValue]) -> Params {
    if values.is_empty() {
        Params::Empty
    } else {
        Params::Positional(values.iter().map(json_to_mysql).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_to_mysql() {
        assert_eq!(json_to_mysql(&json!(null)), Value::NULL);
        assert_eq!(json_to_mysql(&json!(true)), Value::Int(1));
        assert_eq!(json_to_mysql(&json!(-7)), Value::Int(-7));
        assert_eq!(json_to_mysql(&json!(u64::MAX)), Value::UInt(u64::MAX));
        assert_eq!(json_to_mysql(&json!(1.5)), Value::Double(1.5));
        assert_eq!(
            json_to_mysql(&json!("alice")),
            Value::Bytes(b"alice".to_vec())
        );
        assert_eq!(
            json_to_mysql(&json!({"a": 1})),
            Value::Bytes(br#"{"a":1}"#.to_vec())
        );
    }

    #[test]
    fn test_json_to_params() {
        assert_eq!(json_to_params(&[]), Params::Empty);
        assert_eq!(
            json_to_params(&[json!(1), json!("x")]),
            Params::Positional(vec![Value::Int(1), Value::Bytes(b"x".to_vec())])
        );
    }
}
