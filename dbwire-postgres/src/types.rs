//! Type conversions for PostgreSQL.

use serde_json::Value;
use tokio_postgres::types::ToSql;

use crate::error::{PgError, PgResult};

/// Convert a JSON argument to a type that can be used as a PostgreSQL parameter.
///
/// Numbers bind as `INT8` when integral and `FLOAT8` otherwise; arrays and
/// objects bind as `JSONB`.
pub fn value_to_sql(value: &Value) -> PgResult<Box<dyn ToSql + Sync + Send>> {
    match value {
        Value::Null => Ok(Box::new(Option::<String>::None)),
        Value::Bool(b) => Ok(Box::new(*b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Box::new(i))
            } else if let Some(f) = n.as_f64() {
                Ok(Box::new(f))
            } else {
                Err(PgError::type_conversion(format!(
                    "number {} does not fit a PostgreSQL numeric type",
                    n
                )))
            }
        }
        Value::String(s) => Ok(Box::new(s.clone())),
        Value::Array(_) | Value::Object(_) => Ok(Box::new(value.clone())),
    }
}

/// Convert JSON arguments to PostgreSQL parameters.
pub fn values_to_params(values: &[Value]) -> PgResult<Vec<Box<dyn ToSql + Sync + Send>>> {
    values.iter().map(value_to_sql).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_to_sql() {
        for value in [
            json!(null),
            json!(true),
            json!(42),
            json!(1.5),
            json!("alice"),
            json!([1, 2]),
            json!({"role": "admin"}),
        ] {
            assert!(value_to_sql(&value).is_ok(), "{value}");
        }
    }

    #[test]
    fn test_u64_above_i64_binds_as_float() {
        assert!(value_to_sql(&json!(u64::MAX)).is_ok());
    }

    #[test]
    fn test_values_to_params() {
        let params = values_to_params(&[json!(1), json!("a")]).unwrap();
        assert_eq!(params.len(), 2);
    }
}
