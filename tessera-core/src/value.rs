//! Typed values and their quoted SQL literal form
//!
//! Fragments are raw strings and pass through unescaped. `Value` is the
//! opt-in layer on top: callers that want quoting hand a `Value` to
//! [`Query::add_insert`](crate::Query::add_insert) or
//! [`Query::add_update`](crate::Query::add_update) and get a literal that is
//! safe to splice into the statement.

use serde::{Deserialize, Serialize};

/// A SQL value that renders to a quoted literal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Null value
    Null,
    /// Boolean value
    Bool(bool),
    /// 32-bit integer
    I32(i32),
    /// 64-bit integer
    I64(i64),
    /// 32-bit float
    F32(f32),
    /// 64-bit float
    F64(f64),
    /// Exact numeric kept in its textual form
    Numeric(String),
    /// String value
    String(String),
    /// Bytes value
    Bytes(Vec<u8>),
    /// JSON value
    Json(serde_json::Value),
}

impl Value {
    /// Render this value as a SQL literal.
    ///
    /// Strings are single-quoted with embedded quotes doubled and backslashes
    /// escaped. Non-finite floats have no literal and become `NULL`.
    ///
    /// # Examples
    /// ```
    /// use tessera_core::Value;
    ///
    /// assert_eq!(Value::from("O'Brien").to_sql_literal(), "'O''Brien'");
    /// assert_eq!(Value::from(None::<i32>).to_sql_literal(), "NULL");
    /// ```
    pub fn to_sql_literal(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Bool(true) => "TRUE".to_string(),
            Value::Bool(false) => "FALSE".to_string(),
            Value::I32(i) => i.to_string(),
            Value::I64(i) => i.to_string(),
            Value::F32(f) if f.is_finite() => f.to_string(),
            Value::F64(f) if f.is_finite() => f.to_string(),
            Value::F32(_) | Value::F64(_) => "NULL".to_string(),
            Value::Numeric(n) => n.clone(),
            Value::String(s) => quote(s),
            Value::Bytes(b) => {
                let hex: String = b.iter().map(|byte| format!("{:02X}", byte)).collect();
                format!("X'{}'", hex)
            }
            Value::Json(j) => quote(&j.to_string()),
        }
    }
}

fn quote(s: &str) -> String {
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('\'');
    for ch in s.chars() {
        match ch {
            '\'' => quoted.push_str("''"),
            '\\' => quoted.push_str("\\\\"),
            _ => quoted.push(ch),
        }
    }
    quoted.push('\'');
    quoted
}

// Implement From for common types
impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl From<bool> for Value {
    fn from(val: bool) -> Self {
        Value::Bool(val)
    }
}

impl From<i32> for Value {
    fn from(val: i32) -> Self {
        Value::I32(val)
    }
}

impl From<i64> for Value {
    fn from(val: i64) -> Self {
        Value::I64(val)
    }
}

impl From<f32> for Value {
    fn from(val: f32) -> Self {
        Value::F32(val)
    }
}

impl From<f64> for Value {
    fn from(val: f64) -> Self {
        Value::F64(val)
    }
}

impl From<String> for Value {
    fn from(val: String) -> Self {
        Value::String(val)
    }
}

impl From<&str> for Value {
    fn from(val: &str) -> Self {
        Value::String(val.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(val: Vec<u8>) -> Self {
        Value::Bytes(val)
    }
}

impl From<serde_json::Value> for Value {
    fn from(val: serde_json::Value) -> Self {
        Value::Json(val)
    }
}

impl From<chrono::NaiveDateTime> for Value {
    fn from(val: chrono::NaiveDateTime) -> Self {
        Value::String(val.format(crate::functions::DATETIME_FORMAT).to_string())
    }
}

impl From<chrono::NaiveDate> for Value {
    fn from(val: chrono::NaiveDate) -> Self {
        Value::String(val.format("%Y-%m-%d").to_string())
    }
}

impl From<chrono::DateTime<chrono::Utc>> for Value {
    fn from(val: chrono::DateTime<chrono::Utc>) -> Self {
        val.naive_utc().into()
    }
}

#[cfg(feature = "uuid-support")]
impl From<uuid::Uuid> for Value {
    fn from(val: uuid::Uuid) -> Self {
        Value::String(val.hyphenated().to_string())
    }
}

#[cfg(feature = "decimal-support")]
impl From<rust_decimal::Decimal> for Value {
    fn from(val: rust_decimal::Decimal) -> Self {
        Value::Numeric(val.to_string())
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(val) => val.into(),
            None => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_creation() {
        assert_eq!(Value::from(42i32), Value::I32(42));
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from("hello"), Value::String("hello".to_string()));
        assert_eq!(Value::from(()), Value::Null);
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(Value::from(Some(42i32)), Value::I32(42));
        assert_eq!(Value::from(None::<i32>), Value::Null);
    }

    #[test]
    fn test_string_literal_escaping() {
        assert_eq!(Value::from("plain").to_sql_literal(), "'plain'");
        assert_eq!(Value::from("it's").to_sql_literal(), "'it''s'");
        assert_eq!(Value::from(r"C:\tmp").to_sql_literal(), r"'C:\\tmp'");
        assert_eq!(
            Value::from("x'); DROP TABLE users; --").to_sql_literal(),
            "'x''); DROP TABLE users; --'"
        );
    }

    #[test]
    fn test_scalar_literals() {
        assert_eq!(Value::Null.to_sql_literal(), "NULL");
        assert_eq!(Value::from(true).to_sql_literal(), "TRUE");
        assert_eq!(Value::from(false).to_sql_literal(), "FALSE");
        assert_eq!(Value::from(-7i64).to_sql_literal(), "-7");
        assert_eq!(Value::from(2.5f64).to_sql_literal(), "2.5");
        assert_eq!(Value::from(f64::NAN).to_sql_literal(), "NULL");
        assert_eq!(Value::Numeric("10.50".into()).to_sql_literal(), "10.50");
    }

    #[test]
    fn test_bytes_and_json_literals() {
        assert_eq!(Value::from(vec![0x0Au8, 0xFF]).to_sql_literal(), "X'0AFF'");
        let json = serde_json::json!({"name": "O'Neil"});
        assert_eq!(
            Value::from(json).to_sql_literal(),
            r#"'{"name":"O''Neil"}'"#
        );
    }

    #[test]
    fn test_datetime_literal() {
        let ts = chrono::NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(8, 5, 0)
            .unwrap();
        assert_eq!(Value::from(ts).to_sql_literal(), "'2024-03-09 08:05:00'");
    }
}
