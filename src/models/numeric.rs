//! Lenient decoding for the numeric columns of the investments table.
//!
//! Rows written by older clients hold numbers, numeric strings or `null` in the same
//! column. Anything that cannot be read as a finite number decodes as `0`.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Read a JSON value as a finite `f64`.
///
/// Numbers and numeric strings convert; everything else (including `NaN`/`inf`
/// spelled out as strings) yields `None`.
pub fn to_f64(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

/// Truthiness of a request field: absent, `null`, `false`, `0`, `""`, `[]` and `{}`
/// all count as "not supplied".
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(map)) => !map.is_empty(),
    }
}

/// Render a scalar request field as text (numbers keep their JSON spelling).
pub fn to_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Serde helper: `#[serde(default, deserialize_with = "lenient_f64")]`.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(to_f64).unwrap_or(0.0))
}

/// Serde helper for text columns that may be `null` or numeric.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(to_text).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_f64_accepts_numbers_and_numeric_strings() {
        assert_eq!(to_f64(&json!(12.5)), Some(12.5));
        assert_eq!(to_f64(&json!(" 7 ")), Some(7.0));
        assert_eq!(to_f64(&json!("abc")), None);
        assert_eq!(to_f64(&json!("NaN")), None);
        assert_eq!(to_f64(&json!(null)), None);
        assert_eq!(to_f64(&json!(true)), None);
    }

    #[test]
    fn test_truthiness_matches_required_field_rules() {
        assert!(!is_truthy(None));
        assert!(!is_truthy(Some(&json!(null))));
        assert!(!is_truthy(Some(&json!(0))));
        assert!(!is_truthy(Some(&json!(0.0))));
        assert!(!is_truthy(Some(&json!(""))));
        assert!(is_truthy(Some(&json!("0"))));
        assert!(is_truthy(Some(&json!(-1))));
        assert!(is_truthy(Some(&json!("TSLA"))));
    }
}
