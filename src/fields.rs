use serde_json::Value;

/// Canonical names for the known fields. A record key must match one of
/// these exactly to receive role-specific rendering.
pub const TIME: &str = "time";
pub const TIMESTAMP: &str = "timestamp";
pub const LEVEL: &str = "level";
pub const CALLER: &str = "caller";
pub const MESSAGE: &str = "message";
pub const COMPONENT: &str = "component";

/// Arbitrary-field name hoisted to the front of the sorted field list.
pub const ERROR: &str = "error";

/// Registry identifiers for generic name/value rendering of arbitrary
/// fields. Per-field overrides use "<field>_field_name" and
/// "<field>_field_value".
pub const FIELD_NAME: &str = "field_name";
pub const FIELD_VALUE: &str = "field_value";

/// Render a JSON value as display text.
///
/// Bare strings print without quotes, numbers keep their original
/// textual form (arbitrary-precision decode), null prints empty, and
/// containers print as compact JSON.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => serde_json::to_string(other).unwrap_or_else(|_| "null".to_string()),
    }
}

/// Render an optional JSON value, treating absence as empty text.
pub fn display_opt(value: Option<&Value>) -> String {
    value.map(display_value).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strings_print_unquoted() {
        assert_eq!(display_value(&json!("hello")), "hello");
    }

    #[test]
    fn test_numbers_keep_source_text() {
        // 2^53 + 1 is not representable as f64
        let value: Value = serde_json::from_str("9007199254740993").unwrap();
        assert_eq!(display_value(&value), "9007199254740993");
    }

    #[test]
    fn test_null_and_absent_are_empty() {
        assert_eq!(display_value(&Value::Null), "");
        assert_eq!(display_opt(None), "");
    }

    #[test]
    fn test_containers_print_as_json() {
        assert_eq!(display_value(&json!([1, 2])), "[1,2]");
        assert_eq!(display_value(&json!({"a": true})), "{\"a\":true}");
    }
}
