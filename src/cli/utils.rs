//! Shared CLI utilities.

use anyhow::Result;
use serde_json::Value as JsonValue;

/// Parse a command-line value as JSON, falling back to a plain string.
pub fn parse_value(raw: &str) -> JsonValue {
    serde_json::from_str(raw).unwrap_or_else(|_| JsonValue::String(raw.to_string()))
}

/// Split a `KEY=VALUE` assignment. The value goes through [`parse_value`].
pub fn parse_assignment(raw: &str) -> Result<(String, JsonValue)> {
    let Some((key, value)) = raw.split_once('=') else {
        anyhow::bail!("Expected KEY=VALUE, got '{}'", raw);
    };
    let key = key.trim();
    if key.is_empty() {
        anyhow::bail!("Empty key in assignment '{}'", raw);
    }
    Ok((key.to_string(), parse_value(value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_value_prefers_json() {
        assert_eq!(parse_value("9"), json!(9));
        assert_eq!(parse_value("true"), json!(true));
        assert_eq!(parse_value("[1, 2]"), json!([1, 2]));
        assert_eq!(parse_value("plain text"), json!("plain text"));
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(parse_assignment("x=9").unwrap(), ("x".to_string(), json!(9)));
        assert_eq!(parse_assignment("name=a=b").unwrap(), ("name".to_string(), json!("a=b")));
        assert!(parse_assignment("novalue").is_err());
        assert!(parse_assignment("=1").is_err());
    }
}
