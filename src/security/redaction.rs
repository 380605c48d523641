//! Recursive redaction of sensitive payload data.
//!
//! # Rules
//! - Object keys whose lowercase form contains a sensitive fragment have
//!   their value replaced, whatever its type
//! - String values that look like API keys (longer than 20 chars, only
//!   alphanumerics, `_` and `-`) or JWTs (`eyJ` prefix) are replaced even
//!   under innocuous keys
//! - Arrays and objects are walked element-wise; other primitives pass through

use serde_json::{Map, Value};

/// Marker substituted for every redacted value.
pub const REDACTED: &str = "[REDACTED]";

const SENSITIVE_KEY_FRAGMENTS: &[&str] = &[
    "key",
    "password",
    "token",
    "secret",
    "auth",
    "credential",
    "apikey",
    "api_key",
];

const JWT_PREFIX: &str = "eyJ";
const KEY_LIKE_MIN_LEN: usize = 21;

/// Return a redacted copy of `value`.
pub fn sanitize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut out = Map::with_capacity(map.len());
            for (key, inner) in map {
                let replaced = if is_sensitive_key(key) {
                    Value::String(REDACTED.to_string())
                } else {
                    sanitize(inner)
                };
                out.insert(key.clone(), replaced);
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(sanitize).collect()),
        Value::String(s) if is_sensitive_value(s) => Value::String(REDACTED.to_string()),
        other => other.clone(),
    }
}

pub fn is_sensitive_key(key: &str) -> bool {
    let lower = key.to_ascii_lowercase();
    SENSITIVE_KEY_FRAGMENTS
        .iter()
        .any(|fragment| lower.contains(fragment))
}

pub fn is_sensitive_value(value: &str) -> bool {
    if value.starts_with(JWT_PREFIX) {
        return true;
    }
    value.len() >= KEY_LIKE_MIN_LEN
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sensitive_leaves_are_replaced() {
        let payload = json!({
            "password": "x",
            "nested": {"api_key": "y", "ok": "z"},
            "list": [{"token": "t"}],
            "name": "Beach House",
        });

        let clean = sanitize(&payload);
        assert_eq!(
            clean,
            json!({
                "password": REDACTED,
                "nested": {"api_key": REDACTED, "ok": "z"},
                "list": [{"token": REDACTED}],
                "name": "Beach House",
            })
        );
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let payload = json!({"Authorization": {"scheme": "Bearer"}, "rows": [1, 2, null]});
        let once = sanitize(&payload);
        assert_eq!(sanitize(&once), once);
        assert_eq!(once["Authorization"], REDACTED);
        assert_eq!(once["rows"], json!([1, 2, null]));
    }

    #[test]
    fn test_key_like_values_under_plain_keys() {
        let payload = json!({
            "note": "abcdefghijklmnopqrstuvwxyz012345",
            "session": "eyJhbGciOiJIUzI1NiJ9.e30.sig",
            "short": "abc-123",
            "sentence": "this has spaces and is quite long indeed",
            "count": 42,
        });

        let clean = sanitize(&payload);
        assert_eq!(clean["note"], REDACTED);
        assert_eq!(clean["session"], REDACTED);
        assert_eq!(clean["short"], "abc-123");
        assert_eq!(clean["sentence"], "this has spaces and is quite long indeed");
        assert_eq!(clean["count"], 42);
    }

    #[test]
    fn test_twenty_chars_is_not_key_like() {
        assert!(!is_sensitive_value("abcdefghijklmnopqrst"));
        assert!(is_sensitive_value("abcdefghijklmnopqrstu"));
    }

    #[test]
    fn test_key_matching_is_case_insensitive() {
        assert!(is_sensitive_key("X-ApiKey"));
        assert!(is_sensitive_key("clientSecret"));
        assert!(is_sensitive_key("CREDENTIALS"));
        assert!(!is_sensitive_key("guest_name"));
    }
}
