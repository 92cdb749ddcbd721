//! Shared utility functions used across multiple modules.

use serde_json::Value;

/// Normalize optional text by trimming whitespace and removing empties.
///
/// Returns `None` when the input is `None` or the trimmed value is empty.
pub fn normalize_text_option(value: Option<String>) -> Option<String> {
    let value = value?;
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Check if a string starts with `http://` or `https://`.
pub fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

/// Truncate text to at most 180 characters for error messages.
pub fn compact_text(value: &str) -> String {
    value.trim().chars().take(180).collect()
}

/// Current Unix timestamp in seconds.
pub fn unix_timestamp_now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Coerce an externally-sourced JSON value into a non-negative integer.
///
/// Accepts integers, floats (truncated toward zero) and numeric strings
/// (parsed as a float, then truncated). Everything else, including negative
/// or non-finite numbers, yields `None` so callers can substitute a default.
pub fn coerce_non_negative(value: &Value) -> Option<u64> {
    match value {
        Value::Number(number) => number
            .as_u64()
            .or_else(|| number.as_f64().and_then(truncate_non_negative)),
        Value::String(text) => text
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(truncate_non_negative),
        _ => None,
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn truncate_non_negative(value: f64) -> Option<u64> {
    if !value.is_finite() || value < 0.0 || value >= u64::MAX as f64 {
        return None;
    }
    Some(value.trunc() as u64)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn normalize_text_option_rejects_empty() {
        assert_eq!(normalize_text_option(None), None);
        assert_eq!(normalize_text_option(Some("   ".to_string())), None);
    }

    #[test]
    fn normalize_text_option_trims_value() {
        assert_eq!(
            normalize_text_option(Some(" https://example.com ".to_string())),
            Some("https://example.com".to_string())
        );
    }

    #[test]
    fn is_http_url_accepts_valid_schemes() {
        assert!(is_http_url("http://localhost"));
        assert!(is_http_url("https://example.com"));
        assert!(!is_http_url("ftp://example.com"));
        assert!(!is_http_url("example.com"));
    }

    #[test]
    fn coerce_accepts_numbers_and_numeric_strings() {
        assert_eq!(coerce_non_negative(&json!(2048)), Some(2048));
        assert_eq!(coerce_non_negative(&json!(2048.9)), Some(2048));
        assert_eq!(coerce_non_negative(&json!("512")), Some(512));
        assert_eq!(coerce_non_negative(&json!(" 1700000000.5 ")), Some(1_700_000_000));
    }

    #[test]
    fn coerce_rejects_garbage() {
        assert_eq!(coerce_non_negative(&Value::Null), None);
        assert_eq!(coerce_non_negative(&json!("abc")), None);
        assert_eq!(coerce_non_negative(&json!(-5)), None);
        assert_eq!(coerce_non_negative(&json!("-1")), None);
        assert_eq!(coerce_non_negative(&json!(true)), None);
        assert_eq!(coerce_non_negative(&json!({"size": 1})), None);
        assert_eq!(coerce_non_negative(&json!("NaN")), None);
    }
}
