//! Field transformers converting PostgreSQL-native values into the
//! encodings the SQLite schema stores.
//!
//! All functions here are pure and total: a null or absent source value
//! maps to a defined default, and well-formed input never panics.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

/// Render a PostgreSQL text array as a JSON array string.
///
/// A NULL array becomes `"[]"`. Element order is preserved and non-ASCII
/// characters are kept literal rather than `\u`-escaped.
#[must_use]
pub fn array_to_json(arr: Option<&[String]>) -> String {
    match arr {
        None => "[]".to_string(),
        Some(items) => serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string()),
    }
}

/// Extract lexemes from a tsvector's text form as a space-separated string.
///
/// A tsvector renders as `'word1':1 'word2':2`; only the lexemes matter
/// here. Tokens that do not match the quote/colon shape are dropped.
#[must_use]
pub fn tsvector_to_tokens(val: Option<&str>) -> String {
    let Some(raw) = val else {
        return String::new();
    };

    let mut lexemes = Vec::new();
    for token in raw.split_whitespace() {
        if !token.starts_with('\'') || !token.contains(':') {
            continue;
        }
        let lexeme = token.split(':').next().unwrap_or("").trim_matches('\'');
        lexemes.push(lexeme);
    }

    lexemes.join(" ")
}

/// Render a timestamp as ISO-8601 with the UTC offset normalized to `Z`.
///
/// NULL stays NULL.
#[must_use]
pub fn timestamp_to_iso(ts: Option<DateTime<Utc>>) -> Option<String> {
    ts.map(|t| t.to_rfc3339_opts(SecondsFormat::AutoSi, true))
}

/// Coerce a nullable numeric weight to a float, defaulting to 0.
#[must_use]
pub fn weight_or_zero(weight: Option<f64>) -> f64 {
    weight.unwrap_or(0.0)
}

/// Coerce a nullable text column to an empty string.
#[must_use]
pub fn text_or_empty(val: Option<String>) -> String {
    val.unwrap_or_default()
}

/// Render a JSONB metadata value as a JSON object string.
///
/// Both SQL NULL and a JSON `null` value become `"{}"`. Non-ASCII
/// characters are kept literal.
#[must_use]
pub fn meta_to_json(meta: Option<&Value>) -> String {
    match meta {
        None | Some(Value::Null) => "{}".to_string(),
        Some(v) => serde_json::to_string(v).unwrap_or_else(|_| "{}".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_array_null_is_empty_json() {
        assert_eq!(array_to_json(None), "[]");
    }

    #[test]
    fn test_array_preserves_order() {
        let arr = vec!["a".to_string(), "b".to_string()];
        assert_eq!(array_to_json(Some(&arr)), r#"["a","b"]"#);
    }

    #[test]
    fn test_array_keeps_non_ascii_literal() {
        let arr = vec!["café".to_string()];
        assert_eq!(array_to_json(Some(&arr)), r#"["café"]"#);

        let arr = vec!["अभिधान".to_string()];
        assert_eq!(array_to_json(Some(&arr)), r#"["अभिधान"]"#);
    }

    #[test]
    fn test_array_empty() {
        let arr: Vec<String> = vec![];
        assert_eq!(array_to_json(Some(&arr)), "[]");
    }

    #[test]
    fn test_tsvector_extracts_lexemes() {
        assert_eq!(
            tsvector_to_tokens(Some("'hello':1 'world':2")),
            "hello world"
        );
    }

    #[test]
    fn test_tsvector_null_and_empty() {
        assert_eq!(tsvector_to_tokens(None), "");
        assert_eq!(tsvector_to_tokens(Some("")), "");
    }

    #[test]
    fn test_tsvector_drops_malformed_tokens() {
        // A bare token without the quote/colon shape is skipped.
        assert_eq!(tsvector_to_tokens(Some("'a':1 plain 'b':2")), "a b");
        assert_eq!(tsvector_to_tokens(Some("plain")), "");
    }

    #[test]
    fn test_tsvector_multiple_positions() {
        // A lexeme may carry a position list; everything after the first
        // colon is ignored.
        assert_eq!(tsvector_to_tokens(Some("'cat':1,4 'dog':2")), "cat dog");
    }

    #[test]
    fn test_timestamp_renders_z_suffix() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        assert_eq!(
            timestamp_to_iso(Some(ts)),
            Some("2024-01-15T10:30:00Z".to_string())
        );
    }

    #[test]
    fn test_timestamp_null_stays_null() {
        assert_eq!(timestamp_to_iso(None), None);
    }

    #[test]
    fn test_weight_defaults_to_zero() {
        assert_eq!(weight_or_zero(None), 0.0);
        assert_eq!(weight_or_zero(Some(2.5)), 2.5);
    }

    #[test]
    fn test_text_defaults_to_empty() {
        assert_eq!(text_or_empty(None), "");
        assert_eq!(text_or_empty(Some("note".to_string())), "note");
    }

    #[test]
    fn test_meta_null_is_empty_object() {
        assert_eq!(meta_to_json(None), "{}");
        assert_eq!(meta_to_json(Some(&Value::Null)), "{}");
    }

    #[test]
    fn test_meta_renders_object() {
        let meta = serde_json::json!({"origin": "français"});
        assert_eq!(meta_to_json(Some(&meta)), r#"{"origin":"français"}"#);
    }
}
