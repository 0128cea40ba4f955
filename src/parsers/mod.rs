//! Built-in normalization functions for common news APIs.
//!
//! Each submodule exposes a `SOURCE_ID` and a `parse` function with the
//! [`Normalizer`](crate::registry::Normalizer) signature, so it can be
//! registered directly:
//!
//! ```ignore
//! registry.register(parsers::newsapi::SOURCE_ID, parsers::newsapi::parse);
//! ```
//!
//! | Source | Module | Response shape |
//! |--------|--------|----------------|
//! | NewsAPI.org | [`newsapi`] | `{"status": "ok", "articles": [...]}` |
//! | GNews | [`gnews`] | `{"totalArticles": n, "articles": [...]}` |
//!
//! Parsers are all-or-nothing: a malformed article rejects the whole
//! document rather than returning a partial list.

pub mod gnews;
pub mod newsapi;

use crate::error::NormalizeError;
use crate::models::Document;
use crate::utils::slugify_title;
use serde_json::{Map, Value};

/// The array stored under `key`, as a slice of JSON objects.
pub(crate) fn object_array<'a>(
    doc: &'a Document,
    key: &str,
) -> Result<Vec<&'a Map<String, Value>>, NormalizeError> {
    let value = doc
        .get(key)
        .ok_or_else(|| NormalizeError::MissingField(key.to_string()))?;
    let items = value.as_array().ok_or_else(|| NormalizeError::WrongShape {
        field: key.to_string(),
        expected: "array",
    })?;

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_object().ok_or_else(|| NormalizeError::WrongShape {
                field: format!("{key}[{i}]"),
                expected: "object",
            })
        })
        .collect()
}

/// A non-empty string field. `null`, absent and blank are all "missing".
pub(crate) fn required_str(obj: &Map<String, Value>, key: &str) -> Result<String, NormalizeError> {
    match obj.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Some(Value::String(_)) | Some(Value::Null) | None => {
            Err(NormalizeError::MissingField(key.to_string()))
        }
        Some(_) => Err(NormalizeError::WrongShape {
            field: key.to_string(),
            expected: "string",
        }),
    }
}

/// An optional string field; anything but a string becomes empty.
pub(crate) fn optional_str(obj: &Map<String, Value>, key: &str) -> String {
    obj.get(key)
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

/// `obj[outer][inner]` as a string, empty if any step is missing.
pub(crate) fn nested_str(obj: &Map<String, Value>, outer: &str, inner: &str) -> String {
    obj.get(outer)
        .and_then(Value::as_object)
        .map(|o| optional_str(o, inner))
        .unwrap_or_default()
}

/// Dedup key for an article: the slugified title, or the URL when the
/// title has nothing left after slugifying (e.g. `"???"`).
pub(crate) fn article_slug(title: &str, url: &str) -> String {
    let slug = slugify_title(title);
    if slug.trim_matches('-').is_empty() {
        url.to_string()
    } else {
        slug
    }
}

/// Reject URLs that do not parse as absolute http(s) URLs.
pub(crate) fn checked_url(raw: String, field: &str) -> Result<String, NormalizeError> {
    match url::Url::parse(&raw) {
        Ok(u) if matches!(u.scheme(), "http" | "https") => Ok(raw),
        Ok(u) => Err(NormalizeError::Invalid {
            field: field.to_string(),
            message: format!("unsupported scheme '{}'", u.scheme()),
        }),
        Err(e) => Err(NormalizeError::Invalid {
            field: field.to_string(),
            message: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_object_array_missing_and_wrong_shape() {
        let d = doc(json!({"articles": "nope"}));
        assert_eq!(
            object_array(&d, "items").unwrap_err(),
            NormalizeError::MissingField("items".to_string())
        );
        assert!(matches!(
            object_array(&d, "articles").unwrap_err(),
            NormalizeError::WrongShape { expected: "array", .. }
        ));
    }

    #[test]
    fn test_object_array_rejects_non_object_items() {
        let d = doc(json!({"articles": [{"title": "a"}, 3]}));
        match object_array(&d, "articles").unwrap_err() {
            NormalizeError::WrongShape { field, expected } => {
                assert_eq!(field, "articles[1]");
                assert_eq!(expected, "object");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_required_str() {
        let o = doc(json!({"a": " x ", "b": "  ", "c": null, "d": 4}));
        assert_eq!(required_str(&o, "a").unwrap(), "x");
        assert!(matches!(required_str(&o, "b"), Err(NormalizeError::MissingField(_))));
        assert!(matches!(required_str(&o, "c"), Err(NormalizeError::MissingField(_))));
        assert!(matches!(required_str(&o, "e"), Err(NormalizeError::MissingField(_))));
        assert!(matches!(required_str(&o, "d"), Err(NormalizeError::WrongShape { .. })));
    }

    #[test]
    fn test_nested_and_optional_str() {
        let o = doc(json!({"source": {"name": "BBC"}, "author": null}));
        assert_eq!(nested_str(&o, "source", "name"), "BBC");
        assert_eq!(nested_str(&o, "missing", "name"), "");
        assert_eq!(optional_str(&o, "author"), "");
    }

    #[test]
    fn test_article_slug_falls_back_to_url() {
        assert_eq!(article_slug("Hello World", "https://a.example/1"), "hello-world");
        assert_eq!(article_slug("???", "https://a.example/1"), "https://a.example/1");
        assert_eq!(article_slug(" - ", "https://a.example/2"), "https://a.example/2");
    }

    #[test]
    fn test_checked_url() {
        assert!(checked_url("https://example.com/a".to_string(), "url").is_ok());
        assert!(checked_url("ftp://example.com/a".to_string(), "url").is_err());
        assert!(checked_url("not a url".to_string(), "url").is_err());
    }
}
