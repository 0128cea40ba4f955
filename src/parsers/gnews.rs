//! [GNews](https://gnews.io) response parser.
//!
//! ```text
//! {"totalArticles": 1, "articles": [
//!     {"title": "...", "url": "...", "image": "...",
//!      "source": {"name": "...", "url": "..."}}
//! ]}
//! ```
//!
//! GNews has no author field; the outlet name is used instead.

use super::{article_slug, checked_url, nested_str, object_array, optional_str, required_str};
use crate::error::NormalizeError;
use crate::models::{Document, Record};
use serde_json::Value;

pub const SOURCE_ID: &str = "gnews";

/// Normalize a GNews document.
///
/// # Errors
///
/// [`NormalizeError::Upstream`] when the body carries an `errors` list, and
/// missing-field/shape errors for malformed articles.
pub fn parse(doc: &Document) -> Result<Vec<Record>, NormalizeError> {
    if let Some(errors) = doc.get("errors") {
        let message = match errors {
            Value::Array(items) => items
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join("; "),
            other => other.to_string(),
        };
        return Err(NormalizeError::Upstream(message));
    }

    object_array(doc, "articles")?
        .into_iter()
        .map(|article| -> Result<Record, NormalizeError> {
            let title = required_str(article, "title")?;
            let url = checked_url(required_str(article, "url")?, "url")?;
            Ok(Record {
                slug: article_slug(&title, &url),
                title,
                url,
                source: SOURCE_ID.to_string(),
                author: nested_str(article, "source", "name"),
                image: optional_str(article, "image"),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_parse_articles() {
        let d = doc(json!({
            "totalArticles": 1,
            "articles": [{
                "title": "Technology Inc raises funding",
                "description": "...",
                "url": "https://news.example.com/technology-inc",
                "image": "https://news.example.com/img.png",
                "publishedAt": "2025-05-06T08:00:00Z",
                "source": {"name": "Example News", "url": "https://news.example.com"}
            }]
        }));

        let records = parse(&d).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].slug, "technology-inc-raises-funding");
        assert_eq!(records[0].author, "Example News");
        assert_eq!(records[0].source, SOURCE_ID);
    }

    #[test]
    fn test_parse_errors_payload() {
        let d = doc(json!({"errors": ["You did not provide an API key."]}));
        assert_eq!(
            parse(&d).unwrap_err(),
            NormalizeError::Upstream("You did not provide an API key.".to_string())
        );
    }

    #[test]
    fn test_punctuation_only_titles_keep_distinct_slugs() {
        let d = doc(json!({"articles": [
            {"title": "???", "url": "https://news.example.com/a"},
            {"title": "!!!", "url": "https://news.example.com/b"}
        ]}));

        let records = parse(&d).unwrap();
        assert_eq!(records[0].slug, "https://news.example.com/a");
        assert_eq!(records[1].slug, "https://news.example.com/b");
        assert_eq!(crate::processor::deduplicate(records).len(), 2);
    }

    #[test]
    fn test_parse_rejects_bad_url() {
        let d = doc(json!({"articles": [{"title": "x", "url": "javascript:alert(1)"}]}));
        assert!(matches!(
            parse(&d).unwrap_err(),
            NormalizeError::Invalid { .. }
        ));
    }
}
