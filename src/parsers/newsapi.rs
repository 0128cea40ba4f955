//! [NewsAPI.org](https://newsapi.org) response parser.
//!
//! Handles the `top-headlines` and `everything` endpoints, which share one
//! envelope:
//!
//! ```text
//! {"status": "ok", "totalResults": 2, "articles": [
//!     {"source": {"id": null, "name": "BBC News"}, "author": "...",
//!      "title": "...", "url": "...", "urlToImage": "...", ...}
//! ]}
//! ```
//!
//! NewsAPI replaces withdrawn articles with a `[Removed]` placeholder; those
//! are dropped rather than treated as errors.

use super::{article_slug, checked_url, nested_str, object_array, optional_str, required_str};
use crate::error::NormalizeError;
use crate::models::{Document, Record};
use tracing::debug;

pub const SOURCE_ID: &str = "newsapi";

const REMOVED_TITLE: &str = "[Removed]";

/// Normalize a NewsAPI document.
///
/// # Errors
///
/// [`NormalizeError::Upstream`] when `status` is `"error"`, and the usual
/// missing-field/shape errors when an article lacks a title or URL.
pub fn parse(doc: &Document) -> Result<Vec<Record>, NormalizeError> {
    if doc.get("status").and_then(|v| v.as_str()) == Some("error") {
        let code = doc.get("code").and_then(|v| v.as_str()).unwrap_or("unknown");
        let message = doc.get("message").and_then(|v| v.as_str()).unwrap_or_default();
        return Err(NormalizeError::Upstream(format!("{code}: {message}")));
    }

    let mut records = Vec::new();
    for article in object_array(doc, "articles")? {
        let title = required_str(article, "title")?;
        if title == REMOVED_TITLE {
            debug!("Skipping removed NewsAPI article");
            continue;
        }
        let url = checked_url(required_str(article, "url")?, "url")?;

        // NewsAPI often leaves author null; the outlet name is the next best byline.
        let mut author = optional_str(article, "author");
        if author.is_empty() {
            author = nested_str(article, "source", "name");
        }

        records.push(Record {
            slug: article_slug(&title, &url),
            title,
            url,
            source: SOURCE_ID.to_string(),
            author,
            image: optional_str(article, "urlToImage"),
        });
    }
    Ok(records)
}
