//! Data models shared by every stage of the pipeline.
//!
//! - [`Record`]: one normalized news article, as produced by a parser
//! - [`SourceConfig`]: which sources to fetch and from where
//! - [`Document`]: the decoded, schema-less JSON body handed to parsers
//! - [`Digest`]: the serialized result of one aggregation run

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A decoded response body: a JSON object of arbitrary shape.
///
/// Parsers receive this instead of a per-source struct so a new provider
/// can be supported by registering a function, without new types.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Source identifier → endpoint URI. Read-only for the duration of a run.
pub type SourceConfig = BTreeMap<String, String>;

/// A normalized news article.
///
/// Two records with the same `slug` are the same article, whatever the
/// other fields say. Records are never modified after a parser returns them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Record {
    /// Headline as published by the source.
    pub title: String,
    /// Canonical article URL.
    pub url: String,
    /// Identifier of the source the record was fetched from.
    pub source: String,
    /// Dedup key.
    pub slug: String,
    pub author: String,
    /// Image URL, empty if the source did not provide one.
    pub image: String,
}

/// The output of one run: everything the CLI writes to disk.
#[derive(Debug, Deserialize, Serialize)]
pub struct Digest {
    /// Local time the run finished, RFC 3339.
    pub generated_at: String,
    /// Records collected before deduplication.
    pub total_fetched: usize,
    /// Deduplicated records.
    pub records: Vec<Record>,
    /// Category label → records in that bucket.
    pub categories: BTreeMap<String, Vec<Record>>,
    /// Source identifier → error text, for sources that contributed nothing.
    pub failures: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(slug: &str) -> Record {
        Record {
            title: "Test".to_string(),
            url: "https://example.com/test".to_string(),
            source: "example".to_string(),
            slug: slug.to_string(),
            author: "Jane Doe".to_string(),
            image: String::new(),
        }
    }

    #[test]
    fn test_record_serialization() {
        let json = serde_json::to_string(&record("test")).unwrap();
        assert!(json.contains(r#""slug":"test""#));
        assert!(json.contains(r#""image":"""#));
    }

    #[test]
    fn test_digest_deserialization() {
        let json = r#"{
            "generated_at": "2025-05-06T08:00:00+00:00",
            "total_fetched": 3,
            "records": [],
            "categories": {},
            "failures": {"sports": "transport error"}
        }"#;

        let digest: Digest = serde_json::from_str(json).unwrap();
        assert_eq!(digest.total_fetched, 3);
        assert!(digest.records.is_empty());
        assert_eq!(digest.failures["sports"], "transport error");
    }
}
