//! Post-processing of an aggregated record list: deduplication and
//! keyword categorization. Both are pure and independent of how the list
//! was produced.

use crate::aggregator::AggregateReport;
use crate::models::{Digest, Record};
use itertools::Itertools;
use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use tracing::debug;

/// A category bucket and the lower-case title substrings that select it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRule {
    pub label: String,
    pub keywords: Vec<String>,
}

impl CategoryRule {
    pub fn new<I, K>(label: impl Into<String>, keywords: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self {
            label: label.into(),
            keywords: keywords
                .into_iter()
                .map(|k| k.into().to_lowercase())
                .collect(),
        }
    }

    fn matches(&self, lowered_title: &str) -> bool {
        self.keywords.iter().any(|k| lowered_title.contains(k.as_str()))
    }
}

static DEFAULT_RULES: Lazy<Vec<CategoryRule>> =
    Lazy::new(|| vec![CategoryRule::new("technology", ["technology"])]);

/// The rules [`categorize`] applies.
pub fn default_rules() -> &'static [CategoryRule] {
    &DEFAULT_RULES
}

/// Keep the first record seen for each slug, in input order.
///
/// "First" is relative to the order of `records`; since aggregation order is
/// not stable across runs, neither is which duplicate survives.
pub fn deduplicate(records: Vec<Record>) -> Vec<Record> {
    let before = records.len();
    let unique: Vec<Record> = records
        .into_iter()
        .unique_by(|r| r.slug.clone())
        .collect();
    debug!(before, after = unique.len(), "Deduplicated records");
    unique
}

/// Bucket records with the default rules.
///
/// A record whose title contains "technology" (any case) goes to
/// `"technology"`. Records matching nothing are left out.
pub fn categorize(records: &[Record]) -> BTreeMap<String, Vec<Record>> {
    categorize_with(records, default_rules())
}

/// Bucket records with a caller-supplied rule table.
///
/// A record can land in several buckets, but at most once in each. Empty
/// buckets are omitted.
pub fn categorize_with(records: &[Record], rules: &[CategoryRule]) -> BTreeMap<String, Vec<Record>> {
    let mut categories: BTreeMap<String, Vec<Record>> = BTreeMap::new();
    for record in records {
        let title = record.title.to_lowercase();
        for label in rules
            .iter()
            .filter(|rule| rule.matches(&title))
            .map(|rule| &rule.label)
            .unique()
        {
            categories
                .entry(label.clone())
                .or_default()
                .push(record.clone());
        }
    }
    categories
}

/// Run both post-processing steps over a finished run.
///
/// Failures are keyed by source; if one source somehow failed twice the
/// last message wins.
pub fn build_digest(report: AggregateReport, generated_at: String) -> Digest {
    let total_fetched = report.records.len();
    let records = deduplicate(report.records);
    let categories = categorize(&records);
    let failures = report
        .failures
        .into_iter()
        .map(|e| (e.source_id.clone(), format!("{}: {}", e.kind, e.message)))
        .collect();

    Digest {
        generated_at,
        total_fetched,
        records,
        categories,
        failures,
    }
}
