//! Parser registry: source identifier → normalization function.
//!
//! The registry is built once during setup, then wrapped in an `Arc` and
//! handed to the [`Aggregator`](crate::aggregator::Aggregator). Registration
//! takes `&mut self`, so nothing can register a parser while a run holds a
//! shared reference.

use crate::error::{FetchError, NormalizeError};
use crate::models::{Document, Record};
use crate::parsers;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// A normalization function: maps one decoded document to zero or more
/// records, or rejects it.
pub type Normalizer = Arc<dyn Fn(&Document) -> Result<Vec<Record>, NormalizeError> + Send + Sync>;

#[derive(Default, Clone)]
pub struct ParserRegistry {
    parsers: HashMap<String, Normalizer>,
}

impl ParserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the parsers this crate ships, keyed by their usual
    /// source identifiers (`newsapi`, `gnews`).
    pub fn with_builtin_parsers() -> Self {
        let mut registry = Self::new();
        registry.register(parsers::newsapi::SOURCE_ID, parsers::newsapi::parse);
        registry.register(parsers::gnews::SOURCE_ID, parsers::gnews::parse);
        registry
    }

    /// Associate `source_id` with `normalize`, replacing any earlier parser.
    pub fn register<F>(&mut self, source_id: impl Into<String>, normalize: F)
    where
        F: Fn(&Document) -> Result<Vec<Record>, NormalizeError> + Send + Sync + 'static,
    {
        let source_id = source_id.into();
        debug!(source = %source_id, "Registered parser");
        self.parsers.insert(source_id, Arc::new(normalize));
    }

    /// Find the parser for `source_id`.
    ///
    /// # Errors
    ///
    /// [`FetchErrorKind::UnknownSource`](crate::error::FetchErrorKind::UnknownSource)
    /// if nothing is registered under that identifier.
    pub fn lookup(&self, source_id: &str) -> Result<Normalizer, FetchError> {
        self.parsers
            .get(source_id)
            .cloned()
            .ok_or_else(|| FetchError::unknown_source(source_id))
    }

    pub fn contains(&self, source_id: &str) -> bool {
        self.parsers.contains_key(source_id)
    }

    /// Registered identifiers, sorted.
    pub fn sources(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.parsers.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }
}

impl fmt::Debug for ParserRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserRegistry")
            .field("sources", &self.sources())
            .finish()
    }
}
