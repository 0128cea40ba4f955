//! # News Aggregator
//!
//! Fetches news from several JSON APIs at once, normalizes every response
//! into a common [`Record`], then deduplicates and categorizes the result.
//!
//! ## Pipeline
//!
//! 1. **Setup**: build a [`ParserRegistry`] mapping source identifiers to
//!    normalization functions, and a [`SourceConfig`] mapping identifiers
//!    to endpoint URLs
//! 2. **Aggregation**: [`Aggregator`] spawns one task per source, each
//!    running [`fetch_one`]; records flow into a shared channel that closes
//!    once the last task is done
//! 3. **Post-processing**: [`deduplicate`] by slug, then [`categorize`] by
//!    title keywords
//!
//! A failing source (network, bad JSON, no parser, parser error) is logged
//! and skipped; it never affects the other sources.
//!
//! ## Example
//!
//! ```ignore
//! let registry = Arc::new(ParserRegistry::with_builtin_parsers());
//! let http = Arc::new(HttpSource::new(DEFAULT_HTTP_TIMEOUT)?);
//! let records = Aggregator::new(registry, http).aggregate(&sources).await;
//! let by_category = categorize(&deduplicate(records));
//! ```

pub mod aggregator;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod models;
pub mod outputs;
pub mod parsers;
pub mod processor;
pub mod registry;
pub mod utils;

pub use aggregator::{AggregateReport, Aggregator};
pub use error::{ConfigError, FetchError, FetchErrorKind, NormalizeError};
pub use fetcher::{fetch_one, DocumentSource, HttpSource, DEFAULT_HTTP_TIMEOUT};
pub use models::{Digest, Document, Record, SourceConfig};
pub use processor::{build_digest, categorize, categorize_with, deduplicate, CategoryRule};
pub use registry::{Normalizer, ParserRegistry};
