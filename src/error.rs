//! Error types.
//!
//! Per-source failures ([`FetchError`]) are contained by the aggregator: they
//! are logged and reported, never propagated out of a run.

use std::fmt;
use thiserror::Error;

/// What stage of a single-source fetch failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchErrorKind {
    /// Connection, DNS, timeout or non-2xx status.
    Transport,
    /// The body was not a JSON object.
    Decode,
    /// No parser is registered for the source identifier.
    UnknownSource,
    /// The parser rejected the document.
    Normalize,
}

impl fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FetchErrorKind::Transport => "transport",
            FetchErrorKind::Decode => "decode",
            FetchErrorKind::UnknownSource => "unknown_source",
            FetchErrorKind::Normalize => "normalize",
        };
        f.write_str(s)
    }
}

/// Failure of one source during one run.
#[derive(Debug, Clone, Error)]
#[error("{kind} error for source '{source_id}': {message}")]
pub struct FetchError {
    pub source_id: String,
    pub kind: FetchErrorKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FetchErrorKind, source_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            kind,
            message: message.into(),
        }
    }

    pub fn transport(source_id: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::new(FetchErrorKind::Transport, source_id, message.to_string())
    }

    pub fn decode(source_id: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::new(FetchErrorKind::Decode, source_id, message.to_string())
    }

    pub fn unknown_source(source_id: impl Into<String>) -> Self {
        Self::new(FetchErrorKind::UnknownSource, source_id, "no parser registered")
    }

    pub fn normalize(source_id: impl Into<String>, err: &NormalizeError) -> Self {
        Self::new(FetchErrorKind::Normalize, source_id, err.to_string())
    }

    /// Rebind an error produced without knowing which source it belongs to.
    pub fn for_source(mut self, source_id: &str) -> Self {
        self.source_id = source_id.to_string();
        self
    }
}

/// Errors a parser may return for a document it cannot map to records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("field '{field}' has the wrong shape: expected {expected}")]
    WrongShape { field: String, expected: &'static str },

    #[error("invalid value for {field}: {message}")]
    Invalid { field: String, message: String },

    /// The API answered with an error payload instead of articles.
    #[error("source reported an error: {0}")]
    Upstream(String),
}

/// Errors loading the source configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing {path}: {message}")]
    Parse { path: String, message: String },

    #[error("source identifier must not be empty")]
    EmptySourceId,

    #[error("source identifier '{0}' is configured more than once")]
    DuplicateSourceId(String),

    #[error("invalid endpoint for source '{source_id}': {message}")]
    InvalidEndpoint { source_id: String, message: String },

    #[error("no sources configured")]
    NoSources,
}
