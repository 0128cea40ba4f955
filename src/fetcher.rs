//! Single-source fetch: download, decode, normalize.
//!
//! The network side sits behind the [`DocumentSource`] trait so the
//! aggregator can be driven by [`HttpSource`] in production and by an
//! in-memory stub in tests.
//!
//! # Failure stages
//!
//! | Stage | Error kind |
//! |-------|------------|
//! | GET, non-2xx status, timeout | [`FetchErrorKind::Transport`] |
//! | body is not a JSON object | [`FetchErrorKind::Decode`] |
//! | no parser for the source | [`FetchErrorKind::UnknownSource`] |
//! | parser rejects the document | [`FetchErrorKind::Normalize`] |
//!
//! [`FetchErrorKind::Transport`]: crate::error::FetchErrorKind::Transport
//! [`FetchErrorKind::Decode`]: crate::error::FetchErrorKind::Decode
//! [`FetchErrorKind::UnknownSource`]: crate::error::FetchErrorKind::UnknownSource
//! [`FetchErrorKind::Normalize`]: crate::error::FetchErrorKind::Normalize

use crate::error::FetchError;
use crate::models::{Document, Record};
use crate::registry::ParserRegistry;
use crate::utils::truncate_for_log;
use async_trait::async_trait;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};

/// Default per-request timeout for [`HttpSource`].
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(20);

const USER_AGENT: &str = concat!("news_aggregator/", env!("CARGO_PKG_VERSION"));

/// Something that can turn an endpoint URI into a decoded JSON document.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Retrieve and decode the document at `url`.
    ///
    /// Errors carry an empty `source_id`; [`fetch_one`] fills it in.
    async fn get_document(&self, url: &str) -> Result<Document, FetchError>;
}

/// [`DocumentSource`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
}

impl HttpSource {
    /// Build a client with the given per-request timeout.
    ///
    /// # Errors
    ///
    /// Fails only if the TLS backend cannot be initialised.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl DocumentSource for HttpSource {
    #[instrument(level = "debug", skip(self))]
    async fn get_document(&self, url: &str) -> Result<Document, FetchError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::transport("", e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::transport("", format!("HTTP status {status}")));
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| FetchError::transport("", e))?;
        debug!(bytes = body.len(), "Downloaded response body");
        decode_document(&body)
    }
}

/// Decode a response body as a JSON object.
///
/// # Errors
///
/// [`FetchErrorKind::Decode`](crate::error::FetchErrorKind::Decode) for
/// malformed JSON and for valid JSON that is not an object.
pub fn decode_document(body: &[u8]) -> Result<Document, FetchError> {
    match serde_json::from_slice::<serde_json::Value>(body) {
        Ok(serde_json::Value::Object(map)) => Ok(map),
        Ok(other) => Err(FetchError::decode(
            "",
            format!(
                "expected a JSON object, got {}",
                truncate_for_log(&other.to_string(), 80)
            ),
        )),
        Err(e) => Err(FetchError::decode("", e)),
    }
}

/// Fetch one source and normalize its document into records.
///
/// All-or-nothing: on any failure no records are returned. The records of a
/// successful call are exactly what the parser produced, in its order.
#[instrument(level = "info", skip_all, fields(source = %source_id, %url))]
pub async fn fetch_one<S>(
    source: &S,
    registry: &ParserRegistry,
    source_id: &str,
    url: &str,
) -> Result<Vec<Record>, FetchError>
where
    S: DocumentSource + ?Sized,
{
    let t0 = Instant::now();
    let doc = source
        .get_document(url)
        .await
        .map_err(|e| e.for_source(source_id))?;

    let normalize = registry.lookup(source_id)?;
    let records = normalize(&doc).map_err(|e| FetchError::normalize(source_id, &e))?;

    info!(
        count = records.len(),
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "Fetched source"
    );
    Ok(records)
}
