//! Source configuration file loading.
//!
//! Accepts YAML (`.yaml`/`.yml`) or JSON (`.json`), either as a flat map
//!
//! ```yaml
//! newsapi: https://newsapi.org/v2/top-headlines?country=us&apiKey=...
//! gnews: https://gnews.io/api/v4/top-headlines?token=...
//! ```
//!
//! or nested under a `sources` key. Identifiers are trimmed; every endpoint
//! must be an absolute `http`/`https` URL.

use crate::error::ConfigError;
use crate::models::SourceConfig;
use serde::Deserialize;
use std::path::Path;
use tracing::{info, instrument};
use url::Url;

#[derive(Deserialize)]
#[serde(untagged)]
enum ConfigFile {
    Nested { sources: SourceConfig },
    Flat(SourceConfig),
}

/// Load and validate a source configuration file.
///
/// # Errors
///
/// I/O and parse errors, empty or duplicate identifiers, bad endpoints, or
/// no sources.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub fn load_sources(path: &Path) -> Result<SourceConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let is_json = path
        .extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let sources = parse_sources(&content, is_json).map_err(|message| ConfigError::Parse {
        path: path.display().to_string(),
        message,
    })?;
    let sources = validate_sources(sources)?;
    info!(count = sources.len(), "Loaded source configuration");
    Ok(sources)
}

fn parse_sources(content: &str, is_json: bool) -> Result<SourceConfig, String> {
    let file: ConfigFile = if is_json {
        serde_json::from_str(content).map_err(|e| e.to_string())?
    } else {
        serde_yaml::from_str(content).map_err(|e| e.to_string())?
    };
    Ok(match file {
        ConfigFile::Nested { sources } => sources,
        ConfigFile::Flat(sources) => sources,
    })
}

/// Trim identifiers and check every endpoint.
///
/// # Errors
///
/// See [`ConfigError`].
pub fn validate_sources(raw: SourceConfig) -> Result<SourceConfig, ConfigError> {
    if raw.is_empty() {
        return Err(ConfigError::NoSources);
    }
    let mut sources = SourceConfig::new();
    for (id, endpoint) in raw {
        let id = id.trim().to_string();
        if id.is_empty() {
            return Err(ConfigError::EmptySourceId);
        }
        let endpoint = endpoint.trim().to_string();
        match Url::parse(&endpoint) {
            Ok(u) if matches!(u.scheme(), "http" | "https") => {}
            Ok(u) => {
                return Err(ConfigError::InvalidEndpoint {
                    source_id: id,
                    message: format!("unsupported scheme '{}'", u.scheme()),
                });
            }
            Err(e) => {
                return Err(ConfigError::InvalidEndpoint {
                    source_id: id,
                    message: e.to_string(),
                });
            }
        }
        if sources.contains_key(&id) {
            return Err(ConfigError::DuplicateSourceId(id));
        }
        sources.insert(id, endpoint);
    }
    Ok(sources)
}
