//! JSON output of a [`Digest`].
//!
//! Files are grouped by local date, one file per run named after the local
//! time it finished, so several runs a day never overwrite each other.

use crate::models::Digest;
use chrono::{DateTime, Local};
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

/// Path a digest finished at `at` is written to under `json_output_dir`.
pub fn digest_path(json_output_dir: &str, at: &DateTime<Local>) -> PathBuf {
    Path::new(json_output_dir)
        .join(at.format("%Y-%m-%d").to_string())
        .join(format!("{}.json", at.format("%H%M%S")))
}

/// Write a [`Digest`] as pretty JSON to `{json_output_dir}/{date}/{HHMMSS}.json`.
///
/// # Returns
///
/// The path written, or an error if directory creation or the write fails.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir))]
pub async fn write_digest(
    digest: &Digest,
    json_output_dir: &str,
    at: &DateTime<Local>,
) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(digest)?;
    let path = digest_path(json_output_dir, at);

    if let Some(dir) = path.parent() {
        info!(dir = %dir.display(), "Ensuring JSON directory exists");
        if let Err(e) = fs::create_dir_all(dir).await {
            error!(dir = %dir.display(), error = %e, "Failed to create JSON dir");
            return Err(e.into());
        }
    }

    fs::write(&path, json).await?;
    info!(path = %path.display(), records = digest.records.len(), "Wrote digest JSON");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::BTreeMap;

    fn at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 5, 6, 8, 15, 0).unwrap()
    }

    #[test]
    fn test_digest_path() {
        let p = digest_path("/tmp/out", &at());
        assert_eq!(p, PathBuf::from("/tmp/out/2025-05-06/081500.json"));
    }

    #[tokio::test]
    async fn test_write_digest_roundtrip() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().to_str().unwrap().to_string();
        let digest = Digest {
            generated_at: at().to_rfc3339(),
            total_fetched: 0,
            records: vec![],
            categories: BTreeMap::new(),
            failures: BTreeMap::from([("gnews".to_string(), "transport error".to_string())]),
        };

        let path = write_digest(&digest, &dir, &at()).await.unwrap();
        let written: Digest =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.failures["gnews"], "transport error");
        assert!(path.ends_with("2025-05-06/081500.json"));
    }
}
