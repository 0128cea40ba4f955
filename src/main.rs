//! # News Aggregator CLI
//!
//! Runs one aggregation over the sources listed in a configuration file,
//! deduplicates and categorizes the result, and optionally writes it as
//! JSON.
//!
//! ## Usage
//!
//! ```sh
//! news_aggregator -s sources.yaml -j ./json
//! ```
//!
//! Sources whose identifier has no built-in parser are reported as
//! `unknown_source` failures; the rest of the run is unaffected.

use chrono::Local;
use clap::Parser;
use news_aggregator::outputs::json;
use news_aggregator::utils::ensure_writable_dir;
use news_aggregator::{build_digest, config, Aggregator, HttpSource, ParserRegistry};
use std::error::Error;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod cli;

use cli::Cli;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = Instant::now();
    info!("news_aggregator starting up");

    let args = Cli::parse();
    debug!(?args.sources, ?args.json_output_dir, "Parsed CLI arguments");

    // Fail before any network traffic if the output can't be written.
    if let Some(dir) = &args.json_output_dir {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(
                path = %dir,
                error = %e,
                "JSON output directory is not writable (fix perms or choose a different path)"
            );
            return Err(e);
        }
    }

    let sources = config::load_sources(&args.sources)?;

    let registry = ParserRegistry::with_builtin_parsers();
    for id in sources.keys().filter(|id| !registry.contains(id)) {
        warn!(source = %id, known = ?registry.sources(), "No parser registered; source will be skipped");
    }

    let http = HttpSource::new(Duration::from_secs(args.timeout_secs))?;
    let mut aggregator = Aggregator::new(Arc::new(registry), Arc::new(http));
    if let Some(secs) = args.task_timeout_secs {
        aggregator = aggregator.with_task_timeout(Duration::from_secs(secs));
    }

    let report = aggregator.aggregate_with_report(&sources).await;
    let finished_at = Local::now();
    let digest = build_digest(report, finished_at.to_rfc3339());

    for (label, records) in &digest.categories {
        info!(category = %label, count = records.len(), "Category");
    }
    info!(
        fetched = digest.total_fetched,
        unique = digest.records.len(),
        failed_sources = digest.failures.len(),
        "Digest built"
    );

    if let Some(dir) = &args.json_output_dir {
        if let Err(e) = json::write_digest(&digest, dir, &finished_at).await {
            error!(error = %e, "Failed to write digest JSON");
            return Err(e);
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
