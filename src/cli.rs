//! Command-line interface definitions.
//!
//! All arguments can be provided via command-line flags or environment
//! variables.

use clap::Parser;
use std::path::PathBuf;

/// Fetch every configured source once, then deduplicate and categorize.
///
/// # Examples
///
/// ```sh
/// # Print a summary to the log
/// news_aggregator -s sources.yaml
///
/// # Also write the digest JSON
/// news_aggregator -s sources.yaml -j ./json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// YAML or JSON file mapping source identifiers to endpoint URLs
    #[arg(short, long, env = "NEWS_SOURCES")]
    pub sources: PathBuf,

    /// Output directory for the digest JSON; omitted means log-only
    #[arg(short, long, env = "NEWS_JSON_OUTPUT_DIR")]
    pub json_output_dir: Option<String>,

    /// Per-request HTTP timeout in seconds
    #[arg(long, default_value_t = 20)]
    pub timeout_secs: u64,

    /// Upper bound on one source's whole fetch, in seconds
    #[arg(long)]
    pub task_timeout_secs: Option<u64>,
}
