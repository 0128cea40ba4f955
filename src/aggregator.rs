//! Concurrent fan-out/fan-in over every configured source.
//!
//! # Architecture
//!
//! ```text
//!  ┌──────────┐   ┌──────────┐        ┌──────────┐
//!  │ source 0 │   │ source 1 │  ...   │ source N │   one tokio task each
//!  └────┬─────┘   └────┬─────┘        └────┬─────┘
//!       └──────┬───────┴───────────────────┘
//!              ▼
//!     ┌──────────────────┐
//!     │ unbounded mpsc   │   sink: every task holds a sender
//!     └────────┬─────────┘
//!              ▼
//!     ┌──────────────────┐
//!     │ collector loop   │   ends when the last sender drops
//!     └──────────────────┘
//! ```
//!
//! The aggregator drops its own sender right after spawning, so the sink
//! reports closed exactly once: after the last task has finished (or
//! panicked) and released its sender. The collector drains while tasks are
//! still producing, so no producer ever blocks. The tasks live in a
//! `JoinSet`: after the drain every one is joined, and if the caller drops
//! the run early the set aborts whatever is still in flight.

use crate::error::{FetchError, FetchErrorKind};
use crate::fetcher::{fetch_one, DocumentSource};
use crate::models::{Record, SourceConfig};
use crate::registry::ParserRegistry;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, instrument, warn};

/// Result of one run, including what went wrong.
#[derive(Debug, Default)]
pub struct AggregateReport {
    /// Every record emitted by every successful source.
    pub records: Vec<Record>,
    /// One entry per source that contributed nothing because it failed.
    pub failures: Vec<FetchError>,
    /// Tasks spawned; always equal to the number of configured sources.
    pub launched: usize,
    /// Tasks observed in a terminal state before returning.
    pub completed: usize,
}

impl AggregateReport {
    pub fn succeeded(&self) -> usize {
        self.completed - self.failures.len()
    }
}

enum TaskOutcome {
    Done { source_id: String, count: usize },
    Failed(FetchError),
}

/// Runs [`fetch_one`] for every source concurrently and merges the results.
pub struct Aggregator<S: ?Sized> {
    registry: Arc<ParserRegistry>,
    source: Arc<S>,
    task_timeout: Option<Duration>,
}

impl<S> Aggregator<S>
where
    S: DocumentSource + ?Sized + 'static,
{
    pub fn new(registry: Arc<ParserRegistry>, source: Arc<S>) -> Self {
        Self {
            registry,
            source,
            task_timeout: None,
        }
    }

    /// Bound each source's fetch. A source that exceeds it is reported as a
    /// transport failure; the others are unaffected.
    pub fn with_task_timeout(mut self, timeout: Duration) -> Self {
        self.task_timeout = Some(timeout);
        self
    }

    /// Fetch every source and return the merged records.
    ///
    /// Order across sources is unspecified; order within one source is the
    /// parser's. Per-source failures are logged and otherwise ignored, so a
    /// run where everything fails returns an empty list.
    pub async fn aggregate(&self, sources: &SourceConfig) -> Vec<Record> {
        self.aggregate_with_report(sources).await.records
    }

    /// Like [`aggregate`](Self::aggregate), also returning the failures.
    #[instrument(level = "info", skip_all, fields(sources = sources.len()))]
    pub async fn aggregate_with_report(&self, sources: &SourceConfig) -> AggregateReport {
        let t0 = Instant::now();
        let (sink_tx, mut sink_rx) = mpsc::unbounded_channel::<Record>();
        let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel::<TaskOutcome>();

        // Dropping the set aborts every task still running, so a cancelled
        // run leaves nothing behind.
        let mut tasks = JoinSet::new();
        for (source_id, url) in sources {
            let sink = sink_tx.clone();
            let outcomes = outcome_tx.clone();
            let registry = Arc::clone(&self.registry);
            let source = Arc::clone(&self.source);
            let task_timeout = self.task_timeout;
            let id = source_id.clone();
            let url = url.clone();

            tasks.spawn(async move {
                let fetch = fetch_one(&*source, &registry, &id, &url);
                let result = match task_timeout {
                    Some(limit) => match tokio::time::timeout(limit, fetch).await {
                        Ok(result) => result,
                        Err(_) => Err(FetchError::transport(
                            id.as_str(),
                            format!("timed out after {limit:?}"),
                        )),
                    },
                    None => fetch.await,
                };

                let outcome = match result {
                    Ok(records) => {
                        let count = records.len();
                        for record in records {
                            // Receiver only goes away if the caller dropped the run.
                            if sink.send(record).is_err() {
                                break;
                            }
                        }
                        TaskOutcome::Done { source_id: id, count }
                    }
                    Err(e) => TaskOutcome::Failed(e),
                };
                let _ = outcomes.send(outcome);
            });
        }
        drop(sink_tx);
        drop(outcome_tx);

        let launched = tasks.len();
        debug!(launched, "Spawned fetch tasks");

        let mut records = Vec::new();
        while let Some(record) = sink_rx.recv().await {
            records.push(record);
        }

        let mut report = AggregateReport {
            launched,
            ..Default::default()
        };
        let mut panicked = 0usize;
        while let Some(joined) = tasks.join_next().await {
            report.completed += 1;
            if let Err(join_err) = joined {
                panicked += 1;
                error!(error = %join_err, "Fetch task panicked");
            }
        }

        let mut reported: HashSet<String> = HashSet::with_capacity(launched);
        while let Some(outcome) = outcome_rx.recv().await {
            match outcome {
                TaskOutcome::Done { source_id, count } => {
                    debug!(source = %source_id, count, "Source contributed records");
                    reported.insert(source_id);
                }
                TaskOutcome::Failed(e) => {
                    warn!(source = %e.source_id, kind = %e.kind, error = %e.message, "Source failed; skipping");
                    reported.insert(e.source_id.clone());
                    report.failures.push(e);
                }
            }
        }

        // A task that panicked never sent an outcome. The panic may come from
        // the parser or the document source; it is filed under `Normalize`
        // and the message says which stage is unknown.
        if panicked > 0 {
            for source_id in sources.keys().filter(|id| !reported.contains(id.as_str())) {
                error!(source = %source_id, "Fetch task panicked; skipping");
                report.failures.push(FetchError::new(
                    FetchErrorKind::Normalize,
                    source_id.as_str(),
                    "task panicked while fetching or parsing",
                ));
            }
        }

        report.records = records;
        info!(
            launched = report.launched,
            succeeded = report.succeeded(),
            failed = report.failures.len(),
            records = report.records.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Aggregation complete"
        );
        report
    }
}
