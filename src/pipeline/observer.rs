use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::spec::SortDirection;

/// Events emitted while a pipeline run progresses.
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    RunStarted { input_rows: usize },
    FilterFinished { input_rows: usize, output_rows: usize },
    SortFinished { key: Option<String>, direction: SortDirection },
    AggregateFinished { field: String, groups: usize },
    RunFinished {
        elapsed: Duration,
        metrics: PipelineMetricsSnapshot,
    },
}

/// Observer hook for pipeline events.
pub trait PipelineObserver: Send + Sync {
    fn on_event(&self, event: &PipelineEvent);
}

/// A simple stderr logger for pipeline events.
#[derive(Debug, Default)]
pub struct StdErrPipelineObserver;

impl PipelineObserver for StdErrPipelineObserver {
    fn on_event(&self, event: &PipelineEvent) {
        eprintln!("[pipeline] {event:?}");
    }
}

/// Forwards pipeline events to `tracing` at debug level (run completion at info).
#[derive(Debug, Default)]
pub struct TracingPipelineObserver;

impl PipelineObserver for TracingPipelineObserver {
    fn on_event(&self, event: &PipelineEvent) {
        match event {
            PipelineEvent::RunStarted { input_rows } => {
                tracing::debug!(input_rows, "pipeline run started");
            }
            PipelineEvent::FilterFinished {
                input_rows,
                output_rows,
            } => {
                tracing::debug!(input_rows, output_rows, "filter finished");
            }
            PipelineEvent::SortFinished { key, direction } => {
                tracing::debug!(key = ?key, direction = ?direction, "sort finished");
            }
            PipelineEvent::AggregateFinished { field, groups } => {
                tracing::debug!(field = %field, groups, "aggregate finished");
            }
            PipelineEvent::RunFinished { elapsed, metrics } => {
                tracing::info!(elapsed = ?elapsed, %metrics, "pipeline run finished");
            }
        }
    }
}

/// Counters for the most recent pipeline run.
///
/// The pipeline updates these as it runs; callers holding the `Arc` can snapshot them at any time.
pub struct PipelineMetrics {
    run_id: AtomicU64,
    elapsed_ns: AtomicU64,
    rows_scanned: AtomicU64,
    rows_passed: AtomicU64,
    groups_built: AtomicU64,
}

impl PipelineMetrics {
    pub fn new() -> Self {
        Self {
            run_id: AtomicU64::new(0),
            elapsed_ns: AtomicU64::new(0),
            rows_scanned: AtomicU64::new(0),
            rows_passed: AtomicU64::new(0),
            groups_built: AtomicU64::new(0),
        }
    }

    pub fn begin_run(&self) {
        let _ = self.run_id.fetch_add(1, Ordering::SeqCst);
        self.elapsed_ns.store(0, Ordering::SeqCst);
        self.rows_scanned.store(0, Ordering::SeqCst);
        self.rows_passed.store(0, Ordering::SeqCst);
        self.groups_built.store(0, Ordering::SeqCst);
    }

    pub fn end_run(&self, elapsed: Duration) {
        self.elapsed_ns
            .store(elapsed.as_nanos().min(u64::MAX as u128) as u64, Ordering::SeqCst);
    }

    pub fn on_filtered(&self, scanned: usize, passed: usize) {
        let _ = self.rows_scanned.fetch_add(scanned as u64, Ordering::SeqCst);
        let _ = self.rows_passed.fetch_add(passed as u64, Ordering::SeqCst);
    }

    pub fn on_groups(&self, groups: usize) {
        let _ = self.groups_built.fetch_add(groups as u64, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> PipelineMetricsSnapshot {
        let elapsed_ns = self.elapsed_ns.load(Ordering::SeqCst);
        PipelineMetricsSnapshot {
            run_id: self.run_id.load(Ordering::SeqCst),
            elapsed: (elapsed_ns > 0).then(|| Duration::from_nanos(elapsed_ns)),
            rows_scanned: self.rows_scanned.load(Ordering::SeqCst),
            rows_passed: self.rows_passed.load(Ordering::SeqCst),
            groups_built: self.groups_built.load(Ordering::SeqCst),
        }
    }
}

impl Default for PipelineMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PipelineMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PipelineMetrics").field(&self.snapshot()).finish()
    }
}

/// Immutable snapshot of [`PipelineMetrics`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineMetricsSnapshot {
    pub run_id: u64,
    pub elapsed: Option<Duration>,
    pub rows_scanned: u64,
    pub rows_passed: u64,
    pub groups_built: u64,
}

impl fmt::Display for PipelineMetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "run_id={}, rows={}/{}, groups={}, elapsed={:?}",
            self.run_id, self.rows_passed, self.rows_scanned, self.groups_built, self.elapsed
        )
    }
}
