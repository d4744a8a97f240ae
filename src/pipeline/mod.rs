//! Pipeline orchestration: raw records → filtered → sorted → aggregate views and summary.
//!
//! This module sits "above" [`crate::processing`] and provides:
//!
//! - one entry point, [`Pipeline::run`], that recomputes every derived view from scratch
//! - metrics + observer hooks for monitoring
//!
//! A run is synchronous and pure with respect to its inputs: the same dataset and spec always
//! produce value-equal [`PipelineOutput`]s. There is no incremental update; callers re-run on
//! every dataset or spec change (see [`crate::session::DealSession`] for a memoizing wrapper).
//!
//! ```rust
//! use deal_pipeline::pipeline::Pipeline;
//! use deal_pipeline::spec::PipelineSpec;
//! use deal_pipeline::types::{DataSet, Schema, Value};
//!
//! let ds = DataSet::new(
//!     Schema::new(["Region", "Revenue"]),
//!     vec![
//!         vec![Value::text("West"), Value::Number(10.0)],
//!         vec![Value::text("East"), Value::Number(30.0)],
//!     ],
//! );
//! let out = Pipeline::default().run(&ds, &PipelineSpec::default());
//! assert_eq!(out.filtered.row_count(), 2);
//! assert_eq!(out.summary.as_ref().unwrap().field("Revenue").unwrap().average, 20.0);
//! assert_eq!(out.aggregate("Region").unwrap().groups.len(), 2);
//! ```

mod observer;

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use crate::fields::FieldMapping;
use crate::processing::{
    aggregate_view, summarize, AggregateView, CompiledFilter, SortComparator, Summary,
};
use crate::spec::PipelineSpec;
use crate::types::DataSet;

pub use observer::{
    PipelineEvent, PipelineMetrics, PipelineMetricsSnapshot, PipelineObserver,
    StdErrPipelineObserver, TracingPipelineObserver,
};

/// Everything derived from one (dataset, spec) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineOutput {
    /// Records passing the filter, in dataset order.
    pub filtered: DataSet,
    /// `filtered` in sort order.
    pub sorted: DataSet,
    /// One view per `group_by` column; empty when nothing passed the filter.
    pub aggregates: Vec<AggregateView>,
    /// `None` when nothing passed the filter.
    pub summary: Option<Summary>,
}

impl PipelineOutput {
    /// Aggregate view for `field`, if it was requested and anything passed the filter.
    pub fn aggregate(&self, field: &str) -> Option<&AggregateView> {
        self.aggregates.iter().find(|a| a.field == field)
    }
}

/// Runs [`PipelineSpec`]s against datasets laid out per a [`FieldMapping`].
pub struct Pipeline {
    mapping: FieldMapping,
    observer: Option<Arc<dyn PipelineObserver>>,
    metrics: Arc<PipelineMetrics>,
}

impl Pipeline {
    pub fn new(mapping: FieldMapping) -> Self {
        Self {
            mapping,
            observer: None,
            metrics: Arc::new(PipelineMetrics::new()),
        }
    }

    /// Attach an observer for pipeline events (metrics/logging).
    pub fn with_observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn mapping(&self) -> &FieldMapping {
        &self.mapping
    }

    /// Get a handle to run metrics.
    pub fn metrics(&self) -> Arc<PipelineMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Filter, sort, aggregate and summarize `dataset` under `spec`.
    pub fn run(&self, dataset: &DataSet, spec: &PipelineSpec) -> PipelineOutput {
        let start = Instant::now();
        self.metrics.begin_run();
        self.emit(PipelineEvent::RunStarted {
            input_rows: dataset.row_count(),
        });

        let fields = self.mapping.resolve(&dataset.schema);
        let compiled = CompiledFilter::new(&spec.filter, fields);
        let passing: Vec<usize> = dataset
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| compiled.matches(row))
            .map(|(i, _)| i)
            .collect();
        let filtered = dataset.select(&passing);
        self.metrics
            .on_filtered(dataset.row_count(), filtered.row_count());
        self.emit(PipelineEvent::FilterFinished {
            input_rows: dataset.row_count(),
            output_rows: filtered.row_count(),
        });

        let comparator = SortComparator::new(&filtered.schema, &spec.sort);
        let sorted = filtered.select(&comparator.sorted_indices(&filtered));
        self.emit(PipelineEvent::SortFinished {
            key: spec.sort.key.clone(),
            direction: spec.sort.direction,
        });

        let aggregates = if filtered.is_empty() {
            Vec::new()
        } else {
            spec.group_by
                .iter()
                .map(|field| {
                    let view = aggregate_view(&filtered, field);
                    self.metrics.on_groups(view.groups.len());
                    self.emit(PipelineEvent::AggregateFinished {
                        field: view.field.clone(),
                        groups: view.groups.len(),
                    });
                    view
                })
                .collect()
        };

        let summary = summarize(&filtered, &spec.summary_fields);

        self.metrics.end_run(start.elapsed());
        self.emit(PipelineEvent::RunFinished {
            elapsed: start.elapsed(),
            metrics: self.metrics.snapshot(),
        });

        PipelineOutput {
            filtered,
            sorted,
            aggregates,
            summary,
        }
    }

    fn emit(&self, event: PipelineEvent) {
        if let Some(obs) = &self.observer {
            obs.on_event(&event);
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(FieldMapping::default())
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("mapping", &self.mapping)
            .field("observer_set", &self.observer.is_some())
            .field("metrics", &self.metrics.snapshot())
            .finish()
    }
}

/// Run `spec` against `dataset` with the default [`FieldMapping`] and no observer.
pub fn run(dataset: &DataSet, spec: &PipelineSpec) -> PipelineOutput {
    Pipeline::default().run(dataset, spec)
}
