//! Dataset lifecycle and "current configuration" state for an interactive consumer.
//!
//! A [`DealSession`] owns:
//!
//! - the current immutable dataset snapshot, replaced wholesale on every load
//! - the canonical column set, fixed by the first load that produced any columns
//! - the current [`PipelineSpec`], mutated incrementally by user actions
//!
//! Derived views are never patched. [`DealSession::output`] re-runs the pipeline whenever the
//! dataset version or the current spec differ from the previous call, and otherwise hands back
//! the same output.

use std::fmt;
use std::sync::Arc;

use crate::fields::FieldMapping;
use crate::pipeline::{Pipeline, PipelineOutput};
use crate::processing::{filter_choices, FilterChoices};
use crate::spec::{FilterSpec, PipelineSpec, SortSpec};
use crate::types::{DataSet, Schema};

struct CachedOutput {
    version: u64,
    spec: PipelineSpec,
    output: Arc<PipelineOutput>,
}

/// Current dataset snapshot plus current spec.
pub struct DealSession {
    pipeline: Pipeline,
    dataset: Arc<DataSet>,
    canonical: Option<Schema>,
    version: u64,
    spec: PipelineSpec,
    cache: Option<CachedOutput>,
}

impl DealSession {
    /// An empty session whose default spec follows the pipeline's field mapping.
    pub fn new(pipeline: Pipeline) -> Self {
        let spec = PipelineSpec::for_mapping(pipeline.mapping());
        Self {
            pipeline,
            dataset: Arc::new(DataSet::default()),
            canonical: None,
            version: 0,
            spec,
            cache: None,
        }
    }

    pub fn with_mapping(mapping: FieldMapping) -> Self {
        Self::new(Pipeline::new(mapping))
    }

    /// Swap in a new snapshot and return the new dataset version.
    ///
    /// The first snapshot with a non-empty column set fixes the canonical schema; every later
    /// snapshot is projected onto it.
    pub fn replace_dataset(&mut self, dataset: DataSet) -> u64 {
        let dataset = match &self.canonical {
            Some(canonical) if *canonical != dataset.schema => {
                tracing::debug!(
                    incoming = dataset.schema.len(),
                    canonical = canonical.len(),
                    "projecting dataset onto canonical columns"
                );
                dataset.project_onto(canonical)
            }
            _ => dataset,
        };
        if self.canonical.is_none() && !dataset.schema.is_empty() {
            self.canonical = Some(dataset.schema.clone());
        }

        self.dataset = Arc::new(dataset);
        self.version += 1;
        tracing::info!(
            version = self.version,
            rows = self.dataset.row_count(),
            "dataset replaced"
        );
        self.version
    }

    pub fn dataset(&self) -> Arc<DataSet> {
        Arc::clone(&self.dataset)
    }

    /// Incremented on every [`Self::replace_dataset`]; `0` before the first load.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn canonical_schema(&self) -> Option<&Schema> {
        self.canonical.as_ref()
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn spec(&self) -> &PipelineSpec {
        &self.spec
    }

    pub fn spec_mut(&mut self) -> &mut PipelineSpec {
        &mut self.spec
    }

    pub fn set_spec(&mut self, spec: PipelineSpec) {
        self.spec = spec;
    }

    pub fn set_filter(&mut self, filter: FilterSpec) {
        self.spec.filter = filter;
    }

    pub fn set_sort(&mut self, sort: SortSpec) {
        self.spec.sort = sort;
    }

    /// Header-click sort: the current key flips direction, any other key starts ascending.
    pub fn toggle_sort(&mut self, key: &str) -> &SortSpec {
        self.spec.sort = self.spec.sort.toggled(key);
        &self.spec.sort
    }

    pub fn clear_sort(&mut self) {
        self.spec.sort = SortSpec::default();
    }

    /// Drop every filter restriction. Sort, grouping and summary columns are kept.
    pub fn reset_filters(&mut self) {
        self.spec.filter = FilterSpec::default();
    }

    /// Pipeline output for the current (dataset, spec) pair.
    pub fn output(&mut self) -> Arc<PipelineOutput> {
        if let Some(cached) = &self.cache {
            if cached.version == self.version && cached.spec == self.spec {
                return Arc::clone(&cached.output);
            }
        }

        let output = Arc::new(self.pipeline.run(&self.dataset, &self.spec));
        self.cache = Some(CachedOutput {
            version: self.version,
            spec: self.spec.clone(),
            output: Arc::clone(&output),
        });
        output
    }

    /// Distinct categorical values and numeric/date bounds over the whole current dataset.
    pub fn filter_choices(&self) -> FilterChoices {
        filter_choices(&self.dataset, self.pipeline.mapping())
    }
}

impl Default for DealSession {
    fn default() -> Self {
        Self::new(Pipeline::default())
    }
}

impl fmt::Debug for DealSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DealSession")
            .field("pipeline", &self.pipeline)
            .field("version", &self.version)
            .field("rows", &self.dataset.row_count())
            .field("canonical", &self.canonical)
            .field("spec", &self.spec)
            .field("cached", &self.cache.is_some())
            .finish()
    }
}
