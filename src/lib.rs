//! `deal-pipeline` filters, sorts and aggregates an in-memory table of business-listing records
//! ("deals") for an interactive dashboard.
//!
//! Records come from a CSV (or JSON) feed whose columns are not known at compile time. Each cell is
//! a dynamically typed [`types::Value`]; a known subset of columns (revenue, region, market date,
//! flags, ...) is located through a [`fields::FieldMapping`] and coerced defensively by
//! [`record`]. A [`spec::PipelineSpec`] describes the filters, sort key and grouping columns, and
//! [`pipeline::Pipeline::run`] turns one (dataset, spec) pair into filtered, sorted, grouped and
//! summarized views.
//!
//! ## Quick example: ingest and run
//!
//! ```no_run
//! use deal_pipeline::ingestion::{ingest_from_path, IngestionOptions};
//! use deal_pipeline::spec::{NumericRange, PipelineSpec, SortSpec};
//!
//! # fn main() -> Result<(), deal_pipeline::IngestionError> {
//! // Auto-detects by extension (.csv/.json/.ndjson).
//! let ds = ingest_from_path("deals.csv", &IngestionOptions::default())?;
//!
//! let mut spec = PipelineSpec::default();
//! spec.filter.revenue_range = Some(NumericRange::new(2_000_000.0, 5_000_000.0));
//! spec.sort = SortSpec::descending("Revenue");
//!
//! let out = deal_pipeline::pipeline::run(&ds, &spec);
//! println!("{} of {} deals match", out.filtered.row_count(), ds.row_count());
//! # Ok(())
//! # }
//! ```
//!
//! ## Field coercion
//!
//! Source data is messy and never rejected:
//!
//! - numbers may arrive as `"$1,250,000"`; everything but digits, `.` and `-` is stripped
//! - flags are set only by `1`, `"1"`, `true` or case-insensitive `"true"`
//! - market dates are `M/D/YYYY`; anything else is "no date" and never excluded by a date range
//!
//! ## Modules
//!
//! - [`ingestion`]: CSV / JSON / NDJSON into a [`types::DataSet`], with observers
//! - [`types`]: schema, dataset and value types
//! - [`fields`] and [`record`]: well-known columns and their coercions
//! - [`spec`]: filter/sort/grouping configuration (serde)
//! - [`processing`]: filter, sort and aggregate primitives
//! - [`pipeline`]: one-shot orchestration with metrics and observer hooks
//! - [`session`]: dataset snapshots, current spec and memoized output
//! - [`error`]: error types used at the ingestion and configuration boundary

pub mod error;
pub mod fields;
pub mod ingestion;
pub mod pipeline;
pub mod processing;
pub mod record;
pub mod session;
pub mod spec;
pub mod types;

pub use error::{IngestionError, IngestionResult, SpecError, SpecResult};
