//! In-memory record transformations.
//!
//! The processing layer operates on [`crate::types::DataSet`] values produced by ingestion. Every
//! function here is pure: inputs are borrowed, outputs are freshly allocated.
//!
//! - [`filter_deals()`] / [`CompiledFilter`]: deal filtering by [`crate::spec::FilterSpec`]
//! - [`sort()`] / [`SortComparator`]: stable, type-directed ordering by [`crate::spec::SortSpec`]
//! - [`group_by()`] / [`summarize()`]: grouped counts and numeric summaries
//!
//! ## Example: filter → sort → group
//!
//! ```rust
//! use deal_pipeline::fields::FieldMapping;
//! use deal_pipeline::processing::{filter_deals, group_by, sort};
//! use deal_pipeline::spec::{FilterSpec, NumericRange, SortSpec};
//! use deal_pipeline::types::{DataSet, Schema, Value};
//!
//! let ds = DataSet::new(
//!     Schema::new(["Primary Supply Vertical", "Revenue"]),
//!     vec![
//!         vec![Value::text("Retail"), Value::text("$1,000,000")],
//!         vec![Value::text("Industrial"), Value::Number(3_000_000.0)],
//!         vec![Value::text("Retail"), Value::Number(4_500_000.0)],
//!     ],
//! );
//!
//! let spec = FilterSpec {
//!     revenue_range: Some(NumericRange::new(2_000_000.0, 5_000_000.0)),
//!     ..FilterSpec::default()
//! };
//! let filtered = filter_deals(&ds, &FieldMapping::default(), &spec);
//! assert_eq!(filtered.row_count(), 2);
//!
//! let sorted = sort(&filtered, &SortSpec::descending("Revenue"));
//! assert_eq!(sorted.rows[0][1], Value::Number(4_500_000.0));
//!
//! let groups = group_by(&filtered, "Primary Supply Vertical");
//! assert_eq!(groups[0].percentage, 50.0);
//! ```

pub mod aggregate;
pub mod filter;
pub mod sort;

pub use aggregate::{
    aggregate_view, date_bounds, distinct_values, filter_choices, group_by, numeric_bounds, summarize,
    AggregateView, FieldSummary, FilterChoices, GroupCount, Summary,
};
pub use filter::{filter, filter_deals, matches, CompiledFilter};
pub use sort::{compare, sort, SortComparator, SortKey};
