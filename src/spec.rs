//! Filter, sort and grouping configuration for one pipeline run.
//!
//! Specifications are plain values: the UI (or any other caller) builds or mutates them and hands
//! an immutable snapshot to [`crate::pipeline`]. They serialize to camelCase JSON so saved views and
//! query-string state can be round-tripped by the embedding application.
//!
//! ```rust
//! use deal_pipeline::spec::{FlagFilter, PipelineSpec};
//!
//! let spec = PipelineSpec::from_json_str(
//!     r#"{
//!         "filter": {
//!             "revenueRange": [2000000, 5000000],
//!             "includeSmartshareEnabled": true,
//!             "marketDateRange": ["2024-01-01", null]
//!         },
//!         "sort": { "key": "Revenue", "direction": "desc" }
//!     }"#,
//! )
//! .unwrap();
//! assert_eq!(spec.filter.include_smartshare_enabled, FlagFilter::RequireTrue);
//! assert_eq!(spec.group_by.len(), 4);
//! ```

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::SpecResult;
use crate::fields::FieldMapping;

/// Tri-state flag filter: require the flag set, require it unset, or ignore it.
///
/// Serialized as `true` / `false` / `null`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum FlagFilter {
    #[default]
    Any,
    RequireTrue,
    RequireFalse,
}

impl FlagFilter {
    /// Whether a record whose flag is `flag` satisfies this filter on its own.
    pub fn accepts(self, flag: bool) -> bool {
        match self {
            FlagFilter::Any => true,
            FlagFilter::RequireTrue => flag,
            FlagFilter::RequireFalse => !flag,
        }
    }
}

impl From<Option<bool>> for FlagFilter {
    fn from(v: Option<bool>) -> Self {
        match v {
            None => FlagFilter::Any,
            Some(true) => FlagFilter::RequireTrue,
            Some(false) => FlagFilter::RequireFalse,
        }
    }
}

impl From<FlagFilter> for Option<bool> {
    fn from(v: FlagFilter) -> Self {
        match v {
            FlagFilter::Any => None,
            FlagFilter::RequireTrue => Some(true),
            FlagFilter::RequireFalse => Some(false),
        }
    }
}

/// Inclusive numeric bounds, serialized as `[min, max]`.
///
/// `min > max` is accepted as given and simply matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct NumericRange {
    pub min: f64,
    pub max: f64,
}

impl NumericRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, v: f64) -> bool {
        v >= self.min && v <= self.max
    }
}

impl From<(f64, f64)> for NumericRange {
    fn from((min, max): (f64, f64)) -> Self {
        Self { min, max }
    }
}

impl From<NumericRange> for (f64, f64) {
    fn from(r: NumericRange) -> Self {
        (r.min, r.max)
    }
}

/// Inclusive calendar-date bounds, serialized as `["YYYY-MM-DD" | null, "YYYY-MM-DD" | null]`.
///
/// A `None` side is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "(Option<NaiveDate>, Option<NaiveDate>)",
    into = "(Option<NaiveDate>, Option<NaiveDate>)"
)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// Both sides closed.
    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self::new(Some(start), Some(end))
    }

    pub fn contains(&self, d: NaiveDate) -> bool {
        self.start.is_none_or(|s| d >= s) && self.end.is_none_or(|e| d <= e)
    }
}

impl From<(Option<NaiveDate>, Option<NaiveDate>)> for DateRange {
    fn from((start, end): (Option<NaiveDate>, Option<NaiveDate>)) -> Self {
        Self { start, end }
    }
}

impl From<DateRange> for (Option<NaiveDate>, Option<NaiveDate>) {
    fn from(r: DateRange) -> Self {
        (r.start, r.end)
    }
}

/// How range filters treat a record whose field is missing or not numeric.
///
/// The default, `TreatAsZero`, compares such records as `0`, so they drop out whenever the range
/// minimum is positive. Date ranges never exclude records with unparseable dates, regardless of
/// this setting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MissingNumericPolicy {
    #[default]
    TreatAsZero,
    Unrestricted,
}

/// Record-level predicates. Every predicate is ANDed, except that requiring both SmartShare and
/// inbound inquiry passes records with either flag set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterSpec {
    pub verticals: BTreeSet<String>,
    pub activities: BTreeSet<String>,
    pub regions: BTreeSet<String>,
    pub states: BTreeSet<String>,
    pub revenue_range: Option<NumericRange>,
    pub ebitda_range: Option<NumericRange>,
    pub pursuits_range: Option<NumericRange>,
    pub market_date_range: Option<DateRange>,
    /// `false` drops deals whose account owner is "broker" (any case, whole value, no trimming).
    pub include_brokers: bool,
    pub include_smartshare_enabled: FlagFilter,
    pub include_inbound_inquiry_enabled: FlagFilter,
    /// Case-insensitive equality against the deal intent status.
    pub deal_intent_statuses: BTreeSet<String>,
    /// Case-insensitive substring match against the deal intent.
    pub deal_intent_types: BTreeSet<String>,
    pub missing_numeric: MissingNumericPolicy,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            verticals: BTreeSet::new(),
            activities: BTreeSet::new(),
            regions: BTreeSet::new(),
            states: BTreeSet::new(),
            revenue_range: None,
            ebitda_range: None,
            pursuits_range: None,
            market_date_range: None,
            include_brokers: true,
            include_smartshare_enabled: FlagFilter::Any,
            include_inbound_inquiry_enabled: FlagFilter::Any,
            deal_intent_statuses: BTreeSet::new(),
            deal_intent_types: BTreeSet::new(),
            missing_numeric: MissingNumericPolicy::TreatAsZero,
        }
    }
}

impl FilterSpec {
    /// `true` if this spec lets every record through.
    pub fn is_unrestricted(&self) -> bool {
        *self == FilterSpec {
            missing_numeric: self.missing_numeric,
            ..FilterSpec::default()
        }
    }
}

/// Sort direction; ascending is the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    #[serde(alias = "ascending")]
    Asc,
    #[serde(alias = "descending")]
    Desc,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Column to order by. No key means the filtered order is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SortSpec {
    pub key: Option<String>,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn ascending(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            direction: SortDirection::Asc,
        }
    }

    pub fn descending(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            direction: SortDirection::Desc,
        }
    }

    /// Header-click behavior: the current key flips direction, a new key starts ascending.
    pub fn toggled(&self, key: &str) -> Self {
        if self.key.as_deref() == Some(key) {
            Self {
                key: self.key.clone(),
                direction: self.direction.reversed(),
            }
        } else {
            Self::ascending(key)
        }
    }
}

/// Everything that drives one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PipelineSpec {
    pub filter: FilterSpec,
    pub sort: SortSpec,
    /// Columns to build aggregate views for, in output order.
    pub group_by: Vec<String>,
    /// Numeric columns to total and average.
    pub summary_fields: Vec<String>,
}

impl Default for PipelineSpec {
    fn default() -> Self {
        Self::for_mapping(&FieldMapping::default())
    }
}

impl PipelineSpec {
    /// Unrestricted spec whose chart and summary columns follow `mapping`.
    pub fn for_mapping(mapping: &FieldMapping) -> Self {
        Self {
            filter: FilterSpec::default(),
            sort: SortSpec::default(),
            group_by: mapping.default_group_by(),
            summary_fields: mapping.default_summary_fields(),
        }
    }

    /// Parse a spec from JSON. Omitted keys take their defaults.
    pub fn from_json_str(input: &str) -> SpecResult<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Read and parse a JSON spec file.
    pub fn from_path(path: impl AsRef<Path>) -> SpecResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json_string(&self) -> SpecResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
