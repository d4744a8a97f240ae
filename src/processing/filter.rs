//! Row filtering for [`crate::types::DataSet`].
//!
//! [`filter`] is the generic predicate filter. [`CompiledFilter`] evaluates a
//! [`FilterSpec`] against deal records; build it once per run so case-folded match sets and
//! column indices are computed up front rather than per row.

use crate::fields::{FieldMapping, FieldRole, ResolvedFields};
use crate::record::Row;
use crate::spec::{FilterSpec, FlagFilter, MissingNumericPolicy, NumericRange};
use crate::types::{DataSet, Value};

/// Returns a new [`DataSet`] containing only rows for which `predicate` returns `true`.
///
/// This is a convenience wrapper around [`DataSet::filter_rows`].
pub fn filter<F>(dataset: &DataSet, predicate: F) -> DataSet
where
    F: FnMut(&[Value]) -> bool,
{
    dataset.filter_rows(predicate)
}

/// Returns the rows of `dataset` that satisfy `spec`, in their original order.
pub fn filter_deals(dataset: &DataSet, mapping: &FieldMapping, spec: &FilterSpec) -> DataSet {
    let compiled = CompiledFilter::new(spec, mapping.resolve(&dataset.schema));
    filter(dataset, |row| compiled.matches(row))
}

/// Evaluate `spec` against a single row. Prefer [`CompiledFilter`] when testing many rows.
pub fn matches(row: &[Value], fields: &ResolvedFields, spec: &FilterSpec) -> bool {
    CompiledFilter::new(spec, *fields).matches(row)
}

/// A [`FilterSpec`] bound to one dataset's column layout.
#[derive(Debug, Clone)]
pub struct CompiledFilter<'s> {
    spec: &'s FilterSpec,
    fields: ResolvedFields,
    statuses: Vec<String>,
    intent_types: Vec<String>,
}

impl<'s> CompiledFilter<'s> {
    pub fn new(spec: &'s FilterSpec, fields: ResolvedFields) -> Self {
        Self {
            spec,
            fields,
            statuses: spec
                .deal_intent_statuses
                .iter()
                .map(|s| s.to_lowercase())
                .collect(),
            intent_types: spec
                .deal_intent_types
                .iter()
                .map(|s| s.to_lowercase())
                .collect(),
        }
    }

    /// `true` if the row passes every predicate. Never fails: malformed cells degrade per
    /// [`crate::record`].
    pub fn matches(&self, values: &[Value]) -> bool {
        let row = Row::new(values, &self.fields);
        let spec = self.spec;

        self.categorical_ok(&row)
            && self.range_ok(&row, FieldRole::Revenue, spec.revenue_range)
            && self.range_ok(&row, FieldRole::Ebitda, spec.ebitda_range)
            && self.range_ok(&row, FieldRole::TotalPursuits, spec.pursuits_range)
            && self.date_ok(&row)
            && self.broker_ok(&row)
            && self.flags_ok(&row)
            && self.intent_ok(&row)
    }

    fn categorical_ok(&self, row: &Row<'_>) -> bool {
        let spec = self.spec;
        [
            (FieldRole::Vertical, &spec.verticals),
            (FieldRole::Activity, &spec.activities),
            (FieldRole::Region, &spec.regions),
            (FieldRole::State, &spec.states),
        ]
        .into_iter()
        .all(|(role, allowed)| allowed.is_empty() || allowed.contains(&*row.text_field(role)))
    }

    fn range_ok(&self, row: &Row<'_>, role: FieldRole, range: Option<NumericRange>) -> bool {
        let Some(range) = range else {
            return true;
        };
        match (row.numeric_field(role), self.spec.missing_numeric) {
            (Some(v), _) => range.contains(v),
            (None, MissingNumericPolicy::TreatAsZero) => range.contains(0.0),
            (None, MissingNumericPolicy::Unrestricted) => true,
        }
    }

    // Unparseable dates never exclude a record.
    fn date_ok(&self, row: &Row<'_>) -> bool {
        match (self.spec.market_date_range, row.date_field(FieldRole::MarketDate)) {
            (Some(range), Some(d)) => range.contains(d),
            _ => true,
        }
    }

    fn broker_ok(&self, row: &Row<'_>) -> bool {
        self.spec.include_brokers
            || !row
                .text_field(FieldRole::AccountOwner)
                .eq_ignore_ascii_case("broker")
    }

    fn flags_ok(&self, row: &Row<'_>) -> bool {
        let smartshare = row.boolean_field(FieldRole::SmartShareEnabled);
        let inbound = row.boolean_field(FieldRole::InboundInquiryEnabled);
        match (
            self.spec.include_smartshare_enabled,
            self.spec.include_inbound_inquiry_enabled,
        ) {
            (FlagFilter::RequireTrue, FlagFilter::RequireTrue) => smartshare || inbound,
            (ss, ib) => ss.accepts(smartshare) && ib.accepts(inbound),
        }
    }

    fn intent_ok(&self, row: &Row<'_>) -> bool {
        if !self.statuses.is_empty() {
            let status = row.text_field(FieldRole::DealIntentStatus).to_lowercase();
            if !self.statuses.iter().any(|s| *s == status) {
                return false;
            }
        }
        if !self.intent_types.is_empty() {
            let intent = row.text_field(FieldRole::DealIntent).to_lowercase();
            if !self.intent_types.iter().any(|t| intent.contains(t.as_str())) {
                return false;
            }
        }
        true
    }
}
