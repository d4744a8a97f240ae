//! Grouped counts, numeric summaries and filter-choice helpers.

use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;
use serde::Serialize;

use crate::fields::{FieldMapping, FieldRole};
use crate::record;
use crate::types::DataSet;

/// One group of an aggregate view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupCount {
    pub label: String,
    pub count: usize,
    /// `count / input rows * 100`.
    pub percentage: f64,
}

/// Grouped counts for one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateView {
    pub field: String,
    pub groups: Vec<GroupCount>,
}

/// Count rows per distinct non-empty value of `field`.
///
/// Groups are ordered by descending count; equal counts keep first-seen order. The percentage
/// denominator is every input row, including rows where `field` is empty, so percentages sum to
/// 100 only when no row is skipped. An empty dataset (or unknown column) yields no groups.
pub fn group_by(dataset: &DataSet, field: &str) -> Vec<GroupCount> {
    let total = dataset.row_count();
    if total == 0 {
        return Vec::new();
    }

    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, usize)> = Vec::new();
    for value in dataset.column(field) {
        if value.is_empty() {
            continue;
        }
        let label = value.as_text();
        match slots.get(&*label) {
            Some(&slot) => groups[slot].1 += 1,
            None => {
                slots.insert(label.to_string(), groups.len());
                groups.push((label.into_owned(), 1));
            }
        }
    }

    groups.sort_by(|a, b| b.1.cmp(&a.1));
    groups
        .into_iter()
        .map(|(label, count)| GroupCount {
            label,
            count,
            percentage: count as f64 / total as f64 * 100.0,
        })
        .collect()
}

/// Build an [`AggregateView`] for `field`.
pub fn aggregate_view(dataset: &DataSet, field: &str) -> AggregateView {
    AggregateView {
        field: field.to_string(),
        groups: group_by(dataset, field),
    }
}

/// Total and mean of one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSummary {
    pub field: String,
    pub sum: f64,
    pub average: f64,
}

/// Headline figures for a non-empty record set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub record_count: usize,
    pub fields: Vec<FieldSummary>,
}

impl Summary {
    pub fn field(&self, name: &str) -> Option<&FieldSummary> {
        self.fields.iter().find(|f| f.field == name)
    }
}

/// Sum and average each of `fields`, treating missing or non-numeric cells as `0`.
///
/// Returns `None` for an empty dataset, so "no data" is distinguishable from data summing to zero.
pub fn summarize<S: AsRef<str>>(dataset: &DataSet, fields: &[S]) -> Option<Summary> {
    if dataset.is_empty() {
        return None;
    }
    let indices: Vec<Option<usize>> = fields
        .iter()
        .map(|f| dataset.schema.index_of(f.as_ref()))
        .collect();

    let sums = dataset.reduce_rows(vec![0.0_f64; fields.len()], |mut acc, row| {
        for (sum, idx) in acc.iter_mut().zip(&indices) {
            *sum += idx
                .and_then(|i| row.get(i))
                .and_then(record::numeric)
                .unwrap_or(0.0);
        }
        acc
    });

    let n = dataset.row_count() as f64;
    Some(Summary {
        record_count: dataset.row_count(),
        fields: fields
            .iter()
            .zip(sums)
            .map(|(field, sum)| FieldSummary {
                field: field.as_ref().to_string(),
                sum,
                average: sum / n,
            })
            .collect(),
    })
}

/// Sorted distinct non-empty values of `column`.
pub fn distinct_values(dataset: &DataSet, column: &str) -> Vec<String> {
    dataset
        .column(column)
        .filter(|v| !v.is_empty())
        .map(|v| v.as_text().into_owned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// `(min, max)` over numeric-coercible values of `column`, or `None` if there are none.
pub fn numeric_bounds(dataset: &DataSet, column: &str) -> Option<(f64, f64)> {
    dataset
        .column(column)
        .filter_map(record::numeric)
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// `(earliest, latest)` over parseable `M/D/YYYY` values of `column`.
pub fn date_bounds(dataset: &DataSet, column: &str) -> Option<(NaiveDate, NaiveDate)> {
    dataset
        .column(column)
        .filter_map(record::date)
        .fold(None, |acc, d| match acc {
            None => Some((d, d)),
            Some((lo, hi)) => Some((lo.min(d), hi.max(d))),
        })
}

/// Values available to each configurable filter, computed over a whole dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterChoices {
    pub verticals: Vec<String>,
    pub activities: Vec<String>,
    pub regions: Vec<String>,
    pub states: Vec<String>,
    pub deal_intent_statuses: Vec<String>,
    pub deal_intents: Vec<String>,
    pub revenue: Option<(f64, f64)>,
    pub ebitda: Option<(f64, f64)>,
    pub pursuits: Option<(f64, f64)>,
    pub market_dates: Option<(NaiveDate, NaiveDate)>,
}

/// Collect [`FilterChoices`] for `dataset` using the column names in `mapping`.
pub fn filter_choices(dataset: &DataSet, mapping: &FieldMapping) -> FilterChoices {
    let distinct = |role| {
        mapping
            .column(role)
            .map(|c| distinct_values(dataset, c))
            .unwrap_or_default()
    };
    let bounds = |role| mapping.column(role).and_then(|c| numeric_bounds(dataset, c));

    FilterChoices {
        verticals: distinct(FieldRole::Vertical),
        activities: distinct(FieldRole::Activity),
        regions: distinct(FieldRole::Region),
        states: distinct(FieldRole::State),
        deal_intent_statuses: distinct(FieldRole::DealIntentStatus),
        deal_intents: distinct(FieldRole::DealIntent),
        revenue: bounds(FieldRole::Revenue),
        ebitda: bounds(FieldRole::Ebitda),
        pursuits: bounds(FieldRole::TotalPursuits),
        market_dates: date_bounds(dataset, &mapping.market_date),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Schema, Value};

    fn deals() -> DataSet {
        DataSet::new(
            Schema::new(["Primary Supply Vertical", "Revenue", "EBITDA"]),
            vec![
                vec![Value::text("Retail"), Value::Number(100.0), Value::text("$10")],
                vec![Value::text("Industrial"), Value::text("$300"), Value::Null],
                vec![Value::text("Retail"), Value::Number(200.0), Value::Number(30.0)],
                vec![Value::Null, Value::text("n/a")],
            ],
        )
    }

    #[test]
    fn group_by_counts_skips_empty_and_orders_by_count() {
        let groups = group_by(&deals(), "Primary Supply Vertical");
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].label, "Retail");
        assert_eq!(groups[0].count, 2);
        assert_eq!(groups[0].percentage, 50.0);
        assert_eq!(groups[1].label, "Industrial");
        assert_eq!(groups[1].percentage, 25.0);
    }

    #[test]
    fn group_by_ties_keep_first_seen_order() {
        let ds = DataSet::new(
            Schema::new(["Region"]),
            vec![
                vec![Value::text("West")],
                vec![Value::text("East")],
                vec![Value::text("East")],
                vec![Value::text("West")],
                vec![Value::text("North")],
            ],
        );
        let labels: Vec<String> = group_by(&ds, "Region").into_iter().map(|g| g.label).collect();
        assert_eq!(labels, vec!["West", "East", "North"]);
    }

    #[test]
    fn group_by_empty_input_is_empty() {
        let ds = DataSet::empty(Schema::new(["Region"]));
        assert!(group_by(&ds, "Region").is_empty());
        assert!(group_by(&deals(), "Unknown").is_empty());
    }

    #[test]
    fn group_by_labels_numbers_and_bools_as_text() {
        let ds = DataSet::new(
            Schema::new(["Total Pursuits"]),
            vec![vec![Value::Number(3.0)], vec![Value::text("3")], vec![Value::Bool(true)]],
        );
        let groups = group_by(&ds, "Total Pursuits");
        assert_eq!(groups[0].label, "3");
        assert_eq!(groups[0].count, 2);
        assert_eq!(groups[1].label, "true");
    }

    #[test]
    fn summarize_treats_missing_as_zero() {
        let summary = summarize(&deals(), &["Revenue", "EBITDA", "Unknown"]).unwrap();
        assert_eq!(summary.record_count, 4);

        let revenue = summary.field("Revenue").unwrap();
        assert_eq!(revenue.sum, 600.0);
        assert_eq!(revenue.average, 150.0);

        let ebitda = summary.field("EBITDA").unwrap();
        assert_eq!(ebitda.sum, 40.0);
        assert_eq!(ebitda.average, 10.0);

        assert_eq!(summary.field("Unknown").unwrap().sum, 0.0);
    }

    #[test]
    fn summarize_empty_is_none() {
        let ds = DataSet::empty(Schema::new(["Revenue"]));
        assert_eq!(summarize(&ds, &["Revenue"]), None);
    }

    #[test]
    fn distinct_and_bounds() {
        let ds = deals();
        assert_eq!(
            distinct_values(&ds, "Primary Supply Vertical"),
            vec!["Industrial", "Retail"]
        );
        assert_eq!(numeric_bounds(&ds, "Revenue"), Some((100.0, 300.0)));
        assert_eq!(numeric_bounds(&ds, "Unknown"), None);
    }

    #[test]
    fn filter_choices_follow_mapping() {
        let ds = DataSet::new(
            Schema::new(["Region", "Market Date", "Revenue"]),
            vec![
                vec![Value::text("West"), Value::text("3/1/2024"), Value::Number(5.0)],
                vec![Value::text("East"), Value::text("bad"), Value::Number(1.0)],
                vec![Value::text("West"), Value::text("1/2/2023")],
            ],
        );
        let choices = filter_choices(&ds, &FieldMapping::default());
        assert_eq!(choices.regions, vec!["East", "West"]);
        assert!(choices.verticals.is_empty());
        assert_eq!(choices.revenue, Some((1.0, 5.0)));
        assert_eq!(
            choices.market_dates,
            Some((
                NaiveDate::from_ymd_opt(2023, 1, 2).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
            ))
        );
    }
}
