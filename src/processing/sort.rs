//! Type-directed ordering of records.
//!
//! Each cell of the sort column is classified once into a [`SortKey`]:
//!
//! - in columns whose name contains "date" (any case), `M/D/YYYY` text becomes a calendar date;
//! - otherwise, anything [`crate::record::numeric`] accepts becomes a number;
//! - everything else is compared raw.
//!
//! Keys of the same kind compare naturally. Keys of different kinds order dates before numbers
//! before raw values, and raw values order `Null < Bool < Number < Text`. The result is a total
//! order, so the stable sort below is well defined for any mix of cell encodings.

use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::record;
use crate::spec::{SortDirection, SortSpec};
use crate::types::{DataSet, Schema, Value};

static NULL: Value = Value::Null;

/// Comparable form of one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortKey<'a> {
    Date(NaiveDate),
    Number(f64),
    Raw(&'a Value),
}

impl<'a> SortKey<'a> {
    /// Classify `value`. `date_column` enables the date interpretation.
    pub fn classify(value: &'a Value, date_column: bool) -> Self {
        if date_column {
            if let Some(d) = record::date(value) {
                return SortKey::Date(d);
            }
        }
        match record::numeric(value) {
            Some(n) => SortKey::Number(n),
            None => SortKey::Raw(value),
        }
    }

    fn tier(&self) -> u8 {
        match self {
            SortKey::Date(_) => 0,
            SortKey::Number(_) => 1,
            SortKey::Raw(_) => 2,
        }
    }

    /// Ascending comparison.
    pub fn cmp_key(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Date(a), SortKey::Date(b)) => a.cmp(b),
            (SortKey::Number(a), SortKey::Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (SortKey::Raw(a), SortKey::Raw(b)) => compare_raw(a, b),
            _ => self.tier().cmp(&other.tier()),
        }
    }
}

fn raw_rank(v: &Value) -> u8 {
    match v {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::Text(_) => 3,
    }
}

fn compare_raw(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        // Only non-finite numbers reach the raw tier.
        (Value::Number(x), Value::Number(y)) => x.total_cmp(y),
        (Value::Text(x), Value::Text(y)) => x.cmp(y),
        _ => raw_rank(a).cmp(&raw_rank(b)),
    }
}

/// A [`SortSpec`] bound to one schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortComparator {
    column: Option<usize>,
    date_column: bool,
    direction: SortDirection,
    keyed: bool,
}

impl SortComparator {
    pub fn new(schema: &Schema, spec: &SortSpec) -> Self {
        let (column, date_column) = match spec.key.as_deref() {
            Some(key) => (
                schema.index_of(key),
                key.to_lowercase().contains("date"),
            ),
            None => (None, false),
        };
        Self {
            column,
            date_column,
            direction: spec.direction,
            keyed: spec.key.is_some(),
        }
    }

    /// `false` when no sort key is set and sorting is the identity.
    pub fn is_keyed(&self) -> bool {
        self.keyed
    }

    fn key<'a>(&self, row: &'a [Value]) -> SortKey<'a> {
        let value = self.column.and_then(|i| row.get(i)).unwrap_or(&NULL);
        SortKey::classify(value, self.date_column)
    }

    fn directed(&self, ord: Ordering) -> Ordering {
        match self.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    }

    /// Compare two rows. Always `Equal` without a key; ties are `Equal` in either direction.
    pub fn compare(&self, a: &[Value], b: &[Value]) -> Ordering {
        if !self.keyed {
            return Ordering::Equal;
        }
        self.directed(self.key(a).cmp_key(&self.key(b)))
    }

    /// Row positions of `dataset` in sorted order. Ties keep their original relative order.
    pub fn sorted_indices(&self, dataset: &DataSet) -> Vec<usize> {
        let mut order: Vec<usize> = (0..dataset.row_count()).collect();
        if !self.keyed {
            return order;
        }
        let keys: Vec<SortKey<'_>> = dataset.rows.iter().map(|r| self.key(r)).collect();
        order.sort_by(|&i, &j| self.directed(keys[i].cmp_key(&keys[j])));
        order
    }
}

/// Compare two rows of `schema` under `spec`.
pub fn compare(a: &[Value], b: &[Value], schema: &Schema, spec: &SortSpec) -> Ordering {
    SortComparator::new(schema, spec).compare(a, b)
}

/// Return a stably sorted copy of `dataset`.
pub fn sort(dataset: &DataSet, spec: &SortSpec) -> DataSet {
    let comparator = SortComparator::new(&dataset.schema, spec);
    dataset.select(&comparator.sorted_indices(dataset))
}
