//! Core data model types.
//!
//! Ingestion produces an in-memory [`DataSet`]: a header-derived [`Schema`] (ordered column names)
//! plus row-major storage of dynamically typed [`Value`]s. Column sets are not known at compile
//! time; well-known columns are located through [`crate::fields::FieldMapping`].

use std::borrow::Cow;
use std::fmt;

use serde::Serialize;

/// A single dynamically typed cell.
///
/// The same column may hold different variants on different rows (e.g. `Number(1.0)` on one row
/// and `Text("TRUE")` on the next); consumers go through [`crate::record`] coercions rather than
/// matching on variants directly.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Missing/empty value.
    Null,
    /// Numeric cell.
    Number(f64),
    /// Boolean cell.
    Bool(bool),
    /// Any other text.
    Text(String),
}

impl Value {
    /// Convenience constructor for text cells.
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// `true` for `Null` and for text that is empty after trimming.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Text(s) => s.trim().is_empty(),
            Value::Number(_) | Value::Bool(_) => false,
        }
    }

    /// Textual rendering used for categorical matching, grouping labels and lexical fallbacks.
    ///
    /// `Null` renders as the empty string; integral numbers render without a fractional part.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Value::Null => Cow::Borrowed(""),
            Value::Number(n) => Cow::Owned(n.to_string()),
            Value::Bool(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
            Value::Text(s) => Cow::Borrowed(s.as_str()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

/// Ordered column names, taken from the header row of the source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Schema {
    /// Column names in source order.
    pub columns: Vec<String>,
}

impl Schema {
    /// Create a new schema from column names.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// Iterate column names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(String::as_str)
    }

    /// Returns the index of a column by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// `true` if the schema has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// In-memory tabular dataset.
///
/// Rows are stored as `Vec<Vec<Value>>` in the same order as the [`Schema`] columns. A row may be
/// shorter than the schema (missing trailing cells); reads past its end behave like `Null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DataSet {
    /// Schema describing row shape.
    pub schema: Schema,
    /// Row-major value storage.
    pub rows: Vec<Vec<Value>>,
}

impl DataSet {
    /// Create a dataset from schema and rows.
    pub fn new(schema: Schema, rows: Vec<Vec<Value>>) -> Self {
        Self { schema, rows }
    }

    /// An empty dataset sharing `schema`.
    pub fn empty(schema: Schema) -> Self {
        Self {
            schema,
            rows: Vec::new(),
        }
    }

    /// Number of rows in the dataset.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// `true` if the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate the values of one column (`Null` for short rows). Empty if the column is unknown.
    pub fn column<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a Value> + 'a {
        static NULL: Value = Value::Null;
        let idx = self.schema.index_of(name);
        self.rows
            .iter()
            .filter(move |_| idx.is_some())
            .map(move |row| idx.and_then(|i| row.get(i)).unwrap_or(&NULL))
    }

    /// Create a new dataset containing only rows that match `predicate`.
    ///
    /// The returned dataset preserves the original schema and row order.
    pub fn filter_rows<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&[Value]) -> bool,
    {
        let rows = self
            .rows
            .iter()
            .filter(|row| predicate(row.as_slice()))
            .cloned()
            .collect();
        Self {
            schema: self.schema.clone(),
            rows,
        }
    }

    /// Create a new dataset holding the rows at `indices`, in that order.
    ///
    /// Out-of-range indices are skipped.
    pub fn select(&self, indices: &[usize]) -> Self {
        let rows = indices
            .iter()
            .filter_map(|&i| self.rows.get(i))
            .cloned()
            .collect();
        Self {
            schema: self.schema.clone(),
            rows,
        }
    }

    /// Re-shape every row onto `target`, matching columns by name.
    ///
    /// Columns of `target` absent from this dataset become `Null`; columns unknown to `target` are
    /// dropped.
    pub fn project_onto(&self, target: &Schema) -> Self {
        let mapping: Vec<Option<usize>> = target
            .field_names()
            .map(|name| self.schema.index_of(name))
            .collect();
        let rows = self
            .rows
            .iter()
            .map(|row| {
                mapping
                    .iter()
                    .map(|src| src.and_then(|i| row.get(i)).cloned().unwrap_or(Value::Null))
                    .collect()
            })
            .collect();
        Self {
            schema: target.clone(),
            rows,
        }
    }

    /// Reduce (fold) all rows into an accumulator value.
    ///
    /// This is similar to `Iterator::fold`, but provides each row as `&[Value]`.
    pub fn reduce_rows<A, F>(&self, init: A, mut reducer: F) -> A
    where
        F: FnMut(A, &[Value]) -> A,
    {
        self.rows
            .iter()
            .fold(init, |acc, row| reducer(acc, row.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::{DataSet, Schema, Value};

    fn sample_dataset() -> DataSet {
        DataSet::new(
            Schema::new(["id", "name", "revenue"]),
            vec![
                vec![Value::Number(1.0), Value::text("a"), Value::Number(10.0)],
                vec![Value::Number(2.0), Value::text("b")],
                vec![Value::Number(3.0), Value::text("c"), Value::text("$1,000")],
            ],
        )
    }

    #[test]
    fn schema_index_of_works() {
        let ds = sample_dataset();
        assert_eq!(ds.schema.index_of("id"), Some(0));
        assert_eq!(ds.schema.index_of("revenue"), Some(2));
        assert_eq!(ds.schema.index_of("missing"), None);
    }

    #[test]
    fn as_text_renders_integral_numbers_without_fraction() {
        assert_eq!(Value::Number(3.0).as_text(), "3");
        assert_eq!(Value::Number(2.5).as_text(), "2.5");
        assert_eq!(Value::Bool(true).as_text(), "true");
        assert_eq!(Value::Null.as_text(), "");
    }

    #[test]
    fn is_empty_covers_null_and_blank_text() {
        assert!(Value::Null.is_empty());
        assert!(Value::text("  ").is_empty());
        assert!(!Value::Number(0.0).is_empty());
        assert!(!Value::Bool(false).is_empty());
    }

    #[test]
    fn column_pads_short_rows_with_null() {
        let ds = sample_dataset();
        let revenue: Vec<&Value> = ds.column("revenue").collect();
        assert_eq!(revenue.len(), 3);
        assert_eq!(revenue[1], &Value::Null);
        assert_eq!(ds.column("missing").count(), 0);
    }

    #[test]
    fn filter_rows_preserves_schema_and_order() {
        let ds = sample_dataset();
        let out = ds.filter_rows(|row| row.len() == 3);
        assert_eq!(out.schema, ds.schema);
        assert_eq!(out.row_count(), 2);
        assert_eq!(out.rows[0][1], Value::text("a"));
        assert_eq!(out.rows[1][1], Value::text("c"));
        assert_eq!(ds.row_count(), 3);
    }

    #[test]
    fn select_follows_index_order_and_skips_out_of_range() {
        let ds = sample_dataset();
        let out = ds.select(&[2, 0, 9]);
        assert_eq!(out.row_count(), 2);
        assert_eq!(out.rows[0][0], Value::Number(3.0));
        assert_eq!(out.rows[1][0], Value::Number(1.0));
    }

    #[test]
    fn project_onto_fills_missing_and_drops_unknown_columns() {
        let ds = sample_dataset();
        let target = Schema::new(["revenue", "region", "id"]);
        let out = ds.project_onto(&target);
        assert_eq!(out.schema, target);
        assert_eq!(
            out.rows[0],
            vec![Value::Number(10.0), Value::Null, Value::Number(1.0)]
        );
        assert_eq!(out.rows[1], vec![Value::Null, Value::Null, Value::Number(2.0)]);
    }

    #[test]
    fn reduce_rows_folds_in_order() {
        let ds = sample_dataset();
        let names = ds.reduce_rows(String::new(), |mut acc, row| {
            acc.push_str(&row[1].as_text());
            acc
        });
        assert_eq!(names, "abc");
    }
}
