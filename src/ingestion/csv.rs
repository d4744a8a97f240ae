//! CSV ingestion implementation.

use std::io::Read;
use std::path::Path;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{DataSet, Schema, Value};

// Integers beyond this are not exactly representable as f64; such cells stay text (e.g. long IDs).
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Ingest a CSV file into an in-memory [`DataSet`].
///
/// Rules:
///
/// - The first row is the header; its (trimmed) names become the [`Schema`].
/// - Rows may be shorter or longer than the header: missing cells read as `Null`, extra cells are
///   dropped.
/// - Blank lines are skipped. A header-only file yields an empty dataset.
/// - Each cell is typed independently by [`infer_value`].
pub fn ingest_csv_from_path(path: impl AsRef<Path>) -> IngestionResult<DataSet> {
    let mut rdr = reader_builder().from_path(path)?;
    ingest_csv_from_reader(&mut rdr)
}

/// Ingest CSV text already held in memory (e.g. a fetched feed).
pub fn ingest_csv_from_str(input: &str) -> IngestionResult<DataSet> {
    let mut rdr = reader_builder().from_reader(input.as_bytes());
    ingest_csv_from_reader(&mut rdr)
}

/// Ingest CSV data from an existing CSV reader.
///
/// The reader must be configured with headers; `flexible(true)` is needed for ragged rows.
pub fn ingest_csv_from_reader<R: Read>(rdr: &mut csv::Reader<R>) -> IngestionResult<DataSet> {
    let headers = rdr.headers()?.clone();
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(IngestionError::SchemaMismatch {
            message: "csv input has no header row".to_string(),
        });
    }
    let schema = Schema::new(headers.iter().map(str::trim));
    let width = schema.len();

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for (row_idx0, result) in rdr.records().enumerate() {
        let record = result?;
        if record.len() > width {
            // 1-based, +1 again because the header is row 1.
            tracing::debug!(
                row = row_idx0 + 2,
                extra = record.len() - width,
                "dropping csv cells beyond header"
            );
        }
        let row = (0..width)
            .map(|i| record.get(i).map(infer_value).unwrap_or(Value::Null))
            .collect();
        rows.push(row);
    }

    Ok(DataSet::new(schema, rows))
}

fn reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.has_headers(true).flexible(true);
    builder
}

/// Type one raw CSV cell.
///
/// - empty (after trimming) → `Null`
/// - `true`/`TRUE`/`True`, `false`/`FALSE`/`False` → `Bool`
/// - a plain decimal literal (`-12`, `3.5`, `.5`, `1e6`) within exact-integer range → `Number`
/// - anything else, including `$1,000` or `1/5/2024` → trimmed `Text`
pub fn infer_value(raw: &str) -> Value {
    let s = raw.trim();
    if s.is_empty() {
        return Value::Null;
    }
    match s {
        "true" | "TRUE" | "True" => return Value::Bool(true),
        "false" | "FALSE" | "False" => return Value::Bool(false),
        _ => {}
    }
    if is_decimal_literal(s) {
        if let Ok(n) = s.parse::<f64>() {
            if n.is_finite() && n.abs() <= MAX_EXACT_INTEGER {
                return Value::Number(n);
            }
        }
    }
    Value::Text(s.to_string())
}

fn is_decimal_literal(s: &str) -> bool {
    let b = s.as_bytes();
    let mut i = 0;
    if b.first() == Some(&b'-') {
        i = 1;
    }
    let int_start = i;
    while i < b.len() && b[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;
    if i < b.len() && b[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < b.len() && b[i].is_ascii_digit() {
            i += 1;
        }
        digits += i - frac_start;
    }
    if digits == 0 {
        return false;
    }
    if i < b.len() && (b[i] == b'e' || b[i] == b'E') {
        i += 1;
        if i < b.len() && (b[i] == b'+' || b[i] == b'-') {
            i += 1;
        }
        let exp_start = i;
        while i < b.len() && b[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }
    i == b.len()
}
