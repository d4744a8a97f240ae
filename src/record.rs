//! Field coercions and the role-aware [`Row`] accessor.
//!
//! Cells arrive with inconsistent encodings: `1_500_000`, `"$1,500,000"`, `true`, `"TRUE"`, `"1"`,
//! `"3/14/2024"`. The functions here are the only place those encodings are interpreted. They
//! never fail: anything unrecognized degrades to `None` / `false`, and each caller decides what
//! "absent" means for its operation.

use std::borrow::Cow;

use chrono::NaiveDate;

use crate::fields::{FieldRole, ResolvedFields};
use crate::types::Value;

static NULL: Value = Value::Null;

/// Numeric view of a cell.
///
/// Numbers pass through (non-finite numbers are rejected). Text is reduced to digits, `.` and `-`
/// and its leading decimal literal is parsed, so currency symbols and thousands separators are
/// ignored. Booleans and `Null` are not numeric.
pub fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) if n.is_finite() => Some(*n),
        Value::Text(s) => parse_numeric_text(s),
        _ => None,
    }
}

/// Parse text as a number after stripping everything except digits, `.` and `-`.
///
/// Only the leading literal counts (`"1.2.3"` → `1.2`, `"10-20"` → `10`).
pub fn parse_numeric_text(raw: &str) -> Option<f64> {
    let stripped: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    let literal = leading_decimal(&stripped)?;
    literal.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn leading_decimal(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    let mut end = 0;
    if bytes.first() == Some(&b'-') {
        end = 1;
    }
    let mut digits = 0;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        digits += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        let mut frac_end = end + 1;
        let mut frac_digits = 0;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
            frac_digits += 1;
        }
        if digits + frac_digits > 0 {
            end = frac_end;
            digits += frac_digits;
        }
    }
    (digits > 0).then(|| &s[..end])
}

/// Boolean view of a cell.
///
/// `true` for the number `1`, the text `"1"`, boolean `true`, and text equal to `"true"` in any
/// case. Everything else, including missing cells, is `false`.
pub fn boolean(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => *n == 1.0,
        Value::Text(s) => {
            let s = s.trim();
            s == "1" || s.eq_ignore_ascii_case("true")
        }
        Value::Null => false,
    }
}

/// Calendar-date view of a cell holding `M/D/YYYY` text.
pub fn date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::Text(s) => parse_slash_date(s),
        _ => None,
    }
}

/// Parse `M/D/YYYY` (one or two digit month/day) into a date.
///
/// Returns `None` for any other shape and for impossible dates such as `13/40/2024`.
pub fn parse_slash_date(raw: &str) -> Option<NaiveDate> {
    let mut parts = raw.trim().split('/');
    let month = parse_date_segment(parts.next()?)?;
    let day = parse_date_segment(parts.next()?)?;
    let year = parse_date_segment(parts.next()?)?;
    if parts.next().is_some() {
        return None;
    }
    let year = i32::try_from(year).ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_date_segment(segment: &str) -> Option<u32> {
    let segment = segment.trim();
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

/// One record seen through its dataset's [`ResolvedFields`].
///
/// Accessors take a [`FieldRole`] and apply the matching coercion; a role with no column, or a
/// row too short to hold it, reads as `Null`.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    values: &'a [Value],
    fields: &'a ResolvedFields,
}

impl<'a> Row<'a> {
    pub fn new(values: &'a [Value], fields: &'a ResolvedFields) -> Self {
        Self { values, fields }
    }

    /// Raw cell for `role`.
    pub fn value(&self, role: FieldRole) -> &'a Value {
        self.fields
            .index(role)
            .and_then(|i| self.values.get(i))
            .unwrap_or(&NULL)
    }

    /// See [`numeric`].
    pub fn numeric_field(&self, role: FieldRole) -> Option<f64> {
        numeric(self.value(role))
    }

    /// See [`boolean`].
    pub fn boolean_field(&self, role: FieldRole) -> bool {
        boolean(self.value(role))
    }

    /// See [`date`].
    pub fn date_field(&self, role: FieldRole) -> Option<NaiveDate> {
        date(self.value(role))
    }

    /// Textual rendering of the cell for `role` (`""` when missing).
    pub fn text_field(&self, role: FieldRole) -> Cow<'a, str> {
        self.value(role).as_text()
    }
}
