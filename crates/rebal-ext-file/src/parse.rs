//! Cell parsing for spreadsheet exports.

use std::str::FromStr;

use rebal_traits::error::TraitError;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Placeholders spreadsheets emit for "no value".
const BLANKS: [&str; 6] = ["", "-", "n/a", "#n/a", "na", "none"];

fn clean(raw: Option<&str>) -> Option<String> {
    let s = raw?.trim();
    if BLANKS.contains(&s.to_lowercase().as_str()) {
        return None;
    }
    Some(s.replace([',', '_'], ""))
}

fn parse_error(field: &str, raw: &str, row: usize) -> TraitError {
    TraitError::ParseError(format!("row {row}: invalid {field} '{raw}'"))
}

/// Parses a number, keeping zero and negatives.
pub(crate) fn decimal(raw: Option<&str>, field: &str, row: usize) -> Result<Option<Decimal>, TraitError> {
    let Some(s) = clean(raw) else {
        return Ok(None);
    };
    Decimal::from_str(&s)
        .or_else(|_| Decimal::from_scientific(&s))
        .map(Some)
        .map_err(|_| parse_error(field, &s, row))
}

/// Parses a number; zero and negatives become `None`.
pub(crate) fn positive_decimal(
    raw: Option<&str>,
    field: &str,
    row: usize,
) -> Result<Option<Decimal>, TraitError> {
    Ok(decimal(raw, field, row)?.filter(|d| *d > Decimal::ZERO))
}

/// Parses a positive float.
pub(crate) fn positive_f64(raw: Option<&str>, field: &str, row: usize) -> Result<Option<f64>, TraitError> {
    Ok(positive_decimal(raw, field, row)?.and_then(|d| d.to_f64()))
}

/// Parses a fraction, accepting `"3.5%"` as 0.035. Zero is kept.
pub(crate) fn fraction(raw: Option<&str>, field: &str, row: usize) -> Result<Option<f64>, TraitError> {
    let Some(s) = clean(raw) else {
        return Ok(None);
    };
    let (number, scale) = match s.strip_suffix('%') {
        Some(n) => (n.trim(), 100.0),
        None => (s.as_str(), 1.0),
    };
    let value: f64 = number.parse().map_err(|_| parse_error(field, &s, row))?;
    if !value.is_finite() {
        return Err(parse_error(field, &s, row));
    }
    Ok(Some(value / scale))
}

/// Like [`fraction`], but negatives become `None`. A zero yield is a value.
pub(crate) fn non_negative_fraction(
    raw: Option<&str>,
    field: &str,
    row: usize,
) -> Result<Option<f64>, TraitError> {
    Ok(fraction(raw, field, row)?.filter(|v| *v >= 0.0))
}
