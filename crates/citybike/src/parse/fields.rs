//! Typed field parsing. Nothing here fails: every outcome is a [`Field`].

use chrono::{NaiveDate, NaiveDateTime};

use crate::input::RawTable;

/// Date-time layouts accepted for timestamps, tried in order.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
];

/// Date-only layouts.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Outcome of parsing one raw cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Field<T> {
    /// Parsed successfully.
    Value(T),
    /// Column absent or cell empty/null-like.
    Missing,
    /// Cell present but unparseable; carries the raw text.
    Invalid(String),
}

impl<T> Field<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Field::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Field::Missing)
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Field::Invalid(_))
    }

    /// Convert to an owned option, dropping missing and invalid states.
    pub fn into_value(self) -> Option<T> {
        match self {
            Field::Value(v) => Some(v),
            _ => None,
        }
    }
}

/// Run `parse` over a present, non-null cell.
fn parse_with<T>(raw: Option<&str>, parse: impl FnOnce(&str) -> Option<T>) -> Field<T> {
    match raw {
        None => Field::Missing,
        Some(value) if RawTable::is_null_value(value) => Field::Missing,
        Some(value) => {
            let trimmed = value.trim();
            match parse(trimmed) {
                Some(parsed) => Field::Value(parsed),
                None => Field::Invalid(trimmed.to_string()),
            }
        }
    }
}

/// Trimmed text.
pub fn text(raw: Option<&str>) -> Field<String> {
    parse_with(raw, |s| Some(s.to_string()))
}

/// A finite floating-point number.
pub fn number(raw: Option<&str>) -> Field<f64> {
    parse_with(raw, |s| s.parse::<f64>().ok().filter(|v| v.is_finite()))
}

/// A whole number. Integral decimals such as `"20.0"` are accepted.
pub fn integer(raw: Option<&str>) -> Field<i64> {
    parse_with(raw, |s| {
        s.parse::<i64>().ok().or_else(|| {
            s.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64)
                .map(|v| v as i64)
        })
    })
}

/// A boolean flag.
pub fn flag(raw: Option<&str>) -> Field<bool> {
    parse_with(raw, |s| match s.to_lowercase().as_str() {
        "true" | "yes" | "y" | "1" | "available" => Some(true),
        "false" | "no" | "n" | "0" | "unavailable" => Some(false),
        _ => None,
    })
}

/// An enum tag via its label parser.
pub fn label<T>(raw: Option<&str>, parse: fn(&str) -> Option<T>) -> Field<T> {
    parse_with(raw, parse)
}

/// A timestamp. Date-only values mean midnight.
pub fn datetime(raw: Option<&str>) -> Field<NaiveDateTime> {
    parse_with(raw, parse_datetime)
}

/// A calendar date. Full timestamps are accepted and truncated to the date.
pub fn date(raw: Option<&str>) -> Field<NaiveDate> {
    parse_with(raw, |s| {
        DATE_FORMATS
            .iter()
            .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
            .or_else(|| parse_datetime(s).map(|dt| dt.date()))
    })
}

/// Parse a timestamp in any of the accepted layouts.
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(value, f).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|f| NaiveDate::parse_from_str(value, f).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
