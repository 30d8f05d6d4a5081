//! Publication-year extraction from mixed date representations.
//!
//! Bibliographic exports disagree wildly on what a "publication year" cell
//! holds: a bare year, a float rendering of one, an ISO date, a textual
//! month-year, or nothing usable at all. [`extract_year`] normalizes one cell
//! value into an integer year, degrading strategy by strategy and never
//! failing the pipeline.
//!
//! # Example
//!
//! ```
//! use metareview::year::extract_year;
//!
//! assert_eq!(extract_year("2021"), Some(2021));
//! assert_eq!(extract_year("2021.0"), Some(2021));
//! assert_eq!(extract_year("March 2021"), Some(2021));
//! assert_eq!(extract_year("15/03/2021"), Some(2021));
//! assert_eq!(extract_year("n/a"), None);
//! ```

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;

/// Date formats tried before falling back to pattern matching.
///
/// Day-first is tried before month-first, matching how the exports this
/// tool sees most often are written.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d/%m/%Y",
    "%m/%d/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
];

static MONTH_YEAR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?,?\s+(\d{4})\b")
        .unwrap()
});

static BARE_YEAR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([12]\d{3})\b").unwrap());

/// Extracts an integer year from one date-like cell value.
///
/// Strategies are tried in order, first success wins:
///
/// 1. empty input yields `None`,
/// 2. direct numeric interpretation (`"2021"`, `"2021.0"`), truncating
///    fractional years,
/// 3. date parsing over common formats, taking the year component,
/// 4. a month-name-plus-year or bare four-digit-year pattern anywhere in
///    the value.
///
/// Total failure yields `None` rather than an error; unparseable dates must
/// never abort a run.
#[must_use]
pub fn extract_year(value: &str) -> Option<i32> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(number) = value.parse::<f64>() {
        if number.is_finite() && number >= i32::MIN as f64 && number <= i32::MAX as f64 {
            return Some(number.trunc() as i32);
        }
        return None;
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date.year());
        }
    }

    if let Some(captures) = MONTH_YEAR_REGEX.captures(value) {
        return captures[1].parse().ok();
    }

    BARE_YEAR_REGEX
        .captures(value)
        .and_then(|captures| captures[1].parse().ok())
}
