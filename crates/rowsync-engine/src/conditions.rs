//! Factories for the stock cell-value predicates.
//!
//! All comparisons operate on the raw string value of a cell. The ordering
//! factories (`less_than` and friends) compare **lexicographically** — they
//! are not numeric and not date-aware; use the `dates_*` factories for
//! calendar semantics.
//!
//! Date predicates take the reference bound as a fixed
//! `%Y-%m-%d %H:%M:%S%.3f` literal (validated eagerly, so a bad bound is an
//! error at construction) and parse each cell with a caller-supplied chrono
//! pattern such as `%d/%m/%Y`. A cell that does not parse under that pattern
//! makes the predicate evaluate false — the row is excluded, the selection
//! never aborts. The two formats are independent: the bound form never
//! changes, the cell pattern is whatever the sheet uses.

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tracing::trace;

use crate::error::EngineError;
use crate::predicate::Predicate;

/// Fixed literal form for date-predicate reference bounds.
const BOUND_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Exact, case-sensitive equality.
pub fn equals(expected: impl Into<String>) -> Predicate {
    let expected = expected.into();
    Predicate::new(move |value| value == expected)
}

/// Exact, case-sensitive inequality (the negation of [`equals`]).
pub fn not_equals(expected: impl Into<String>) -> Predicate {
    equals(expected).negate()
}

pub fn equals_ignore_case(expected: impl Into<String>) -> Predicate {
    let expected = expected.into();
    Predicate::new(move |value| value.eq_ignore_ascii_case(&expected))
}

/// Lexicographic `value < expected`.
pub fn less_than(expected: impl Into<String>) -> Predicate {
    let expected = expected.into();
    Predicate::new(move |value| value < expected.as_str())
}

/// Lexicographic `value > expected`.
pub fn greater_than(expected: impl Into<String>) -> Predicate {
    let expected = expected.into();
    Predicate::new(move |value| value > expected.as_str())
}

/// Lexicographic `value <= expected`.
pub fn less_than_or_equals(expected: impl Into<String>) -> Predicate {
    let expected = expected.into();
    Predicate::new(move |value| value <= expected.as_str())
}

/// Lexicographic `value >= expected`.
pub fn greater_than_or_equals(expected: impl Into<String>) -> Predicate {
    let expected = expected.into();
    Predicate::new(move |value| value >= expected.as_str())
}

pub fn contains(expected: impl Into<String>) -> Predicate {
    let expected = expected.into();
    Predicate::new(move |value| value.contains(expected.as_str()))
}

pub fn not_contains(expected: impl Into<String>) -> Predicate {
    contains(expected).negate()
}

pub fn starts_with(expected: impl Into<String>) -> Predicate {
    let expected = expected.into();
    Predicate::new(move |value| value.starts_with(expected.as_str()))
}

pub fn not_starts_with(expected: impl Into<String>) -> Predicate {
    starts_with(expected).negate()
}

pub fn ends_with(expected: impl Into<String>) -> Predicate {
    let expected = expected.into();
    Predicate::new(move |value| value.ends_with(expected.as_str()))
}

pub fn not_ends_with(expected: impl Into<String>) -> Predicate {
    ends_with(expected).negate()
}

/// Membership in a finite set of expected values.
pub fn is_in<I, S>(expected: I) -> Predicate
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let expected: BTreeSet<String> = expected.into_iter().map(Into::into).collect();
    Predicate::new(move |value| expected.contains(value))
}

pub fn not_in<I, S>(expected: I) -> Predicate
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    is_in(expected).negate()
}

/// Emptiness of the raw (untrimmed) string.
pub fn is_empty() -> Predicate {
    Predicate::new(str::is_empty)
}

pub fn is_not_empty() -> Predicate {
    is_empty().negate()
}

/// Calendar `value > bound`, with the cell parsed under `pattern`.
pub fn dates_greater_than(bound: &str, pattern: &str) -> Result<Predicate, EngineError> {
    let bound = parse_bound(bound)?;
    let pattern = pattern.to_string();
    Ok(Predicate::new(move |value| {
        parse_cell(value, &pattern).is_some_and(|parsed| parsed > bound)
    }))
}

/// Calendar `value >= bound`, with the cell parsed under `pattern`.
pub fn dates_greater_than_or_equals(bound: &str, pattern: &str) -> Result<Predicate, EngineError> {
    let bound = parse_bound(bound)?;
    let pattern = pattern.to_string();
    Ok(Predicate::new(move |value| {
        parse_cell(value, &pattern).is_some_and(|parsed| parsed >= bound)
    }))
}

/// Calendar `from <= value <= to` (both bounds inclusive).
pub fn dates_between(from: &str, to: &str, pattern: &str) -> Result<Predicate, EngineError> {
    let from = parse_bound(from)?;
    let to = parse_bound(to)?;
    let pattern = pattern.to_string();
    Ok(Predicate::new(move |value| {
        parse_cell(value, &pattern).is_some_and(|parsed| parsed >= from && parsed <= to)
    }))
}

fn parse_bound(value: &str) -> Result<NaiveDateTime, EngineError> {
    NaiveDateTime::parse_from_str(value, BOUND_FORMAT).map_err(|source| {
        EngineError::BadDateBound {
            value: value.to_string(),
            source,
        }
    })
}

/// Parses a cell as a datetime under `pattern`, falling back to a bare date
/// at midnight. `None` means the cell fails the predicate (fail closed).
fn parse_cell(value: &str, pattern: &str) -> Option<NaiveDateTime> {
    if let Ok(parsed) = NaiveDateTime::parse_from_str(value, pattern) {
        return Some(parsed);
    }
    match NaiveDate::parse_from_str(value, pattern) {
        Ok(date) => Some(date.and_time(NaiveTime::MIN)),
        Err(error) => {
            trace!(value, %pattern, %error, "cell value did not parse as a date");
            None
        }
    }
}
