//! Resolution of a single [`DateExpr`] to a calendar date.
//!
//! Every function here is pure: the caller supplies the basedate, so the
//! same expression resolved against the same basedate always yields the
//! same date.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::Serialize;

use crate::error::TimesError;
use crate::grammar::{DateExpr, YearLiteral};
use crate::tokens::{lookup_month, lookup_weekday};

/// How a resolved date was named, used when building headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DateKind {
    Explicit,
    Today,
    Tomorrow,
    Weekday,
}

/// A calendar date together with the way it was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedDate {
    pub date: NaiveDate,
    pub kind: DateKind,
}

/// Number of days in `month` of `year` (proleptic Gregorian, leap-aware).
///
/// Returns 0 for a month outside 1-12 or a year chrono cannot represent.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return 0;
    };
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    match next {
        Some(next) => (next - first).num_days() as u32,
        None => 31,
    }
}

/// Build a date, rejecting anything that is not a real calendar day.
///
/// Years before 1 are rejected as well.
pub fn make_date(year: i32, month: u32, day: u32) -> Result<NaiveDate, TimesError> {
    let invalid = || TimesError::InvalidDate { year, month, day };
    if year < 1 || day < 1 || day > days_in_month(year, month) {
        return Err(invalid());
    }
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

/// The year in which `(month, day)` next occurs on or after `basedate`.
pub fn next_occurrence_year(basedate: NaiveDate, month: u32, day: u32) -> i32 {
    if (month, day) < (basedate.month(), basedate.day()) {
        basedate.year() + 1
    } else {
        basedate.year()
    }
}

/// The first `weekday` strictly after `basedate`.
pub fn next_weekday_after(basedate: NaiveDate, weekday: Weekday) -> NaiveDate {
    let mut offset = weekday.num_days_from_sunday() as i64
        - basedate.weekday().num_days_from_sunday() as i64;
    if offset <= 0 {
        offset += 7;
    }
    basedate + Duration::days(offset)
}

/// Resolve one date expression relative to `basedate`.
///
/// # Errors
///
/// - [`TimesError::InvalidDate`] when the numbers do not form a real date
///   (e.g. `2/30`).
/// - [`TimesError::Lookup`] when a relative keyword, weekday, or month name
///   has no table entry.
pub fn resolve(expr: &DateExpr, basedate: NaiveDate) -> Result<ResolvedDate, TimesError> {
    let resolved = match expr {
        DateExpr::Relative(keyword) => match keyword.to_lowercase().as_str() {
            "today" => ResolvedDate {
                date: basedate,
                kind: DateKind::Today,
            },
            "tomorrow" => ResolvedDate {
                date: basedate + Duration::days(1),
                kind: DateKind::Tomorrow,
            },
            other => {
                return Err(TimesError::Lookup(format!("relative date '{other}'")));
            }
        },
        DateExpr::Weekday(name) => {
            let weekday = lookup_weekday(name)
                .ok_or_else(|| TimesError::Lookup(format!("weekday '{name}'")))?;
            ResolvedDate {
                date: next_weekday_after(basedate, weekday),
                kind: DateKind::Weekday,
            }
        }
        DateExpr::ShortForm { month, day, year } => {
            let year = match year {
                Some(YearLiteral {
                    value,
                    two_digit: true,
                }) => basedate.year() / 100 * 100 + value,
                Some(YearLiteral { value, .. }) => *value,
                None => next_occurrence_year(basedate, *month, *day),
            };
            ResolvedDate {
                date: make_date(year, *month, *day)?,
                kind: DateKind::Explicit,
            }
        }
        DateExpr::LongForm { month, day, year } => {
            let month = lookup_month(month)
                .ok_or_else(|| TimesError::Lookup(format!("month '{month}'")))?;
            // Unlike the short form, a two-digit year is taken literally here.
            let year = match year {
                Some(year) => year.value,
                None => next_occurrence_year(basedate, month, *day),
            };
            ResolvedDate {
                date: make_date(year, month, *day)?,
                kind: DateKind::Explicit,
            }
        }
    };

    tracing::trace!(?expr, %basedate, date = %resolved.date, "resolved date");
    Ok(resolved)
}
