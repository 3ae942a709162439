//! Building time-range commands from matched expressions.
//!
//! | expression | start | end | elapsed items |
//! |---|---|---|---|
//! | upcoming | now | now + 25h | hidden |
//! | `week` | start of today | +7d − 1s | hidden |
//! | DATE | start of date | 23:59:59 of date | shown |
//! | `week of` DATE | Sunday on/before date | +7d − 1s | shown |
//! | DATE `to` DATE | start of first | 23:59:59 of second | shown |

use chrono::{DateTime, Datelike, Duration, NaiveDate};
use chrono_tz::Tz;
use serde::Serialize;

use crate::datetime::{end_of_date, end_of_week_from, start_of_date};
use crate::error::TimesError;
use crate::grammar::RangeExpr;
use crate::resolve::{resolve, DateKind, ResolvedDate};
use crate::tokens::ordinal_suffix;

/// Length of the default "upcoming" window, in hours.
pub const UPCOMING_HOURS: i64 = 25;

/// A normalized request for the times inside one window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeRangeCommand {
    /// First instant of the window (inclusive).
    pub start: DateTime<Tz>,
    /// Last instant of the window (inclusive).
    pub end: DateTime<Tz>,
    /// Title line for the reply.
    pub header: String,
    /// Set when the sender asked for the alternate (Sephardic) naming.
    pub alternate_locale: bool,
    /// Whether times that already started should still be listed.
    pub include_elapsed: bool,
}

/// The default command: everything in the next 25 hours that has not passed.
pub fn upcoming(now: &DateTime<Tz>, alternate_locale: bool) -> TimeRangeCommand {
    TimeRangeCommand {
        start: *now,
        end: *now + Duration::hours(UPCOMING_HOURS),
        header: "Upcoming minyan times".to_string(),
        alternate_locale,
        include_elapsed: false,
    }
}

/// Turn a matched expression into a concrete window around `now`.
///
/// Dates are resolved against `now`'s local date. The second date of a
/// `DATE to DATE` range is resolved against the first one, so
/// "friday to monday" ends on the Monday after that Friday.
///
/// # Errors
///
/// Propagates resolution errors, and returns [`TimesError::InvalidRange`]
/// when a range would end before it starts.
pub fn build(
    expr: &RangeExpr,
    now: &DateTime<Tz>,
    alternate_locale: bool,
) -> Result<TimeRangeCommand, TimesError> {
    let tz = now.timezone();
    let today = now.date_naive();

    let command = match expr {
        RangeExpr::Upcoming => upcoming(now, alternate_locale),
        RangeExpr::UpcomingWeek => TimeRangeCommand {
            start: start_of_date(&tz, today),
            end: end_of_week_from(&tz, today),
            header: "Minyan times for the upcoming week".to_string(),
            alternate_locale,
            include_elapsed: false,
        },
        RangeExpr::Single(date) => {
            let resolved = resolve(date, today)?;
            TimeRangeCommand {
                start: start_of_date(&tz, resolved.date),
                end: end_of_date(&tz, resolved.date),
                header: format!("Minyan times for {}", single_label(&resolved, today)),
                alternate_locale,
                include_elapsed: true,
            }
        }
        RangeExpr::WeekOf(date) => {
            let resolved = resolve(date, today)?;
            let sunday = week_start(resolved.date);
            TimeRangeCommand {
                start: start_of_date(&tz, sunday),
                end: end_of_week_from(&tz, sunday),
                header: format!("Minyan times for the week of {}", numeric_label(resolved.date)),
                alternate_locale,
                include_elapsed: true,
            }
        }
        RangeExpr::Span(from, to) => {
            let first = resolve(from, today)?;
            let second = resolve(to, first.date)?;
            if second.date < first.date {
                return Err(TimesError::InvalidRange(format!(
                    "{} is before {}",
                    second.date, first.date
                )));
            }
            TimeRangeCommand {
                start: start_of_date(&tz, first.date),
                end: end_of_date(&tz, second.date),
                header: format!(
                    "Minyan times from {} to {}",
                    numeric_label(first.date),
                    numeric_label(second.date)
                ),
                alternate_locale,
                include_elapsed: true,
            }
        }
    };

    tracing::debug!(
        start = %command.start,
        end = %command.end,
        header = %command.header,
        "built time range command"
    );
    Ok(command)
}

/// The Sunday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_sunday()))
}

/// "Monday, January 21st", with the year appended when it is not `today`'s.
pub fn long_date_label(date: NaiveDate, today: NaiveDate) -> String {
    let mut label = format!(
        "{}{}",
        date.format("%A, %B %-d"),
        ordinal_suffix(i64::from(date.day()))
    );
    if date.year() != today.year() {
        label.push_str(&format!(" {}", date.year()));
    }
    label
}

fn single_label(resolved: &ResolvedDate, today: NaiveDate) -> String {
    match resolved.kind {
        DateKind::Today => "today".to_string(),
        DateKind::Tomorrow => "tomorrow".to_string(),
        DateKind::Weekday => resolved.date.format("%A").to_string(),
        DateKind::Explicit => long_date_label(resolved.date, today),
    }
}

fn numeric_label(date: NaiveDate) -> String {
    date.format("%-m/%-d/%y").to_string()
}
