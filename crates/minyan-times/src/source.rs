//! Collaborator interfaces and the calendar query built on them.
//!
//! The library never talks to a calendar service or chat transport itself.
//! Callers hand in implementations of these traits; the CLI ships
//! file-backed ones.

use chrono::{DateTime, Duration};
use chrono_tz::Tz;
use serde::Serialize;

use crate::command::TimeRangeCommand;
use crate::error::{Result, TimesError};
use crate::observance::LiturgicalEvent;

/// Times that started this long ago still count as upcoming.
pub const ELAPSED_GRACE_MINUTES: i64 = 5;

/// A closed interval of instants, both ends inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl TimeWindow {
    pub fn contains(&self, instant: &DateTime<Tz>) -> bool {
        self.start <= *instant && *instant <= self.end
    }
}

impl From<&TimeRangeCommand> for TimeWindow {
    fn from(command: &TimeRangeCommand) -> Self {
        Self {
            start: command.start,
            end: command.end,
        }
    }
}

/// One scheduled service on the minyan calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarEvent {
    pub name: String,
    pub start: DateTime<Tz>,
}

/// A calendar that can list the events starting inside a window.
pub trait EventSource {
    /// # Errors
    ///
    /// Implementations report failures as [`crate::TimesError::Source`].
    fn list(&self, window: &TimeWindow, calendar_id: &str) -> Result<Vec<CalendarEvent>>;
}

/// A provider of candle-lighting and havdalah times.
pub trait LiturgicalEventSource {
    /// # Errors
    ///
    /// Implementations report failures as [`crate::TimesError::Source`].
    fn list(&self, window: &TimeWindow) -> Result<Vec<LiturgicalEvent>>;
}

/// Outgoing message delivery.
pub trait MessageSink {
    /// # Errors
    ///
    /// Implementations report failures as [`crate::TimesError::Source`].
    fn enqueue(&self, destination: &str, text: &str) -> Result<()>;
}

/// List the calendar events a command asks for.
///
/// Names are trimmed and the result is ordered by start time. Unless the
/// command includes elapsed times, events that started before
/// `now - grace` are dropped.
///
/// # Errors
///
/// Propagates the source's error. A negative grace, or one that reaches
/// past the representable range, is [`TimesError::InvalidRange`].
pub fn collect_times<S>(
    source: &S,
    calendar_id: &str,
    command: &TimeRangeCommand,
    now: &DateTime<Tz>,
    grace: Duration,
) -> Result<Vec<CalendarEvent>>
where
    S: EventSource + ?Sized,
{
    let cutoff = if command.include_elapsed {
        None
    } else {
        Some(elapsed_cutoff(now, grace)?)
    };

    let window = TimeWindow::from(command);
    let mut events: Vec<CalendarEvent> = source
        .list(&window, calendar_id)?
        .into_iter()
        .map(|event| CalendarEvent {
            name: event.name.trim().to_string(),
            start: event.start,
        })
        .collect();
    events.sort_by(|a, b| a.start.cmp(&b.start));

    if let Some(cutoff) = cutoff {
        let before = events.len();
        events.retain(|event| event.start > cutoff);
        tracing::debug!(dropped = before - events.len(), %cutoff, "filtered elapsed times");
    }

    Ok(events)
}

fn elapsed_cutoff(now: &DateTime<Tz>, grace: Duration) -> Result<DateTime<Tz>> {
    if grace < Duration::zero() {
        return Err(TimesError::InvalidRange(format!("negative grace period {grace}")));
    }
    now.checked_sub_signed(grace)
        .ok_or_else(|| TimesError::InvalidRange(format!("grace period {grace} before {now}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::upcoming;
    use chrono::TimeZone;
    use chrono_tz::America::New_York;

    fn at(d: u32, h: u32, m: u32) -> DateTime<Tz> {
        New_York.with_ymd_and_hms(2025, 1, d, h, m, 0).unwrap()
    }

    struct FakeCalendar(Vec<CalendarEvent>);

    impl EventSource for FakeCalendar {
        fn list(&self, window: &TimeWindow, calendar_id: &str) -> Result<Vec<CalendarEvent>> {
            if calendar_id != "minyan" {
                return Err(TimesError::Source(format!("no calendar {calendar_id}")));
            }
            Ok(self
                .0
                .iter()
                .filter(|e| window.contains(&e.start))
                .cloned()
                .collect())
        }
    }

    fn event(name: &str, start: DateTime<Tz>) -> CalendarEvent {
        CalendarEvent {
            name: name.to_string(),
            start,
        }
    }

    fn calendar() -> FakeCalendar {
        FakeCalendar(vec![
            event(" Mincha ", at(14, 16, 30)),
            event("Shacharis", at(14, 10, 12)),
            event("Shacharis", at(14, 7, 0)),
            event("Maariv", at(14, 20, 0)),
            event("Shacharis", at(15, 7, 0)),
            event("Shacharis", at(16, 7, 0)),
        ])
    }

    fn grace() -> Duration {
        Duration::minutes(ELAPSED_GRACE_MINUTES)
    }

    #[test]
    fn test_upcoming_window_starts_now() {
        let now = at(14, 10, 15);
        let cmd = upcoming(&now, false);
        let events = collect_times(&calendar(), "minyan", &cmd, &now, grace()).unwrap();
        let names: Vec<(&str, DateTime<Tz>)> =
            events.iter().map(|e| (e.name.as_str(), e.start)).collect();
        assert_eq!(
            names,
            vec![
                ("Mincha", at(14, 16, 30)),
                ("Maariv", at(14, 20, 0)),
                ("Shacharis", at(15, 7, 0)),
            ]
        );
    }

    #[test]
    fn test_elapsed_filter_keeps_grace_period() {
        // A whole-week window that hides elapsed times.
        let now = at(14, 10, 15);
        let cmd = TimeRangeCommand {
            start: at(14, 0, 0),
            end: at(20, 23, 59),
            header: "Minyan times for the upcoming week".to_string(),
            alternate_locale: false,
            include_elapsed: false,
        };
        let events = collect_times(&calendar(), "minyan", &cmd, &now, grace()).unwrap();
        // 07:00 is gone; 10:12 started three minutes ago and stays.
        assert_eq!(events.len(), 5);
        assert_eq!(events[0].start, at(14, 10, 12));
        assert_eq!(events[1].name, "Mincha");
    }

    #[test]
    fn test_include_elapsed_keeps_everything_in_window() {
        let now = at(14, 10, 15);
        let cmd = TimeRangeCommand {
            start: at(14, 0, 0),
            end: at(14, 23, 59),
            header: "Minyan times for today".to_string(),
            alternate_locale: false,
            include_elapsed: true,
        };
        let events = collect_times(&calendar(), "minyan", &cmd, &now, grace()).unwrap();
        assert_eq!(events.len(), 4);
        assert_eq!(events[0].start, at(14, 7, 0));
    }

    #[test]
    fn test_source_error_propagates() {
        let now = at(14, 10, 15);
        let err =
            collect_times(&calendar(), "other", &upcoming(&now, false), &now, grace()).unwrap_err();
        assert!(matches!(err, TimesError::Source(_)));
        assert_eq!(err.user_message(), "There was an error retrieving the minyan times");
    }

    #[test]
    fn test_oversized_grace_is_an_error() {
        let now = at(14, 10, 15);
        let cmd = upcoming(&now, false);
        let err = collect_times(&calendar(), "minyan", &cmd, &now, Duration::days(100_000_000))
            .unwrap_err();
        assert!(matches!(err, TimesError::InvalidRange(_)));
    }

    #[test]
    fn test_negative_grace_is_an_error() {
        let now = at(14, 10, 15);
        let cmd = upcoming(&now, false);
        let err =
            collect_times(&calendar(), "minyan", &cmd, &now, Duration::minutes(-5)).unwrap_err();
        assert!(matches!(err, TimesError::InvalidRange(_)));
    }

    #[test]
    fn test_grace_is_ignored_when_elapsed_times_are_included() {
        let now = at(14, 10, 15);
        let cmd = TimeRangeCommand {
            start: at(14, 0, 0),
            end: at(14, 23, 59),
            header: "Minyan times for today".to_string(),
            alternate_locale: false,
            include_elapsed: true,
        };
        let events =
            collect_times(&calendar(), "minyan", &cmd, &now, Duration::days(100_000_000)).unwrap();
        assert_eq!(events.len(), 4);
    }

    #[test]
    fn test_window_contains_is_inclusive() {
        let window = TimeWindow {
            start: at(14, 0, 0),
            end: at(14, 1, 0),
        };
        assert!(window.contains(&at(14, 0, 0)));
        assert!(window.contains(&at(14, 1, 0)));
        assert!(!window.contains(&at(14, 1, 1)));
    }
}
