//! File-backed collaborators: JSON event files and a stdout sink.
//!
//! Calendar file:
//!
//! ```json
//! [{ "name": "Shacharis", "start": "2025-01-14T07:00:00-05:00", "calendar": "minyan" }]
//! ```
//!
//! `calendar` is optional; entries without it belong to every calendar.
//! All-day entries give a `date` (`"2025-01-14"`) instead of `start` and
//! begin at local midnight in the configured zone.
//!
//! Liturgical file:
//!
//! ```json
//! [{ "kind": "open", "instant": "2025-01-17T16:40:00-05:00" }]
//! ```
//!
//! Files are read on every `list` call, so read and parse failures surface
//! as source errors.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, NaiveDate};
use chrono_tz::Tz;
use minyan_times::datetime::start_of_date;
use minyan_times::error::Result;
use minyan_times::{
    BoundaryKind, CalendarEvent, EventSource, LiturgicalEvent, LiturgicalEventSource, MessageSink,
    TimeWindow, TimesError,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct CalendarRecord {
    name: String,
    #[serde(default)]
    start: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    date: Option<NaiveDate>,
    #[serde(default)]
    calendar: Option<String>,
}

impl CalendarRecord {
    fn into_event(self, tz: &Tz) -> Result<CalendarEvent> {
        let start = match (self.start, self.date) {
            (Some(start), _) => start.with_timezone(tz),
            (None, Some(date)) => start_of_date(tz, date),
            (None, None) => {
                return Err(TimesError::Source(format!(
                    "event '{}' has neither start nor date",
                    self.name
                )))
            }
        };
        Ok(CalendarEvent {
            name: self.name,
            start,
        })
    }
}

#[derive(Debug, Deserialize)]
struct LiturgicalRecord {
    kind: BoundaryKind,
    instant: DateTime<FixedOffset>,
}

fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| TimesError::Source(format!("reading {}: {e}", path.display())))?;
    serde_json::from_str(&text)
        .map_err(|e| TimesError::Source(format!("parsing {}: {e}", path.display())))
}

/// Calendar events from a JSON file.
#[derive(Debug, Clone)]
pub struct JsonCalendar {
    path: PathBuf,
    tz: Tz,
}

impl JsonCalendar {
    pub fn new(path: impl Into<PathBuf>, tz: Tz) -> Self {
        Self {
            path: path.into(),
            tz,
        }
    }
}

impl EventSource for JsonCalendar {
    fn list(&self, window: &TimeWindow, calendar_id: &str) -> Result<Vec<CalendarEvent>> {
        let records: Vec<CalendarRecord> = read_records(&self.path)?;
        tracing::debug!(path = %self.path.display(), count = records.len(), "loaded calendar");
        let mut events = Vec::new();
        for record in records {
            if !record.calendar.as_deref().is_none_or(|id| id == calendar_id) {
                continue;
            }
            let event = record.into_event(&self.tz)?;
            if window.contains(&event.start) {
                events.push(event);
            }
        }
        Ok(events)
    }
}

/// Candle-lighting and havdalah times from a JSON file.
#[derive(Debug, Clone)]
pub struct JsonLiturgical {
    path: PathBuf,
    tz: Tz,
}

impl JsonLiturgical {
    pub fn new(path: impl Into<PathBuf>, tz: Tz) -> Self {
        Self {
            path: path.into(),
            tz,
        }
    }
}

impl LiturgicalEventSource for JsonLiturgical {
    fn list(&self, window: &TimeWindow) -> Result<Vec<LiturgicalEvent>> {
        let records: Vec<LiturgicalRecord> = read_records(&self.path)?;
        Ok(records
            .into_iter()
            .map(|r| LiturgicalEvent {
                kind: r.kind,
                instant: r.instant.with_timezone(&self.tz),
            })
            .filter(|e| window.contains(&e.instant))
            .collect())
    }
}

/// Delivers messages by printing them.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl MessageSink for StdoutSink {
    fn enqueue(&self, destination: &str, text: &str) -> Result<()> {
        tracing::info!(destination, "delivering message");
        let mut out = std::io::stdout().lock();
        writeln!(out, "{text}").map_err(|e| TimesError::Source(format!("writing to stdout: {e}")))
    }
}
