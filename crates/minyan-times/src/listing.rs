//! Rendering a list of calendar events as a chat reply.
//!
//! ```text
//! *Minyan times for the upcoming week:*
//!
//! Tuesday, January 14th
//! - *Mincha*: 4:30 ᴘᴍ
//!
//! Wednesday, January 15th
//! - *Shacharis*: 7:00 ᴀᴍ
//! ```
//!
//! Bold uses the chat's `*…*` markup. AM/PM are written in small capitals
//! after a narrow no-break space.

use chrono::{NaiveDate, Timelike};

use crate::command::{long_date_label, TimeRangeCommand};
use crate::source::CalendarEvent;

/// Service names swapped in when the alternate locale is requested.
pub const ALTERNATE_NAMES: &[(&str, &str)] = &[
    ("Shacharis", "Shaharit"),
    ("shacharis", "shaharit"),
    ("Mincha", "Minha"),
    ("mincha", "minha"),
    ("Maariv", "Arbit"),
    ("maariv", "arbit"),
    ("Slichot", "Selihot"),
    ("slichot", "selihot"),
];

/// Body line used when a window holds no events.
pub const EMPTY_LISTING: &str = "(no times to show)";

/// Format `events` (already sorted) under the command's header.
///
/// Events are grouped by local date. A blank line separates date groups
/// unless every event falls on the same day. `today` decides whether date
/// labels carry a year.
pub fn format_listing(
    command: &TimeRangeCommand,
    events: &[CalendarEvent],
    today: NaiveDate,
) -> String {
    let tz = command.start.timezone();
    let mut out = format!("*{}:*", command.header);

    let (Some(first), Some(last)) = (events.first(), events.last()) else {
        if command.start.date_naive() == command.end.date_naive() {
            out.push('\n');
            out.push_str(&long_date_label(command.start.date_naive(), today));
        }
        out.push('\n');
        out.push_str(EMPTY_LISTING);
        return finish(out, command.alternate_locale);
    };

    let single_day = first.start.with_timezone(&tz).date_naive()
        == last.start.with_timezone(&tz).date_naive();

    let mut current: Option<NaiveDate> = None;
    for event in events {
        let local = event.start.with_timezone(&tz);
        let date = local.date_naive();
        if current != Some(date) {
            out.push('\n');
            if !single_day || current.is_some() {
                out.push('\n');
            }
            out.push_str(&long_date_label(date, today));
            current = Some(date);
        }
        out.push_str(&format!("\n- *{}*: {}", event.name, clock_label(local.hour(), local.minute())));
    }

    finish(out, command.alternate_locale)
}

fn finish(text: String, alternate_locale: bool) -> String {
    if alternate_locale {
        alternate_service_names(&text)
    } else {
        text
    }
}

/// Replace service names with their alternate-locale spellings.
pub fn alternate_service_names(text: &str) -> String {
    ALTERNATE_NAMES
        .iter()
        .fold(text.to_string(), |acc, (from, to)| acc.replace(from, to))
}

/// "7:05 ᴀᴍ", "12:30 ᴘᴍ".
pub fn clock_label(hour: u32, minute: u32) -> String {
    let (hour12, marker) = match hour {
        0 => (12, "\u{1D00}\u{1D0D}"),
        1..=11 => (hour, "\u{1D00}\u{1D0D}"),
        12 => (12, "\u{1D18}\u{1D0D}"),
        _ => (hour - 12, "\u{1D18}\u{1D0D}"),
    };
    format!("{hour12}:{minute:02}\u{202F}{marker}")
}
