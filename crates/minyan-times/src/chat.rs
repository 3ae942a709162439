//! The chat command surface: `!times …` and `!help`.
//!
//! Incoming text is normalized (trimmed, lowercased, whitespace collapsed)
//! before any matching, so `"  !TIMES   Week Of  Monday "` and
//! `"!times week of monday"` are the same command.

use std::sync::OnceLock;

use chrono::DateTime;
use chrono_tz::Tz;
use regex::Regex;

use crate::command::{build, TimeRangeCommand};
use crate::error::{Result, TimesError};
use crate::grammar::grammar;

/// Prefix of the times command.
pub const TIMES_PREFIX: &str = "!times";

/// Prefix of the help command.
pub const HELP_PREFIX: &str = "!help";

/// Usage text sent in reply to `!help`.
pub const HELP_TEXT: &str = "*Usage:*

`!times` or `!times upcoming`
- Displays minyan times for the next 25 hours

`!times week`
- Displays minyan times for the next 7 days

`!times DATE`
- Displays minyan times for `DATE`

`!times week of DATE`
- Displays minyan times for the week of `DATE`

`!times DATE to DATE`
- Displays minyan times between the first `DATE` and the second `DATE`

The `DATE` can be in any of the following formats (capitalization doesn't matter):
- `today` or `tomorrow`
- A day of the week like `Mon`, `Tuesday`, `Shabbat`, etc.
- A date in the format `M[M]/D[D][/[YY]YY]`, e.g. `1/21`, `08/15/25`, `11/07/2026`
- A date in the format `Month DD[th][[,] YYYY]`, e.g. `Jan 21st`, `August 15 2025`, `November 7th, 2000`";

/// A recognized chat command.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatCommand {
    Times(TimeRangeCommand),
    Help,
}

fn whitespace_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("whitespace regex must compile"))
}

fn locale_marker_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\bse?(?:f|ph)ara?dic?\b").expect("locale marker regex must compile")
    })
}

/// Trim, lowercase, and collapse every whitespace run to a single space.
pub fn normalize_input(text: &str) -> String {
    whitespace_regex()
        .replace_all(text.trim().to_lowercase().as_str(), " ")
        .into_owned()
}

/// Remove every locale marker word ("sephardic", "sfardi", "sepharadic", …).
///
/// Returns the remaining text, normalized again, and whether a marker was
/// present.
pub fn strip_locale_marker(text: &str) -> (String, bool) {
    let re = locale_marker_regex();
    if !re.is_match(text) {
        return (text.to_string(), false);
    }
    (normalize_input(&re.replace_all(text, " ")), true)
}

/// Parse a `!times …` message into a command.
///
/// # Errors
///
/// Returns [`TimesError::Parse`] when the text lacks the `!times` prefix or
/// the remainder is not a recognized expression, and propagates resolution
/// errors from the builder.
pub fn parse_times_command(text: &str, now: &DateTime<Tz>) -> Result<TimeRangeCommand> {
    let normalized = normalize_input(text);
    let rest = normalized
        .strip_prefix(TIMES_PREFIX)
        .ok_or_else(|| TimesError::Parse(format!("text does not start with '{TIMES_PREFIX}'")))?;

    let (expression, alternate_locale) = strip_locale_marker(rest.trim());

    let expr = grammar().captures(&expression).ok_or_else(|| {
        tracing::debug!(text = %expression, "expression did not match");
        TimesError::Parse(format!("date did not match: '{expression}'"))
    })?;

    build(&expr, now, alternate_locale)
}

/// Recognize any chat command in `text`.
///
/// Returns `Ok(None)` for messages that are not commands at all.
///
/// # Errors
///
/// Errors from [`parse_times_command`] are returned for `!times` messages.
pub fn parse_chat_command(text: &str, now: &DateTime<Tz>) -> Result<Option<ChatCommand>> {
    let normalized = normalize_input(text);
    if normalized.starts_with(TIMES_PREFIX) {
        parse_times_command(&normalized, now).map(|cmd| Some(ChatCommand::Times(cmd)))
    } else if normalized.starts_with(HELP_PREFIX) {
        Ok(Some(ChatCommand::Help))
    } else {
        Ok(None)
    }
}
