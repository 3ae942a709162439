//! The date-range expression grammar.
//!
//! All accepted expressions are compiled into a single anchored,
//! case-insensitive regex. Alternatives are tried in a fixed order and the
//! first one that matches the whole input wins:
//!
//! | order | alternative | example |
//! |---|---|---|
//! | 1 | upcoming (also the blank string) | `""`, `upcoming` |
//! | 2 | upcoming week | `week` |
//! | 3 | week of DATE | `week of 1/21` |
//! | 4 | DATE | `tomorrow`, `jan 21st` |
//! | 5 | DATE to DATE | `friday to monday` |
//!
//! and inside every DATE:
//!
//! | order | alternative | example |
//! |---|---|---|
//! | 1 | relative keyword | `today`, `tomorrow` |
//! | 2 | weekday name | `mon`, `Shabbos` |
//! | 3 | long form | `August 15 2025`, `Nov 7th, 00` |
//! | 4 | short numeric | `1/21`, `08/15/25`, `11/07/2026` |
//!
//! The DATE sub-grammar is generated once per position with its own group
//! name prefix, so the two dates of a range never share capture names. The
//! capture map is then folded into [`RangeExpr`] / [`DateExpr`] values.
//!
//! Keywords and names fold case over ASCII only, so lookalikes such as
//! `ſun` (long s) do not match.
//!
//! The `regex` crate has no lookaround, so an ordinal suffix is captured in
//! a group of its own and validated against the day number afterwards. A
//! wrong suffix (`1th`, `11st`) makes the whole input a no-match.

use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::tokens::{alternation, ordinal_suffix, MONTH_NAMES, WEEKDAY_NAMES};

// ── Expression types ────────────────────────────────────────────────────────

/// A year as typed by the user. Two-digit years are resolved differently by
/// the short numeric and long-form branches, so the digit count is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearLiteral {
    pub value: i32,
    pub two_digit: bool,
}

impl YearLiteral {
    fn from_digits(digits: &str) -> Option<Self> {
        Some(YearLiteral {
            value: digits.parse().ok()?,
            two_digit: digits.len() == 2,
        })
    }
}

/// One matched date expression, before resolution against a basedate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateExpr {
    /// `today` or `tomorrow` (lowercased).
    Relative(String),
    /// A weekday name or abbreviation (lowercased).
    Weekday(String),
    /// `Month D[suffix][[,] [YY]YY]`; the month is the matched name.
    LongForm {
        month: String,
        day: u32,
        year: Option<YearLiteral>,
    },
    /// `M/D[/[YY]YY]`.
    ShortForm {
        month: u32,
        day: u32,
        year: Option<YearLiteral>,
    },
}

/// The top-level alternative that matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeExpr {
    /// The blank string or `upcoming`.
    Upcoming,
    /// `week`.
    UpcomingWeek,
    /// `week of DATE`.
    WeekOf(DateExpr),
    /// A single `DATE`.
    Single(DateExpr),
    /// `DATE to DATE`.
    Span(DateExpr, DateExpr),
}

// ── Grammar ─────────────────────────────────────────────────────────────────

/// The compiled expression grammar.
#[derive(Debug, Clone)]
pub struct Grammar {
    regex: Regex,
}

const PREFIX_WEEK_OF: &str = "weekof_";
const PREFIX_SINGLE: &str = "date_";
const PREFIX_FROM: &str = "to1_";
const PREFIX_TO: &str = "to2_";

impl Grammar {
    /// Compile the grammar from the token tables.
    ///
    /// This is comparatively expensive; use [`grammar`] for the shared
    /// instance.
    pub fn new() -> Self {
        let pattern = format!(
            r"(?i)^\s*(?:(?P<upcoming>(?-u:upcoming)?)|(?P<upcomingweek>(?-u:week))|(?P<weekof>(?-u:week)\s+(?-u:of)\s+{week_of})|(?P<date>{single})|(?P<to>{from}\s+(?-u:to)\s+{to}))\s*$",
            week_of = single_date_pattern(PREFIX_WEEK_OF),
            single = single_date_pattern(PREFIX_SINGLE),
            from = single_date_pattern(PREFIX_FROM),
            to = single_date_pattern(PREFIX_TO),
        );
        let regex = Regex::new(&pattern).expect("date range grammar must compile");
        Grammar { regex }
    }

    /// The full regex source, mostly useful for debugging.
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Match `text` against the grammar.
    ///
    /// Returns `None` when no alternative matches the whole input; this is
    /// an expected outcome, not a fault.
    pub fn captures(&self, text: &str) -> Option<RangeExpr> {
        let Some(caps) = self.regex.captures(text) else {
            tracing::debug!(input = text, "no grammar alternative matched");
            return None;
        };

        if caps.name("upcoming").is_some() {
            Some(RangeExpr::Upcoming)
        } else if caps.name("upcomingweek").is_some() {
            Some(RangeExpr::UpcomingWeek)
        } else if caps.name("weekof").is_some() {
            date_expr(&caps, PREFIX_WEEK_OF).map(RangeExpr::WeekOf)
        } else if caps.name("date").is_some() {
            date_expr(&caps, PREFIX_SINGLE).map(RangeExpr::Single)
        } else if caps.name("to").is_some() {
            let from = date_expr(&caps, PREFIX_FROM)?;
            let to = date_expr(&caps, PREFIX_TO)?;
            Some(RangeExpr::Span(from, to))
        } else {
            None
        }
    }
}

impl Default for Grammar {
    fn default() -> Self {
        Self::new()
    }
}

/// The process-wide grammar, compiled on first use.
pub fn grammar() -> &'static Grammar {
    static GRAMMAR: OnceLock<Grammar> = OnceLock::new();
    GRAMMAR.get_or_init(Grammar::new)
}

/// The DATE sub-grammar with every group name prefixed by `p`.
fn single_date_pattern(p: &str) -> String {
    let weekdays = alternation(WEEKDAY_NAMES.iter().map(|(name, _)| *name));
    let months = alternation(MONTH_NAMES.iter().map(|(name, _)| *name));
    let year = r"(?:[0-9]{2})?[0-9]{2}";

    format!(
        concat!(
            "(?:",
            r"(?P<{p}rel>(?-u:today|tomorrow))",
            r"|(?P<{p}weekday>(?-u:{weekdays}))",
            r"|(?P<{p}long>(?P<{p}long_m>(?-u:{months}))\s+(?P<{p}long_d>[0-9]{{1,2}})(?P<{p}long_s>(?-u:st|nd|rd|th))?(?:\s*,?\s+(?P<{p}long_y>{year}))?)",
            r"|(?P<{p}short>(?P<{p}short_m>[0-9]{{1,2}})/(?P<{p}short_d>[0-9]{{1,2}})(?:/(?P<{p}short_y>{year}))?)",
            ")",
        ),
        p = p,
        weekdays = weekdays,
        months = months,
        year = year,
    )
}

/// Fold the prefixed groups of one DATE position into a [`DateExpr`].
fn date_expr(caps: &Captures<'_>, prefix: &str) -> Option<DateExpr> {
    let group = |name: &str| caps.name(&format!("{prefix}{name}")).map(|m| m.as_str());

    if let Some(rel) = group("rel") {
        return Some(DateExpr::Relative(rel.to_lowercase()));
    }
    if let Some(weekday) = group("weekday") {
        return Some(DateExpr::Weekday(weekday.to_lowercase()));
    }
    if group("long").is_some() {
        let day = day_with_suffix(group("long_d")?, group("long_s"))?;
        let year = match group("long_y") {
            Some(digits) => Some(YearLiteral::from_digits(digits)?),
            None => None,
        };
        return Some(DateExpr::LongForm {
            month: group("long_m")?.to_lowercase(),
            day,
            year,
        });
    }
    if group("short").is_some() {
        let year = match group("short_y") {
            Some(digits) => Some(YearLiteral::from_digits(digits)?),
            None => None,
        };
        return Some(DateExpr::ShortForm {
            month: group("short_m")?.parse().ok()?,
            day: group("short_d")?.parse().ok()?,
            year,
        });
    }
    None
}

/// Parse a day number and check its optional ordinal suffix.
fn day_with_suffix(digits: &str, suffix: Option<&str>) -> Option<u32> {
    let day: u32 = digits.parse().ok()?;
    match suffix {
        Some(s) if !s.eq_ignore_ascii_case(ordinal_suffix(i64::from(day))) => {
            tracing::debug!(day, suffix = s, "ordinal suffix does not fit day");
            None
        }
        _ => Some(day),
    }
}
