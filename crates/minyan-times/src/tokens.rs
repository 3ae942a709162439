//! Static name tables for weekdays and months.
//!
//! The grammar builds its name alternations from these tables, and the
//! resolver maps the matched text back through them, so a name listed here
//! is automatically accepted by both.

use chrono::Weekday;

/// Weekday names and abbreviations accepted in date expressions.
pub const WEEKDAY_NAMES: &[(&str, Weekday)] = &[
    ("sun", Weekday::Sun),
    ("sunday", Weekday::Sun),
    ("mon", Weekday::Mon),
    ("monday", Weekday::Mon),
    ("tue", Weekday::Tue),
    ("tues", Weekday::Tue),
    ("tuesday", Weekday::Tue),
    ("wed", Weekday::Wed),
    ("wednesday", Weekday::Wed),
    ("thu", Weekday::Thu),
    ("thurs", Weekday::Thu),
    ("thursday", Weekday::Thu),
    ("fri", Weekday::Fri),
    ("friday", Weekday::Fri),
    ("sat", Weekday::Sat),
    ("saturday", Weekday::Sat),
    ("shab", Weekday::Sat),
    ("shabbat", Weekday::Sat),
    ("shabbos", Weekday::Sat),
];

/// Month names and abbreviations, mapped to 1-based month numbers.
pub const MONTH_NAMES: &[(&str, u32)] = &[
    ("jan", 1),
    ("january", 1),
    ("feb", 2),
    ("february", 2),
    ("mar", 3),
    ("march", 3),
    ("apr", 4),
    ("april", 4),
    ("may", 5),
    ("jun", 6),
    ("june", 6),
    ("jul", 7),
    ("july", 7),
    ("aug", 8),
    ("august", 8),
    ("sep", 9),
    ("september", 9),
    ("oct", 10),
    ("october", 10),
    ("nov", 11),
    ("november", 11),
    ("dec", 12),
    ("december", 12),
];

/// Look up a weekday name (case-insensitive).
pub fn lookup_weekday(name: &str) -> Option<Weekday> {
    let name = name.to_lowercase();
    WEEKDAY_NAMES
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, weekday)| *weekday)
}

/// Look up a month name (case-insensitive), returning 1-12.
pub fn lookup_month(name: &str) -> Option<u32> {
    let name = name.to_lowercase();
    MONTH_NAMES
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, month)| *month)
}

/// Join table keys into a non-capturing regex alternation.
///
/// Longer names come first so that a full name is preferred over its
/// abbreviation when both could match.
pub(crate) fn alternation<'a>(names: impl Iterator<Item = &'a str>) -> String {
    let mut names: Vec<&str> = names.collect();
    names.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
    let escaped: Vec<String> = names.iter().map(|n| regex::escape(n)).collect();
    format!("(?:{})", escaped.join("|"))
}

/// Ordinal suffix for a day or any other integer ("st", "nd", "rd", "th").
pub fn ordinal_suffix(n: i64) -> &'static str {
    let n = (n % 100).abs();
    if (11..=13).contains(&n) {
        return "th";
    }
    match n % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}
