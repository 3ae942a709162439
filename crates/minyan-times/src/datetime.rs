//! Wall-clock helpers for turning calendar dates into instants.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

const DST_GAP_HOURS: i64 = 1;

/// Interpret a local wall-clock time in `tz`.
///
/// Ambiguous times (DST fall-back) resolve to the earlier instant. Times
/// that do not exist (DST spring-forward) move forward by the length of the
/// gap, so midnight in a zone that skips midnight stays on the same date.
pub fn local_datetime<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    if let Some(dt) = tz.from_local_datetime(&naive).earliest() {
        return dt;
    }
    // Gaps longer than an hour fall back to the UTC reading.
    tz.from_local_datetime(&(naive + Duration::hours(DST_GAP_HOURS)))
        .earliest()
        .unwrap_or_else(|| Utc.from_utc_datetime(&naive).with_timezone(tz))
}

/// 00:00:00 of `date` in `tz`.
pub fn start_of_date<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Tz> {
    local_datetime(tz, date.and_time(NaiveTime::MIN))
}

/// 23:59:59 of `date` in `tz`.
pub fn end_of_date<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Tz> {
    let last_second = NaiveTime::from_hms_opt(23, 59, 59).expect("23:59:59 must exist in NaiveTime");
    local_datetime(tz, date.and_time(last_second))
}

/// One second before the start of the day seven days after `date`.
pub fn end_of_week_from<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Tz> {
    start_of_date(tz, date + Duration::days(7)) - Duration::seconds(1)
}
