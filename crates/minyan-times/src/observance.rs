//! Pairing candle-lighting and havdalah times into observance periods.
//!
//! An observance (Shabbat or Yom Tov) opens at candle-lighting and closes at
//! havdalah. Given a sorted stream of both kinds of boundary, [`find_pair`]
//! returns the period that either contains the reference instant or is the
//! next one to start. Scheduled notifications are held back while a period
//! is in progress.
//!
//! Boundaries are matched greedily: the first open starts a period, later
//! opens are ignored until a close ends it, and closes with nothing open are
//! dropped. Multi-day holidays that carry an extra candle-lighting on the
//! second evening therefore collapse into one period.

use std::cmp::Ordering;

use chrono::{DateTime, Duration};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TimesError};
use crate::source::{LiturgicalEventSource, TimeWindow};

/// How far either side of the reference [`current_or_upcoming`] looks first.
pub const LOOKUP_DAYS: i64 = 10;

// ── Types ────────────────────────────────────────────────────────────────

/// Which edge of an observance a liturgical event marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryKind {
    /// Candle-lighting: the observance begins.
    Open,
    /// Havdalah: the observance ends.
    Close,
}

/// One candle-lighting or havdalah time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LiturgicalEvent {
    pub kind: BoundaryKind,
    pub instant: DateTime<Tz>,
}

impl LiturgicalEvent {
    pub fn open(instant: DateTime<Tz>) -> Self {
        Self {
            kind: BoundaryKind::Open,
            instant,
        }
    }

    pub fn close(instant: DateTime<Tz>) -> Self {
        Self {
            kind: BoundaryKind::Close,
            instant,
        }
    }
}

impl Ord for LiturgicalEvent {
    /// Chronological, with a close sorting before an open at the same instant
    /// so that back-to-back observances are not merged.
    fn cmp(&self, other: &Self) -> Ordering {
        self.instant
            .cmp(&other.instant)
            .then_with(|| kind_rank(self.kind).cmp(&kind_rank(other.kind)))
    }
}

impl PartialOrd for LiturgicalEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn kind_rank(kind: BoundaryKind) -> u8 {
    match kind {
        BoundaryKind::Close => 0,
        BoundaryKind::Open => 1,
    }
}

/// An open/close pair around (or after) a reference instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EnclosingPair {
    pub open: DateTime<Tz>,
    pub close: DateTime<Tz>,
    /// True when the open was at or before the reference, i.e. the
    /// observance is underway.
    pub in_progress: bool,
}

impl EnclosingPair {
    /// True when the pair is the next upcoming observance rather than the
    /// current one.
    pub fn reference_was_before_open(&self) -> bool {
        !self.in_progress
    }
}

// ── Pairing ──────────────────────────────────────────────────────────────

/// Sort events chronologically, closes before opens at equal instants.
pub fn sort_events(events: &mut [LiturgicalEvent]) {
    events.sort();
}

/// Find the observance containing `reference`, or else the next one.
///
/// `events` must already be in [`sort_events`] order.
///
/// # Errors
///
/// Returns [`TimesError::Pairing`] when no close after `reference` pairs
/// with an open.
pub fn find_pair(events: &[LiturgicalEvent], reference: &DateTime<Tz>) -> Result<EnclosingPair> {
    let mut in_past = true;
    let mut active: Option<(DateTime<Tz>, bool)> = None;

    for event in events {
        if event.instant > *reference {
            in_past = false;
        }

        match event.kind {
            BoundaryKind::Open => {
                if active.is_none() {
                    active = Some((event.instant, in_past));
                }
            }
            BoundaryKind::Close => match active {
                None => {
                    tracing::warn!(instant = %event.instant, "skipping close with no open");
                }
                Some((open, open_in_past)) => {
                    if !in_past {
                        return Ok(EnclosingPair {
                            open,
                            close: event.instant,
                            in_progress: open_in_past,
                        });
                    }
                    active = None;
                }
            },
        }
    }

    Err(TimesError::Pairing(format!(
        "no close after {reference} among {} events",
        events.len()
    )))
}

// ── Lookup ───────────────────────────────────────────────────────────────

/// Fetch boundaries around `reference` and pair them.
///
/// Looks [`LOOKUP_DAYS`] days either side first. If that window holds no
/// usable pair the lookup is repeated once with the window doubled.
///
/// # Errors
///
/// Source errors are returned as-is; [`TimesError::Pairing`] is returned
/// when the doubled window still has no pair.
pub fn current_or_upcoming<S>(source: &S, reference: &DateTime<Tz>) -> Result<EnclosingPair>
where
    S: LiturgicalEventSource + ?Sized,
{
    match pair_within(source, reference, LOOKUP_DAYS) {
        Err(TimesError::Pairing(reason)) => {
            tracing::warn!(%reason, days = LOOKUP_DAYS * 2, "widening observance lookup");
            pair_within(source, reference, LOOKUP_DAYS * 2)
        }
        other => other,
    }
}

fn pair_within<S>(source: &S, reference: &DateTime<Tz>, days: i64) -> Result<EnclosingPair>
where
    S: LiturgicalEventSource + ?Sized,
{
    let window = TimeWindow {
        start: *reference - Duration::days(days),
        end: *reference + Duration::days(days),
    };
    let mut events = source.list(&window)?;
    sort_events(&mut events);
    find_pair(&events, reference)
}

/// Whether scheduled notifications should be held back at `now`.
///
/// # Errors
///
/// See [`current_or_upcoming`].
pub fn notifications_suppressed<S>(source: &S, now: &DateTime<Tz>) -> Result<bool>
where
    S: LiturgicalEventSource + ?Sized,
{
    let pair = current_or_upcoming(source, now)?;
    if pair.in_progress {
        tracing::info!(open = %pair.open, close = %pair.close, "observance in progress");
    }
    Ok(pair.in_progress)
}
