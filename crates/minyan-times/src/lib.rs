//! # minyan-times
//!
//! Natural-language date commands and observance tracking for a minyan
//! schedule bot.
//!
//! The crate turns chat commands like `!times friday to monday` into concrete
//! time windows, and pairs candle-lighting with havdalah times to tell
//! whether Shabbat or Yom Tov is in progress. Every function takes the
//! current instant explicitly, so results are deterministic.
//!
//! ## Modules
//!
//! - [`tokens`] — Weekday and month name tables
//! - [`grammar`] — The date/range expression grammar
//! - [`resolve`] — Single date expression → calendar date
//! - [`command`] — Range expression → `TimeRangeCommand`
//! - [`chat`] — `!times` / `!help` parsing
//! - [`observance`] — Candle-lighting/havdalah pairing
//! - [`source`] — Collaborator traits and calendar queries
//! - [`listing`] — Reply formatting
//! - [`datetime`] — Local wall-clock helpers
//! - [`error`] — Error types

pub mod chat;
pub mod command;
pub mod datetime;
pub mod error;
pub mod grammar;
pub mod listing;
pub mod observance;
pub mod resolve;
pub mod source;
pub mod tokens;

pub use chat::{normalize_input, parse_chat_command, parse_times_command, ChatCommand, HELP_TEXT};
pub use command::{build, upcoming, TimeRangeCommand};
pub use error::{ErrorCategory, TimesError};
pub use grammar::{grammar, DateExpr, Grammar, RangeExpr, YearLiteral};
pub use listing::format_listing;
pub use observance::{
    current_or_upcoming, find_pair, notifications_suppressed, sort_events, BoundaryKind,
    EnclosingPair, LiturgicalEvent,
};
pub use resolve::{days_in_month, make_date, resolve, DateKind, ResolvedDate};
pub use source::{
    collect_times, CalendarEvent, EventSource, LiturgicalEventSource, MessageSink, TimeWindow,
    ELAPSED_GRACE_MINUTES,
};
