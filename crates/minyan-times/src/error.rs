//! Error types for minyan-times operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimesError {
    #[error("Unparseable command: {0}")]
    Parse(String),

    #[error("Invalid date: {month}/{day}/{year}")]
    InvalidDate { year: i32, month: u32, day: u32 },

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Unknown token: {0}")]
    Lookup(String),

    #[error("Source error: {0}")]
    Source(String),

    #[error("No enclosing period: {0}")]
    Pairing(String),
}

/// Coarse grouping of [`TimesError`] variants, used to decide who gets told.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// No grammar alternative matched the input.
    Parse,
    /// The input matched but does not name a real calendar date or range.
    Resolution,
    /// A token matched the grammar but is missing from the lookup tables.
    Lookup,
    /// An external event source failed.
    Source,
    /// No enclosing or upcoming period was found in the supplied events.
    Pairing,
}

impl TimesError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            TimesError::Parse(_) => ErrorCategory::Parse,
            TimesError::InvalidDate { .. } | TimesError::InvalidRange(_) => {
                ErrorCategory::Resolution
            }
            TimesError::Lookup(_) => ErrorCategory::Lookup,
            TimesError::Source(_) => ErrorCategory::Source,
            TimesError::Pairing(_) => ErrorCategory::Pairing,
        }
    }

    /// The message shown to the person who sent the command.
    ///
    /// The detailed `Display` form is meant for the operator log.
    pub fn user_message(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Parse | ErrorCategory::Resolution | ErrorCategory::Lookup => {
                "Could not understand that date"
            }
            ErrorCategory::Source => "There was an error retrieving the minyan times",
            ErrorCategory::Pairing => "Could not determine the holiday schedule",
        }
    }
}

pub type Result<T> = std::result::Result<T, TimesError>;
