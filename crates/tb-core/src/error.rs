//! Error types for catalog loading and report windows.

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

/// Errors raised while turning budget file records into a catalog.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CatalogError {
    /// None of `hours`, `minutes` or `seconds` was given.
    #[error(
        "Budget starting {date} for tag {tag} has no defined size. Please fix or remove it."
    )]
    MissingSize { tag: String, date: NaiveDate },

    /// A size field was negative, NaN or infinite.
    #[error("Budget starting {date} for tag {tag} has an invalid {field} value: {value}")]
    InvalidSize {
        tag: String,
        date: NaiveDate,
        field: &'static str,
        value: f64,
    },

    /// An `exclude` entry was not a weekday ordinal.
    #[error(
        "Budget starting {date} for tag {tag} excludes weekday {value}, expected 0 (Monday) to 6 (Sunday)"
    )]
    InvalidWeekday {
        tag: String,
        date: NaiveDate,
        value: i64,
    },
}

/// Errors raised when validating a report window.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WindowError {
    /// The window ends at or before its start.
    #[error("report end {end} is not after report start {start}")]
    EndNotAfterStart {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// The window does not cross a single date boundary.
    #[error("Budget report does not support a duration smaller than one day.")]
    ShorterThanOneDay,
}

/// Error for timestamps in neither Timewarrior nor RFC 3339 format.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid timestamp: {0:?}")]
pub struct TimestampError(pub String);
