//! Error types shared across punchclock crates

use thiserror::Error;

/// Errors raised by the shared helpers
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UtilError {
    #[error("Invalid time zone '{value}': expected 'UTC', an offset like '+01:00' or a zone name like 'Europe/Berlin'")]
    InvalidTimeZone { value: String },

    #[error("Timestamp out of range: {0}")]
    TimestampOutOfRange(i64),
}

pub type Result<T> = std::result::Result<T, UtilError>;
