//! Time utilities for punchclock
//!
//! All timestamps are expressed in one configured work zone: either a
//! fixed UTC offset or an IANA zone name. Hours are carried as `f64`
//! because the time budget is a signed, fractional sum.

use chrono::{
    DateTime, FixedOffset, NaiveDateTime, Offset, TimeDelta, TimeZone, Utc,
};
use chrono_tz::Tz;
use std::fmt;
use std::str::FromStr;

use crate::{Result, UtilError};

const SECONDS_PER_HOUR: f64 = 3600.0;

/// The zone the user's work day is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkZone {
    /// A constant offset such as `+01:00`
    Fixed(FixedOffset),
    /// An IANA zone such as `Europe/Berlin`, offset resolved per instant
    Named(Tz),
}

impl WorkZone {
    pub fn utc() -> Self {
        WorkZone::Fixed(Utc.fix())
    }

    /// The instant as wall-clock time, with the offset in effect at that instant.
    pub fn at(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        match self {
            WorkZone::Fixed(offset) => instant.with_timezone(offset),
            WorkZone::Named(tz) => instant.with_timezone(tz).fixed_offset(),
        }
    }

    /// Interpret a zoneless wall-clock time in this zone.
    ///
    /// Ambiguous times (clocks turned back) resolve to the earlier instant.
    /// Times skipped by a DST jump are moved forward by an hour.
    pub fn localize(&self, naive: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        match self {
            WorkZone::Fixed(offset) => offset.from_local_datetime(&naive).single(),
            WorkZone::Named(tz) => tz
                .from_local_datetime(&naive)
                .earliest()
                .or_else(|| {
                    tz.from_local_datetime(&(naive + TimeDelta::hours(1)))
                        .earliest()
                })
                .map(|dt| dt.fixed_offset()),
        }
    }
}

impl Default for WorkZone {
    fn default() -> Self {
        Self::utc()
    }
}

impl fmt::Display for WorkZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkZone::Fixed(offset) => write!(f, "{}", offset),
            WorkZone::Named(tz) => f.write_str(tz.name()),
        }
    }
}

impl FromStr for WorkZone {
    type Err = UtilError;

    fn from_str(s: &str) -> Result<Self> {
        parse_time_zone(s)
    }
}

/// Parse a work zone: `UTC`, an offset like `+01:00` or `-0530`, or an
/// IANA name like `Europe/Berlin`.
pub fn parse_time_zone(value: &str) -> Result<WorkZone> {
    let trimmed = value.trim();

    if trimmed.eq_ignore_ascii_case("utc") || trimmed.eq_ignore_ascii_case("z") {
        return Ok(WorkZone::utc());
    }

    if trimmed.starts_with(['+', '-']) {
        return trimmed
            .parse::<FixedOffset>()
            .map(WorkZone::Fixed)
            .map_err(|_| UtilError::InvalidTimeZone {
                value: value.to_string(),
            });
    }

    trimmed
        .parse::<Tz>()
        .map(WorkZone::Named)
        .map_err(|_| UtilError::InvalidTimeZone {
            value: value.to_string(),
        })
}

/// Current time in the given zone.
#[allow(clippy::disallowed_methods)] // Single wrapper around the system clock
pub fn now_in(zone: &WorkZone) -> DateTime<FixedOffset> {
    zone.at(Utc::now())
}

/// Convert unix seconds (as sent by chat transports) into the given zone.
pub fn from_unix_seconds(secs: i64, zone: &WorkZone) -> Result<DateTime<FixedOffset>> {
    DateTime::from_timestamp(secs, 0)
        .map(|dt| zone.at(dt))
        .ok_or(UtilError::TimestampOutOfRange(secs))
}

/// Signed duration as fractional hours
pub fn duration_hours(duration: TimeDelta) -> f64 {
    duration_seconds(duration) / SECONDS_PER_HOUR
}

/// Signed duration as fractional seconds
pub fn duration_seconds(duration: TimeDelta) -> f64 {
    match duration.num_microseconds() {
        Some(micros) => micros as f64 / 1_000_000.0,
        None => duration.num_seconds() as f64,
    }
}

/// Fractional seconds as a signed duration, rounded to milliseconds.
pub fn seconds_to_duration(seconds: f64) -> TimeDelta {
    if !seconds.is_finite() {
        return TimeDelta::zero();
    }
    TimeDelta::try_milliseconds((seconds * 1000.0).round() as i64).unwrap_or(TimeDelta::zero())
}

/// Format signed hours as `+HH:MM` / `-HH:MM`, rounded to the minute.
pub fn format_hours_clock(hours: f64) -> String {
    if !hours.is_finite() {
        return "--:--".to_string();
    }
    let total_minutes = (hours * 60.0).round() as i64;
    let sign = if total_minutes < 0 { '-' } else { '+' };
    let total_minutes = total_minutes.abs();
    format!("{}{:02}:{:02}", sign, total_minutes / 60, total_minutes % 60)
}

/// Format a DateTime for display with full date and time.
pub fn format_datetime_full(dt: &DateTime<FixedOffset>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Format a DateTime as a time of day.
pub fn format_clock_time(dt: &DateTime<FixedOffset>) -> String {
    dt.format("%H:%M:%S").to_string()
}
