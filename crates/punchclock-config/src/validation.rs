//! Configuration validation

use crate::schema::RawConfig;
use punchclock_util::parse_time_zone;
use thiserror::Error;

/// Longest poll the Bot API accepts
const MAX_POLL_TIMEOUT_SECONDS: u64 = 50;

/// Validation error
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("bot.token cannot be empty")]
    EmptyToken,

    #[error("Invalid URL in {field}: '{value}'")]
    InvalidUrl { field: &'static str, value: String },

    #[error("bot.poll_timeout_seconds must be at most {max}, got {value}")]
    PollTimeoutTooLong { value: u64, max: u64 },

    #[error("work.daily_quota_hours must be within (0, 24], got {0}")]
    InvalidQuota(f64),

    #[error("Invalid time zone '{0}'")]
    InvalidTimeZone(String),
}

/// Validate a raw configuration
pub fn validate_config(config: &RawConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Some(token) = &config.bot.token
        && token.trim().is_empty()
    {
        errors.push(ValidationError::EmptyToken);
    }

    if let Some(url) = &config.bot.api_url
        && !is_http_url(url)
    {
        errors.push(ValidationError::InvalidUrl {
            field: "bot.api_url",
            value: url.clone(),
        });
    }

    if let Some(timeout) = config.bot.poll_timeout_seconds
        && timeout > MAX_POLL_TIMEOUT_SECONDS
    {
        errors.push(ValidationError::PollTimeoutTooLong {
            value: timeout,
            max: MAX_POLL_TIMEOUT_SECONDS,
        });
    }

    if let Some(quota) = config.work.daily_quota_hours
        && !(quota.is_finite() && quota > 0.0 && quota <= 24.0)
    {
        errors.push(ValidationError::InvalidQuota(quota));
    }

    if let Some(zone) = &config.work.timezone
        && parse_time_zone(zone).is_err()
    {
        errors.push(ValidationError::InvalidTimeZone(zone.clone()));
    }

    if let Some(url) = &config.alerts.webhook_url
        && !is_http_url(url)
    {
        errors.push(ValidationError::InvalidUrl {
            field: "alerts.webhook_url",
            value: url.clone(),
        });
    }

    errors
}

fn is_http_url(value: &str) -> bool {
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"));
    matches!(rest, Some(host) if !host.is_empty())
}
