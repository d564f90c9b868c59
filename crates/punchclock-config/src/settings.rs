//! Validated settings structures

use crate::schema::{RawAlertsConfig, RawBotConfig, RawConfig, RawServiceConfig, RawWorkConfig};
use crate::validation::ValidationError;
use punchclock_util::{data_dir_without_env, parse_time_zone, ChatId, WorkZone};
use std::path::PathBuf;
use std::time::Duration;

/// Expected work hours per session when not configured
pub const DEFAULT_DAILY_QUOTA_HOURS: f64 = 9.0;

/// Bot API endpoint when not configured
pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

const DEFAULT_POLL_TIMEOUT_SECONDS: u64 = 30;

/// Validated settings, read once at startup
#[derive(Debug, Clone)]
pub struct Settings {
    pub bot: BotSettings,
    pub work: WorkSettings,
    pub service: ServiceSettings,
    pub alerts: AlertSettings,
}

impl Settings {
    /// Convert from raw config (after validation)
    pub fn from_raw(raw: RawConfig) -> Result<Self, ValidationError> {
        Ok(Self {
            bot: BotSettings::from_raw(raw.bot),
            work: WorkSettings::from_raw(raw.work)?,
            service: ServiceSettings::from_raw(raw.service),
            alerts: AlertSettings::from_raw(raw.alerts),
        })
    }
}

#[derive(Debug, Clone)]
pub struct BotSettings {
    pub token: Option<String>,
    pub authorized_chat_id: ChatId,
    pub api_url: String,
    pub poll_timeout: Duration,
}

impl BotSettings {
    fn from_raw(raw: RawBotConfig) -> Self {
        Self {
            token: raw.token,
            authorized_chat_id: ChatId::new(raw.authorized_chat_id),
            api_url: raw
                .api_url
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            poll_timeout: Duration::from_secs(
                raw.poll_timeout_seconds
                    .unwrap_or(DEFAULT_POLL_TIMEOUT_SECONDS),
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WorkSettings {
    pub daily_quota_hours: f64,
    /// The zone all timestamps are expressed in
    pub zone: WorkZone,
}

impl WorkSettings {
    fn from_raw(raw: RawWorkConfig) -> Result<Self, ValidationError> {
        let zone = match raw.timezone {
            Some(value) => {
                parse_time_zone(&value).map_err(|_| ValidationError::InvalidTimeZone(value))?
            }
            None => WorkZone::utc(),
        };

        Ok(Self {
            daily_quota_hours: raw.daily_quota_hours.unwrap_or(DEFAULT_DAILY_QUOTA_HOURS),
            zone,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub data_dir: PathBuf,
}

impl ServiceSettings {
    fn from_raw(raw: RawServiceConfig) -> Self {
        Self {
            data_dir: raw.data_dir.unwrap_or_else(data_dir_without_env),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AlertSettings {
    pub webhook_url: Option<String>,
}

impl AlertSettings {
    fn from_raw(raw: RawAlertsConfig) -> Self {
        Self {
            webhook_url: raw.webhook_url,
        }
    }
}
