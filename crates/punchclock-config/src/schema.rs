//! Raw configuration schema (as parsed from TOML)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw configuration as parsed from TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawConfig {
    /// Config schema version
    pub config_version: u32,

    /// Chat bot settings
    pub bot: RawBotConfig,

    /// Work quota and time zone
    #[serde(default)]
    pub work: RawWorkConfig,

    /// Service-level settings
    #[serde(default)]
    pub service: RawServiceConfig,

    /// Failure alerting
    #[serde(default)]
    pub alerts: RawAlertsConfig,
}

/// Bot settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawBotConfig {
    /// Bot API token (may also come from the command line or environment)
    pub token: Option<String>,

    /// The only chat allowed to use the bot
    pub authorized_chat_id: i64,

    /// Bot API base URL (default: https://api.telegram.org)
    pub api_url: Option<String>,

    /// Long polling timeout
    pub poll_timeout_seconds: Option<u64>,
}

/// Work settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawWorkConfig {
    /// Expected hours per session (default: 9.0)
    pub daily_quota_hours: Option<f64>,

    /// `UTC`, an offset such as `+01:00` or a zone name such as `Europe/Berlin`
    pub timezone: Option<String>,
}

/// Service settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawServiceConfig {
    /// Data directory for the session database
    pub data_dir: Option<PathBuf>,
}

/// Alert settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawAlertsConfig {
    /// Push URL notified when handling an update fails
    pub webhook_url: Option<String>,
}
