//! Configuration parsing and validation for punchclock
//!
//! Supports TOML configuration with:
//! - Versioned schema
//! - Bot credentials and the single authorized chat
//! - Daily quota and work time zone
//! - Validation with clear error messages

mod schema;
mod settings;
mod validation;

pub use schema::*;
pub use settings::*;
pub use validation::*;

use std::path::Path;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation failed: {errors:?}")]
    ValidationFailed { errors: Vec<ValidationError> },

    #[error("Unsupported config version: {0}")]
    UnsupportedVersion(u32),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Load and validate configuration from a TOML file
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<Settings> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "Loading configuration");
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from a TOML string
pub fn parse_config(content: &str) -> ConfigResult<Settings> {
    let raw: RawConfig = toml::from_str(content)?;

    if raw.config_version != CURRENT_CONFIG_VERSION {
        return Err(ConfigError::UnsupportedVersion(raw.config_version));
    }

    let errors = validate_config(&raw);
    if !errors.is_empty() {
        return Err(ConfigError::ValidationFailed { errors });
    }

    Settings::from_raw(raw).map_err(|e| ConfigError::ValidationFailed { errors: vec![e] })
}

/// Current supported config version
pub const CURRENT_CONFIG_VERSION: u32 = 1;

#[cfg(test)]
mod tests {
    use super::*;
    use punchclock_util::WorkZone;
    use std::io::Write;

    #[test]
    fn parse_minimal_config() {
        let config = r#"
            config_version = 1

            [bot]
            authorized_chat_id = 4242
        "#;

        let settings = parse_config(config).unwrap();
        assert_eq!(settings.bot.authorized_chat_id.as_i64(), 4242);
        assert_eq!(settings.work.daily_quota_hours, DEFAULT_DAILY_QUOTA_HOURS);
        assert_eq!(settings.work.zone, WorkZone::utc());
        assert!(settings.bot.token.is_none());
        assert!(settings.alerts.webhook_url.is_none());
    }

    #[test]
    fn parse_full_config() {
        let config = r#"
            config_version = 1

            [bot]
            token = "123:abc"
            authorized_chat_id = -100777
            api_url = "http://localhost:8081"
            poll_timeout_seconds = 5

            [work]
            daily_quota_hours = 7.5
            timezone = "+02:00"

            [service]
            data_dir = "/var/lib/punchclock"

            [alerts]
            webhook_url = "https://status.example/api/push/abc"
        "#;

        let settings = parse_config(config).unwrap();
        assert_eq!(settings.bot.token.as_deref(), Some("123:abc"));
        assert_eq!(settings.bot.api_url, "http://localhost:8081");
        assert_eq!(settings.bot.poll_timeout.as_secs(), 5);
        assert_eq!(settings.work.daily_quota_hours, 7.5);
        assert_eq!(settings.work.zone.to_string(), "+02:00");
        assert_eq!(
            settings.service.data_dir,
            std::path::PathBuf::from("/var/lib/punchclock")
        );
        assert!(settings.alerts.webhook_url.is_some());
    }

    #[test]
    fn parse_named_time_zone() {
        let config = r#"
            config_version = 1

            [bot]
            authorized_chat_id = 4242

            [work]
            timezone = "Europe/Berlin"
        "#;

        let settings = parse_config(config).unwrap();
        assert_eq!(settings.work.zone.to_string(), "Europe/Berlin");
    }

    #[test]
    fn reject_wrong_version() {
        let config = r#"
            config_version = 99

            [bot]
            authorized_chat_id = 1
        "#;

        let result = parse_config(config);
        assert!(matches!(result, Err(ConfigError::UnsupportedVersion(99))));
    }

    #[test]
    fn reject_invalid_values() {
        let config = r#"
            config_version = 1

            [bot]
            authorized_chat_id = 1
            token = ""

            [work]
            daily_quota_hours = 0.0
            timezone = "Mars/Olympus"
        "#;

        match parse_config(config) {
            Err(ConfigError::ValidationFailed { errors }) => assert_eq!(errors.len(), 3),
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "config_version = 1\n[bot]\nauthorized_chat_id = 9").unwrap();

        let settings = load_config(file.path()).unwrap();
        assert_eq!(settings.bot.authorized_chat_id.as_i64(), 9);
    }
}
