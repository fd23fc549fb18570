//! Application configuration loading and validation.
//!
//! Defaults are overridden by an optional TOML file, then by environment
//! variables for the bot secrets (`TELEGRAM_BOT_TOKEN`,
//! `TELEGRAM_NOTIFY_CHAT_ID`), which are never read from the file.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};

use super::monitor::DEFAULT_POLL_INTERVAL;
use super::report::{ReportSettings, TeammateSource};
use crate::adapter::opendota::{DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT};
use crate::adapter::telegram::{
    DEFAULT_MAX_MESSAGE_LEN, DEFAULT_POLL_TIMEOUT, DEFAULT_RETRY_DELAY, MIN_CHUNK_CONTENT,
};
use crate::error::{ConfigError, Result};
use crate::port::ChatId;

pub const BOT_TOKEN_ENV: &str = "TELEGRAM_BOT_TOKEN";
pub const NOTIFY_CHAT_ENV: &str = "TELEGRAM_NOTIFY_CHAT_ID";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub opendota: OpenDotaConfig,
    pub telegram: TelegramConfig,
    pub monitor: MonitorConfig,
    pub report: ReportSettings,
    pub commands: CommandsConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OpenDotaConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
    /// Calls allowed per window across the whole process; `0` disables limiting.
    pub rate_limit: i64,
    pub rate_window_secs: u64,
}

impl Default for OpenDotaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT.as_secs(),
            rate_limit: 60,
            rate_window_secs: 60,
        }
    }
}

impl OpenDotaConfig {
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    #[must_use]
    pub const fn rate_window(&self) -> Duration {
        Duration::from_secs(self.rate_window_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    /// Bot API token; presence selects bot mode.
    #[serde(skip)]
    pub bot_token: Option<String>,
    /// Raw notification chat id as found in the environment.
    #[serde(skip)]
    pub notify_chat_id: Option<String>,
    pub poll_timeout_secs: u64,
    pub retry_delay_secs: u64,
    /// Message cap in Unicode code points.
    pub max_message_len: usize,
    /// Publish the command menu at start-up.
    pub register_commands: bool,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            notify_chat_id: None,
            poll_timeout_secs: DEFAULT_POLL_TIMEOUT.as_secs(),
            retry_delay_secs: DEFAULT_RETRY_DELAY.as_secs(),
            max_message_len: DEFAULT_MAX_MESSAGE_LEN,
            register_commands: true,
        }
    }
}

impl TelegramConfig {
    #[must_use]
    pub const fn poll_timeout(&self) -> Duration {
        Duration::from_secs(self.poll_timeout_secs)
    }

    #[must_use]
    pub const fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }

    /// Parsed notification chat; `Ok(None)` when not configured.
    #[allow(clippy::result_large_err)]
    pub fn notify_chat(&self) -> std::result::Result<Option<ChatId>, ConfigError> {
        let Some(raw) = self.notify_chat_id.as_deref() else {
            return Ok(None);
        };
        raw.parse::<i64>()
            .map(|id| Some(ChatId(id)))
            .map_err(|e| ConfigError::InvalidValue {
                field: NOTIFY_CHAT_ENV,
                reason: format!("`{raw}`: {e}"),
            })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub interval_secs: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_POLL_INTERVAL.as_secs(),
        }
    }
}

impl MonitorConfig {
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct CommandsConfig {
    /// Candidate source of `/friends`.
    pub teammate_source: TeammateSource,
}

impl Config {
    /// Defaults, then the TOML file at `path` if given, then the environment.
    #[allow(clippy::result_large_err)]
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config: Self = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
                toml::from_str(&content).map_err(ConfigError::Parse)?
            }
            None => Self::default(),
        };

        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Fill secrets from `lookup`. Blank values count as absent.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        self.telegram.bot_token = read(BOT_TOKEN_ENV);
        self.telegram.notify_chat_id = read(NOTIFY_CHAT_ENV);
    }

    #[allow(clippy::result_large_err)]
    pub fn validate(&self) -> Result<()> {
        if self.opendota.base_url.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "opendota.base_url" }.into());
        }
        let durations = [
            ("opendota.request_timeout_secs", self.opendota.request_timeout_secs),
            ("telegram.poll_timeout_secs", self.telegram.poll_timeout_secs),
            ("telegram.retry_delay_secs", self.telegram.retry_delay_secs),
            ("monitor.interval_secs", self.monitor.interval_secs),
        ];
        for (field, secs) in durations {
            if secs == 0 {
                return Err(invalid(field, "must be greater than zero"));
            }
        }
        if self.opendota.rate_limit > 0 && self.opendota.rate_window_secs == 0 {
            return Err(invalid(
                "opendota.rate_window_secs",
                "must be greater than zero when rate limiting",
            ));
        }
        if self.telegram.max_message_len < MIN_CHUNK_CONTENT {
            return Err(invalid(
                "telegram.max_message_len",
                format!("must be at least {MIN_CHUNK_CONTENT}"),
            ));
        }
        Ok(())
    }

    /// `true` when a bot token is configured.
    #[must_use]
    pub fn bot_mode(&self) -> bool {
        self.telegram.bot_token.is_some()
    }

    /// Install the global subscriber. Logs go to stderr; `RUST_LOG` wins
    /// over the configured level.
    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.logging.level));

        match self.logging.format {
            LogFormat::Json => {
                fmt()
                    .json()
                    .with_env_filter(filter)
                    .with_writer(std::io::stderr)
                    .init();
            }
            LogFormat::Pretty => {
                fmt()
                    .with_env_filter(filter)
                    .with_writer(std::io::stderr)
                    .init();
            }
        }
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> crate::error::Error {
    ConfigError::InvalidValue {
        field,
        reason: reason.into(),
    }
    .into()
}
