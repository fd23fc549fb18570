//! Application layer - configuration, reporting, monitoring and run modes.

mod config;
pub mod format;
mod monitor;
mod orchestrator;
mod report;
mod roster;

pub use config::{
    CommandsConfig, Config, LogFormat, LoggingConfig, MonitorConfig, OpenDotaConfig,
    TelegramConfig, BOT_TOKEN_ENV, NOTIFY_CHAT_ENV,
};
pub use monitor::{ChangeMonitor, CycleReport, Watermarks, DEFAULT_POLL_INTERVAL};
pub use orchestrator::{App, RunOptions, Services};
pub use report::{
    best_teammates, console_report, leaderboard, player_report, PlayerReport, ReportSettings,
    TeammateSource, PEER_CANDIDATES, RECENT_FEED_LEN,
};
pub use roster::Roster;
