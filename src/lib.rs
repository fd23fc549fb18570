//! Easykatka - OpenDota roster tracker with a Telegram bot.
//!
//! Tracks a fixed roster of Dota 2 accounts, prints or serves their recent
//! matches and aggregate statistics, and announces newly played matches.
//!
//! # Architecture
//!
//! - [`domain`] - Account ids, match records, hero catalog, win-rate math
//! - [`port`] - Capability traits: statistics provider, chat delivery, notifier
//! - [`adapter`] - OpenDota client and rate limiter, Telegram delivery,
//!   message chunking, command registry and dispatcher, notification sinks
//! - [`app`] - Configuration, roster loading, report formatting, the change
//!   monitor and the run modes
//! - [`error`] - Error types for the crate
//!
//! # Features
//!
//! - `telegram` (default) - Bot API delivery via teloxide
//! - `testkit` - In-memory fakes for the ports

pub mod adapter;
pub mod app;
pub mod domain;
pub mod error;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
