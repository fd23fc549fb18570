//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! ```text
//!                 ┌──────────────────────────────┐
//!                 │  monitor / dispatcher / app  │
//!                 └──────────────┬───────────────┘
//!        ┌───────────────────────┼───────────────────────┐
//!        ▼                       ▼                       ▼
//! ┌──────────────┐        ┌─────────────┐         ┌────────────┐
//! │StatsProvider │        │  Delivery   │         │  Notifier  │
//! │  (OpenDota)  │        │ (Telegram)  │         │ (sink)     │
//! └──────────────┘        └─────────────┘         └────────────┘
//! ```
//!
//! - [`StatsProvider`] - upstream match/profile/peer queries
//! - [`Delivery`] - inbound long-poll and outbound chat messages
//! - [`Notifier`] - single-line sink for new-match notifications

mod delivery;
mod notifier;
mod provider;

pub use delivery::{ChatId, Delivery, InboundMessage, InboundUpdate, ParseMode};
pub use notifier::Notifier;
pub use provider::StatsProvider;
