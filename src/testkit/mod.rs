//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`provider`] - In-memory [`StatsProvider`](crate::port::StatsProvider)
//!   with scripted feeds and injectable failures.
//! - [`delivery`] - Recording [`Delivery`](crate::port::Delivery) and
//!   [`Notifier`](crate::port::Notifier) implementations.
//! - [`domain`] - Builders for match records and account ids.

pub mod delivery;
pub mod domain;
pub mod provider;
