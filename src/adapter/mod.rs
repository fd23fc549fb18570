//! Implementations of ports (hexagonal adapters).

pub mod notifier;
pub mod opendota;
pub mod telegram;
