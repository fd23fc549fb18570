//! New-match notification sink.

use async_trait::async_trait;

use crate::error::DeliveryError;

/// Receives one formatted line per new match.
///
/// The monitor treats failures as best effort: they are logged and the
/// cycle continues.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn accept(&self, text: &str) -> Result<(), DeliveryError>;
}
