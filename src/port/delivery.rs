//! Chat delivery provider port.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::DeliveryError;

/// Conversation identifier. Group chats are negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Markup mode for outbound text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    Html,
}

/// One item of the inbound update stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundUpdate {
    /// Monotonic sequence number assigned by the provider.
    pub id: i64,
    pub message: Option<InboundMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub chat: ChatId,
    pub text: Option<String>,
}

/// Long-poll inbound, send-text and send-photo capability of a chat provider.
#[async_trait]
pub trait Delivery: Send + Sync {
    /// Block server-side for up to `timeout` waiting for updates with
    /// id `>= offset`.
    async fn poll_updates(
        &self,
        offset: i64,
        timeout: Duration,
    ) -> Result<Vec<InboundUpdate>, DeliveryError>;

    async fn send_text(
        &self,
        chat: ChatId,
        text: &str,
        mode: Option<ParseMode>,
    ) -> Result<(), DeliveryError>;

    async fn send_photo(
        &self,
        chat: ChatId,
        url: &str,
        caption: Option<&str>,
        mode: Option<ParseMode>,
    ) -> Result<(), DeliveryError>;
}
