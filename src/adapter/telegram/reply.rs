//! Replies to the chat a command came from.

use std::fmt;

use tracing::warn;

use super::chunk::chunk_report;
use crate::error::DeliveryError;
use crate::port::{ChatId, Delivery, ParseMode};

/// Prefix of error lines sent back to the requesting chat.
pub const ERROR_PREFIX: &str = "Error: ";

/// Sends every part of a reply to one conversation, in order.
pub struct Responder<'a> {
    delivery: &'a dyn Delivery,
    chat: ChatId,
    max_len: usize,
}

impl<'a> Responder<'a> {
    #[must_use]
    pub fn new(delivery: &'a dyn Delivery, chat: ChatId, max_len: usize) -> Self {
        Self {
            delivery,
            chat,
            max_len,
        }
    }

    #[must_use]
    pub const fn chat(&self) -> ChatId {
        self.chat
    }

    /// Escape and chunk `body`, prefixing the first message with the HTML `header`.
    pub async fn report(&self, header: &str, body: &str) -> Result<(), DeliveryError> {
        for chunk in chunk_report(body, header, self.max_len) {
            self.delivery
                .send_text(self.chat, &chunk.render(), Some(ParseMode::Html))
                .await?;
        }
        Ok(())
    }

    /// Photo with an HTML caption.
    pub async fn photo(&self, url: &str, caption: &str) -> Result<(), DeliveryError> {
        self.delivery
            .send_photo(self.chat, url, Some(caption), Some(ParseMode::Html))
            .await
    }

    pub async fn plain(&self, text: &str) -> Result<(), DeliveryError> {
        self.delivery.send_text(self.chat, text, None).await
    }

    /// Best-effort error line. A failed send is logged and swallowed.
    pub async fn error(&self, error: &(dyn fmt::Display + Sync)) {
        let text = format!("{ERROR_PREFIX}{error}");
        if let Err(e) = self.plain(&text).await {
            warn!(chat_id = %self.chat, error = %e, "Failed to deliver error reply");
        }
    }
}
