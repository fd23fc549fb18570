//! Monitor notification sinks.
//!
//! Implements the [`Notifier`] port for the console and for a chat
//! reached through a [`Delivery`] provider.

use std::io::{self, Write};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::DeliveryError;
use crate::port::{ChatId, Delivery, Notifier};

/// Writes each line to a local stream, stdout by default.
pub struct ConsoleNotifier<W = io::Stdout> {
    out: Mutex<W>,
}

impl ConsoleNotifier {
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> ConsoleNotifier<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Consume the notifier and return the stream.
    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

#[async_trait]
impl<W: Write + Send> Notifier for ConsoleNotifier<W> {
    async fn accept(&self, text: &str) -> Result<(), DeliveryError> {
        let mut out = self.out.lock();
        writeln!(out, "{text}")
            .and_then(|()| out.flush())
            .map_err(|e| DeliveryError::Transport(e.to_string()))
    }
}

/// Sends each line as plain text to a fixed chat.
pub struct DeliveryNotifier {
    delivery: Arc<dyn Delivery>,
    chat: ChatId,
}

impl DeliveryNotifier {
    #[must_use]
    pub fn new(delivery: Arc<dyn Delivery>, chat: ChatId) -> Self {
        Self { delivery, chat }
    }
}

#[async_trait]
impl Notifier for DeliveryNotifier {
    async fn accept(&self, text: &str) -> Result<(), DeliveryError> {
        self.delivery.send_text(self.chat, text, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::delivery::{RecordingDelivery, Sent};

    #[tokio::test]
    async fn console_writes_one_line_per_message() {
        let notifier = ConsoleNotifier::new(Vec::new());
        notifier.accept("first").await.unwrap();
        notifier.accept("second").await.unwrap();
        assert_eq!(notifier.into_inner(), b"first\nsecond\n");
    }

    #[tokio::test]
    async fn delivery_sends_plain_text_to_target_chat() {
        let delivery = Arc::new(RecordingDelivery::new());
        let notifier = DeliveryNotifier::new(delivery.clone(), ChatId(-100));
        notifier.accept("New match: x").await.unwrap();
        assert_eq!(
            delivery.sent(),
            vec![Sent::Text {
                chat: ChatId(-100),
                text: "New match: x".to_string(),
                mode: None,
            }]
        );
    }

    #[tokio::test]
    async fn delivery_failures_are_returned() {
        let delivery = Arc::new(RecordingDelivery::new());
        delivery.fail_sends(true);
        let notifier = DeliveryNotifier::new(delivery, ChatId(1));
        assert!(notifier.accept("x").await.is_err());
    }
}
