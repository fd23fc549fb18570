//! Recording delivery and notifier fakes.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::DeliveryError;
use crate::port::{ChatId, Delivery, InboundMessage, InboundUpdate, Notifier, ParseMode};

/// One outbound call observed by [`RecordingDelivery`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Text {
        chat: ChatId,
        text: String,
        mode: Option<ParseMode>,
    },
    Photo {
        chat: ChatId,
        url: String,
        caption: Option<String>,
        mode: Option<ParseMode>,
    },
}

impl Sent {
    /// Message text or photo caption.
    pub fn text(&self) -> &str {
        match self {
            Self::Text { text, .. } => text,
            Self::Photo { caption, .. } => caption.as_deref().unwrap_or_default(),
        }
    }
}

/// A delivery provider with scripted poll results that records every send.
///
/// Once the poll script is exhausted, `poll_updates` returns a
/// [`DeliveryError::Rejected`] so dispatcher loops terminate in tests.
#[derive(Default)]
pub struct RecordingDelivery {
    polls: Mutex<VecDeque<Result<Vec<InboundUpdate>, DeliveryError>>>,
    offsets: Mutex<Vec<i64>>,
    sent: Mutex<Vec<Sent>>,
    fail_sends: Mutex<bool>,
}

impl RecordingDelivery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one poll result.
    pub fn with_poll(self, result: Result<Vec<InboundUpdate>, DeliveryError>) -> Self {
        self.polls.lock().expect("lock polls").push_back(result);
        self
    }

    /// Make every subsequent send fail with a rejection.
    pub fn fail_sends(&self, fail: bool) {
        *self.fail_sends.lock().expect("lock fail flag") = fail;
    }

    /// Offsets passed to `poll_updates`, in call order.
    pub fn offsets(&self) -> Vec<i64> {
        self.offsets.lock().expect("lock offsets").clone()
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().expect("lock sent").clone()
    }

    fn send(&self, message: Sent) -> Result<(), DeliveryError> {
        if *self.fail_sends.lock().expect("lock fail flag") {
            return Err(DeliveryError::Rejected("sends disabled".to_string()));
        }
        self.sent.lock().expect("lock sent").push(message);
        Ok(())
    }
}

#[async_trait]
impl Delivery for RecordingDelivery {
    async fn poll_updates(
        &self,
        offset: i64,
        _timeout: Duration,
    ) -> Result<Vec<InboundUpdate>, DeliveryError> {
        self.offsets.lock().expect("lock offsets").push(offset);
        self.polls
            .lock()
            .expect("lock polls")
            .pop_front()
            .unwrap_or_else(|| Err(DeliveryError::Rejected("poll script exhausted".to_string())))
    }

    async fn send_text(
        &self,
        chat: ChatId,
        text: &str,
        mode: Option<ParseMode>,
    ) -> Result<(), DeliveryError> {
        self.send(Sent::Text {
            chat,
            text: text.to_string(),
            mode,
        })
    }

    async fn send_photo(
        &self,
        chat: ChatId,
        url: &str,
        caption: Option<&str>,
        mode: Option<ParseMode>,
    ) -> Result<(), DeliveryError> {
        self.send(Sent::Photo {
            chat,
            url: url.to_string(),
            caption: caption.map(str::to_string),
            mode,
        })
    }
}

/// Text update from `chat`.
pub fn text_update(id: i64, chat: i64, text: &str) -> InboundUpdate {
    InboundUpdate {
        id,
        message: Some(InboundMessage {
            chat: ChatId(chat),
            text: Some(text.to_string()),
        }),
    }
}

/// Update without a message payload (edited message, callback, ...).
pub fn empty_update(id: i64) -> InboundUpdate {
    InboundUpdate { id, message: None }
}

/// Notifier that collects lines, optionally failing every call.
#[derive(Default)]
pub struct RecordingNotifier {
    lines: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            lines: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().expect("lock notifier lines").clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn accept(&self, text: &str) -> Result<(), DeliveryError> {
        self.lines
            .lock()
            .expect("lock notifier lines")
            .push(text.to_string());
        if self.fail {
            return Err(DeliveryError::Transport("notifier offline".to_string()));
        }
        Ok(())
    }
}
