//! Long-poll command loop.
//!
//! The offset moves past every update as soon as it is received, before the
//! update is processed. A crash mid-command therefore loses that command
//! instead of running it twice.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::chunk::DEFAULT_MAX_MESSAGE_LEN;
use super::command::CommandRegistry;
use super::handlers::CommandContext;
use super::reply::Responder;
use crate::error::DeliveryError;
use crate::port::{Delivery, InboundUpdate};

pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Long-poll and reply tunables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSettings {
    pub poll_timeout: Duration,
    pub retry_delay: Duration,
    pub max_message_len: usize,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            poll_timeout: DEFAULT_POLL_TIMEOUT,
            retry_delay: DEFAULT_RETRY_DELAY,
            max_message_len: DEFAULT_MAX_MESSAGE_LEN,
        }
    }
}

pub struct Dispatcher {
    delivery: Arc<dyn Delivery>,
    registry: CommandRegistry,
    context: CommandContext,
    settings: DispatchSettings,
    offset: i64,
}

impl Dispatcher {
    #[must_use]
    pub fn new(
        delivery: Arc<dyn Delivery>,
        registry: CommandRegistry,
        context: CommandContext,
        settings: DispatchSettings,
    ) -> Self {
        Self {
            delivery,
            registry,
            context,
            settings,
            offset: 0,
        }
    }

    /// Next update id the provider will be asked for.
    #[must_use]
    pub const fn offset(&self) -> i64 {
        self.offset
    }

    /// Serve commands until a delivery failure that cannot be retried.
    ///
    /// Transport failures of the long-poll are retried forever after a fixed
    /// delay. Any other poll failure and any failed reply end the loop.
    pub async fn run(&mut self) -> Result<(), DeliveryError> {
        info!(
            commands = self.registry.len(),
            poll_timeout_secs = self.settings.poll_timeout.as_secs(),
            "Command dispatcher started"
        );
        loop {
            match self
                .delivery
                .poll_updates(self.offset, self.settings.poll_timeout)
                .await
            {
                Ok(batch) => self.process_batch(batch).await?,
                Err(e) if e.is_transport() => {
                    warn!(offset = self.offset, error = %e, "Long-poll failed, retrying");
                    tokio::time::sleep(self.settings.retry_delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Handle one batch in arrival order.
    pub async fn process_batch(&mut self, batch: Vec<InboundUpdate>) -> Result<(), DeliveryError> {
        for update in batch {
            self.handle_update(update).await?;
        }
        Ok(())
    }

    pub async fn handle_update(&mut self, update: InboundUpdate) -> Result<(), DeliveryError> {
        self.offset = self.offset.max(update.id + 1);

        let Some(message) = update.message else {
            return Ok(());
        };
        let Some(text) = message.text.as_deref().map(str::trim) else {
            return Ok(());
        };
        let Some((command, args)) = self.registry.route(text) else {
            debug!(update_id = update.id, chat_id = %message.chat, "Ignoring non-command message");
            return Ok(());
        };

        info!(
            update_id = update.id,
            chat_id = %message.chat,
            command = command.name(),
            "Handling command"
        );
        let reply = Responder::new(
            self.delivery.as_ref(),
            message.chat,
            self.settings.max_message_len,
        );
        command.handler().handle(&self.context, &args, &reply).await
    }
}
