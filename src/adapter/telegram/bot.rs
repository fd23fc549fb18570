//! Telegram Bot API delivery.
//!
//! Requires the `telegram` feature to be enabled.

use std::time::Duration;

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{BotCommand, ChatId as TgChatId, InputFile, ParseMode as TgParseMode, UpdateKind};
use teloxide::RequestError;
use tracing::{info, warn};

use crate::error::DeliveryError;
use crate::port::{ChatId, Delivery, InboundMessage, InboundUpdate, ParseMode};

/// HTTP headroom on top of the long-poll timeout.
const CLIENT_TIMEOUT_SLACK: Duration = Duration::from_secs(15);

/// [`Delivery`] over the Telegram Bot API.
#[derive(Clone)]
pub struct TelegramDelivery {
    bot: Bot,
}

impl TelegramDelivery {
    /// Build a bot whose HTTP timeout outlasts `poll_timeout`.
    #[must_use]
    pub fn new(token: &str, poll_timeout: Duration) -> Self {
        let bot = match teloxide::net::default_reqwest_settings()
            .timeout(poll_timeout + CLIENT_TIMEOUT_SLACK)
            .build()
        {
            Ok(client) => Bot::with_client(token, client),
            Err(e) => {
                warn!(error = %e, "Failed to build Telegram HTTP client, using defaults");
                Bot::new(token)
            }
        };
        Self { bot }
    }

    /// Publish `(name, description)` pairs as the bot's command menu.
    pub async fn register_commands(&self, commands: &[(&str, &str)]) -> Result<(), DeliveryError> {
        let commands: Vec<BotCommand> = commands
            .iter()
            .map(|(name, description)| BotCommand::new(*name, *description))
            .collect();
        self.bot.set_my_commands(commands).await.map_err(map_error)?;
        info!("Registered bot commands with Telegram");
        Ok(())
    }
}

fn map_error(error: RequestError) -> DeliveryError {
    match error {
        RequestError::Network(_) | RequestError::Io(_) => DeliveryError::Transport(error.to_string()),
        other => DeliveryError::Rejected(other.to_string()),
    }
}

const fn parse_mode(mode: ParseMode) -> TgParseMode {
    match mode {
        ParseMode::Html => TgParseMode::Html,
    }
}

#[async_trait]
impl Delivery for TelegramDelivery {
    async fn poll_updates(
        &self,
        offset: i64,
        timeout: Duration,
    ) -> Result<Vec<InboundUpdate>, DeliveryError> {
        let timeout = u32::try_from(timeout.as_secs()).unwrap_or(u32::MAX);
        let updates = self
            .bot
            .get_updates()
            .offset(i32::try_from(offset).unwrap_or(i32::MAX))
            .timeout(timeout)
            .await
            .map_err(map_error)?;

        Ok(updates
            .into_iter()
            .map(|update| {
                let message = match &update.kind {
                    UpdateKind::Message(msg) => Some(InboundMessage {
                        chat: ChatId(msg.chat.id.0),
                        text: msg.text().map(str::to_string),
                    }),
                    _ => None,
                };
                InboundUpdate {
                    id: i64::from(update.id.0),
                    message,
                }
            })
            .collect())
    }

    async fn send_text(
        &self,
        chat: ChatId,
        text: &str,
        mode: Option<ParseMode>,
    ) -> Result<(), DeliveryError> {
        let mut request = self.bot.send_message(TgChatId(chat.0), text);
        if let Some(mode) = mode {
            request = request.parse_mode(parse_mode(mode));
        }
        request.await.map_err(map_error)?;
        Ok(())
    }

    async fn send_photo(
        &self,
        chat: ChatId,
        url: &str,
        caption: Option<&str>,
        mode: Option<ParseMode>,
    ) -> Result<(), DeliveryError> {
        let url = url::Url::parse(url)
            .map_err(|e| DeliveryError::Rejected(format!("invalid photo url {url}: {e}")))?;
        let mut request = self.bot.send_photo(TgChatId(chat.0), InputFile::url(url));
        if let Some(caption) = caption {
            request = request.caption(caption);
        }
        if let Some(mode) = mode {
            request = request.parse_mode(parse_mode(mode));
        }
        request.await.map_err(map_error)?;
        Ok(())
    }
}
