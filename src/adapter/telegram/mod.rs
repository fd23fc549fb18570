//! Telegram-facing side of the bot: chunking, command routing and dispatch.
//!
//! Only [`TelegramDelivery`] talks to the Bot API; everything else works
//! against the [`Delivery`](crate::port::Delivery) port.

#[cfg(feature = "telegram")]
mod bot;
pub mod chunk;
pub mod command;
pub mod dispatch;
pub mod handlers;
pub mod reply;

#[cfg(feature = "telegram")]
pub use bot::TelegramDelivery;
pub use chunk::{chunk_report, escape_html, Chunk, DEFAULT_MAX_MESSAGE_LEN, MIN_CHUNK_CONTENT};
pub use command::{parse_invocation, CommandHandler, CommandRegistry, Invocation};
pub use dispatch::{DispatchSettings, Dispatcher, DEFAULT_POLL_TIMEOUT, DEFAULT_RETRY_DELAY};
pub use handlers::{CommandContext, DEFAULT_FRIENDS_LIMIT};
pub use reply::Responder;
