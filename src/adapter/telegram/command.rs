//! Bot command grammar and the routing table.
//!
//! A message is a command when its first whitespace-separated token is
//! `/<name>`, optionally addressed as `/<name>@<bot>`. The remaining tokens
//! are the arguments. Names match case-sensitively.

use std::fmt;

use async_trait::async_trait;

use super::handlers::{ChatIdCommand, CommandContext, FriendsCommand, RatingCommand, StatCommand};
use super::reply::Responder;
use crate::app::TeammateSource;
use crate::error::DeliveryError;

/// A parsed command message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation<'t> {
    /// Command name without the leading slash or bot suffix.
    pub name: &'t str,
    pub args: Vec<&'t str>,
}

/// Split `text` into command name and arguments; `None` if it is not a command.
#[must_use]
pub fn parse_invocation(text: &str) -> Option<Invocation<'_>> {
    let mut parts = text.split_whitespace();
    let head = parts.next()?.strip_prefix('/')?;
    let name = head.split_once('@').map_or(head, |(name, _)| name);
    if name.is_empty() {
        return None;
    }
    Some(Invocation {
        name,
        args: parts.collect(),
    })
}

/// Work performed for one recognized command.
///
/// Upstream failures and bad arguments are reported through the responder.
/// Only delivery failures of regular replies are returned; they stop the
/// dispatcher.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn handle(
        &self,
        ctx: &CommandContext,
        args: &[&str],
        reply: &Responder<'_>,
    ) -> Result<(), DeliveryError>;
}

/// One routing table entry.
pub struct Command {
    name: &'static str,
    description: &'static str,
    handler: Box<dyn CommandHandler>,
}

impl Command {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub const fn description(&self) -> &'static str {
        self.description
    }

    pub fn handler(&self) -> &dyn CommandHandler {
        self.handler.as_ref()
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Ordered set of commands the dispatcher understands.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    commands: Vec<Command>,
}

impl CommandRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The full command set, with `/friends` backed by `source`.
    #[must_use]
    pub fn standard(source: TeammateSource) -> Self {
        Self::new()
            .register("stat", "Recent matches per player", StatCommand)
            .register("rating", "Win rate leaderboard", RatingCommand)
            .register(
                "friends",
                "Best teammates, optional sample size",
                FriendsCommand::new(source),
            )
            .register("chatid", "Show this chat id", ChatIdCommand)
    }

    /// Add or replace the command called `name`.
    #[must_use]
    pub fn register(
        mut self,
        name: &'static str,
        description: &'static str,
        handler: impl CommandHandler + 'static,
    ) -> Self {
        let command = Command {
            name,
            description,
            handler: Box::new(handler),
        };
        match self.commands.iter_mut().find(|c| c.name == name) {
            Some(existing) => *existing = command,
            None => self.commands.push(command),
        }
        self
    }

    /// Find the command for `text` together with its arguments.
    #[must_use]
    pub fn route<'t>(&self, text: &'t str) -> Option<(&Command, Vec<&'t str>)> {
        let invocation = parse_invocation(text)?;
        self.commands
            .iter()
            .find(|c| c.name == invocation.name)
            .map(|c| (c, invocation.args))
    }

    /// `(name, description)` pairs for the provider's command menu.
    #[must_use]
    pub fn menu(&self) -> Vec<(&'static str, &'static str)> {
        self.commands
            .iter()
            .map(|c| (c.name, c.description))
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
