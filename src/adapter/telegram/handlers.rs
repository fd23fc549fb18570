//! Handlers behind the standard bot commands.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Local;
use tracing::warn;

use super::chunk::escape_html;
use super::command::CommandHandler;
use super::reply::Responder;
use crate::app::format::{LOSS_GLYPH, WIN_GLYPH};
use crate::app::{best_teammates, leaderboard, player_report, ReportSettings, Roster, TeammateSource};
use crate::domain::HeroCatalog;
use crate::error::{DeliveryError, UsageError};
use crate::port::StatsProvider;

/// Shared-match sample used by `/friends` without an argument.
pub const DEFAULT_FRIENDS_LIMIT: u32 = 20;

const FRIENDS_USAGE: &str = "/friends <number>";

/// Read-only state every handler queries.
#[derive(Clone)]
pub struct CommandContext {
    pub provider: Arc<dyn StatsProvider>,
    pub roster: Arc<Roster>,
    pub heroes: Arc<HeroCatalog>,
    pub settings: ReportSettings,
}

/// `/stat`: recent matches of every roster player.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatCommand;

#[async_trait]
impl CommandHandler for StatCommand {
    async fn handle(
        &self,
        ctx: &CommandContext,
        _args: &[&str],
        reply: &Responder<'_>,
    ) -> Result<(), DeliveryError> {
        for account in ctx.roster.iter() {
            let report = match player_report(
                ctx.provider.as_ref(),
                account,
                &ctx.heroes,
                &Local,
                &ctx.settings,
            )
            .await
            {
                Ok(report) => report,
                Err(e) => {
                    warn!(account = %account, chat_id = %reply.chat(), error = %e, "Player report failed");
                    reply.error(&e).await;
                    continue;
                }
            };

            let header = stat_header(&report.name, report.win_rate, ctx.settings.win_rate_sample);
            match report.avatar.as_deref() {
                Some(avatar) => {
                    reply.photo(avatar, &header).await?;
                    reply.report("", &report.table).await?;
                }
                None => reply.report(&header, &report.table).await?,
            }
        }
        Ok(())
    }
}

/// Bold HTML header of one `/stat` section.
#[must_use]
pub fn stat_header(name: &str, win_rate: f64, sample: i64) -> String {
    format!(
        "<b>Recent matches ({})</b>\n<b>Win rate (last {sample}): {win_rate:.1}%</b>\n<b>{WIN_GLYPH} win, {LOSS_GLYPH} loss</b>\n",
        escape_html(name)
    )
}

/// `/rating`: roster leaderboard by recent win rate.
#[derive(Debug, Clone, Copy, Default)]
pub struct RatingCommand;

#[async_trait]
impl CommandHandler for RatingCommand {
    async fn handle(
        &self,
        ctx: &CommandContext,
        _args: &[&str],
        reply: &Responder<'_>,
    ) -> Result<(), DeliveryError> {
        let sample = ctx.settings.rating_sample;
        match leaderboard(ctx.provider.as_ref(), &ctx.roster, sample).await {
            Ok(table) => {
                let header = format!("<b>Win rate leaderboard (last {sample})</b>\n");
                reply.report(&header, &table).await
            }
            Err(e) => {
                warn!(chat_id = %reply.chat(), error = %e, "Leaderboard failed");
                reply.error(&e).await;
                Ok(())
            }
        }
    }
}

/// `/friends [N]`: best teammate per roster player.
#[derive(Debug, Clone, Copy, Default)]
pub struct FriendsCommand {
    source: TeammateSource,
}

impl FriendsCommand {
    #[must_use]
    pub const fn new(source: TeammateSource) -> Self {
        Self { source }
    }
}

/// Sample size from the first argument; [`DEFAULT_FRIENDS_LIMIT`] when absent.
///
/// Accepts `1..=u32::MAX`. Anything else, including larger integers, is a
/// usage error.
pub fn parse_friends_limit(args: &[&str]) -> Result<u32, UsageError> {
    let Some(raw) = args.first() else {
        return Ok(DEFAULT_FRIENDS_LIMIT);
    };
    raw.parse::<u32>()
        .ok()
        .filter(|limit| *limit > 0)
        .ok_or(UsageError {
            usage: FRIENDS_USAGE,
        })
}

#[async_trait]
impl CommandHandler for FriendsCommand {
    async fn handle(
        &self,
        ctx: &CommandContext,
        args: &[&str],
        reply: &Responder<'_>,
    ) -> Result<(), DeliveryError> {
        let limit = match parse_friends_limit(args) {
            Ok(limit) => limit,
            Err(e) => {
                reply.error(&e).await;
                return Ok(());
            }
        };

        match best_teammates(ctx.provider.as_ref(), &ctx.roster, limit, self.source).await {
            Ok(table) => {
                let header = format!("<b>Best teammates by win rate (last {limit} games)</b>\n");
                reply.report(&header, &table).await
            }
            Err(e) => {
                warn!(chat_id = %reply.chat(), source = %self.source, error = %e, "Best teammates failed");
                reply.error(&e).await;
                Ok(())
            }
        }
    }
}

/// `/chatid`: echo the conversation id.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChatIdCommand;

#[async_trait]
impl CommandHandler for ChatIdCommand {
    async fn handle(
        &self,
        _ctx: &CommandContext,
        _args: &[&str],
        reply: &Responder<'_>,
    ) -> Result<(), DeliveryError> {
        reply.plain(&format!("chat_id: {}", reply.chat())).await
    }
}
