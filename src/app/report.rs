//! Query-and-format pipelines shared by the console report and bot commands.
//!
//! Every builder fails as a whole on the first upstream error; callers decide
//! whether that aborts a report or becomes an error reply.

use std::collections::HashMap;
use std::fmt;

use chrono::TimeZone;
use serde::Deserialize;
use tracing::debug;

use super::format::{
    leaderboard_table, match_table, teammates_table, LeaderboardEntry, TeammateEntry,
};
use super::roster::Roster;
use crate::domain::{display_name, shared_win_rate, win_rate, AccountId, HeroCatalog};
use crate::error::UpstreamError;
use crate::port::StatsProvider;

/// How many of the most-played peers are checked for the best teammate.
pub const PEER_CANDIDATES: usize = 20;

/// Rows the provider returns from the recent-matches feed.
pub const RECENT_FEED_LEN: i64 = 20;

/// Sizes used by the report builders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// Rows of the per-player match table.
    pub matches_per_player: usize,
    /// Matches considered for the win rate shown in `/stat`.
    pub win_rate_sample: i64,
    /// Matches considered per player for `/rating`. Samples above
    /// [`RECENT_FEED_LEN`] are read from the full match history.
    pub rating_sample: i64,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            matches_per_player: 10,
            win_rate_sample: 20,
            rating_sample: 20,
        }
    }
}

/// Where best-teammate candidates come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeammateSource {
    /// The player's most frequent peers.
    #[default]
    Peers,
    /// The other roster members.
    Roster,
}

impl fmt::Display for TeammateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Peers => write!(f, "peers"),
            Self::Roster => write!(f, "roster"),
        }
    }
}

/// Everything `/stat` needs for one player.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerReport {
    pub name: String,
    pub avatar: Option<String>,
    pub win_rate: f64,
    pub table: String,
}

pub async fn player_report<Tz>(
    provider: &dyn StatsProvider,
    account: AccountId,
    heroes: &HeroCatalog,
    tz: &Tz,
    settings: &ReportSettings,
) -> Result<PlayerReport, UpstreamError>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let profile = provider.profile(account).await?;
    let matches = provider.recent_matches(account).await?;
    let (rate, _) = win_rate(&matches, settings.win_rate_sample);
    let shown = &matches[..matches.len().min(settings.matches_per_player)];

    Ok(PlayerReport {
        name: profile.display_name(),
        avatar: profile.avatar().map(str::to_string),
        win_rate: rate,
        table: match_table(shown, heroes, tz),
    })
}

/// Plain-text report of every roster player's latest matches.
///
/// Sections follow roster order, separated by one blank line.
pub async fn console_report<Tz>(
    provider: &dyn StatsProvider,
    roster: &Roster,
    heroes: &HeroCatalog,
    tz: &Tz,
    settings: &ReportSettings,
) -> Result<String, UpstreamError>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let mut sections = Vec::with_capacity(roster.len());
    for account in roster.iter() {
        let report = player_report(provider, account, heroes, tz, settings).await?;
        sections.push(format!("Recent matches ({}):\n{}", report.name, report.table));
    }
    Ok(sections.join("\n"))
}

/// Roster ranked by win rate over each player's last `sample` matches.
pub async fn leaderboard(
    provider: &dyn StatsProvider,
    roster: &Roster,
    sample: i64,
) -> Result<String, UpstreamError> {
    let mut entries = Vec::with_capacity(roster.len());
    for account in roster.iter() {
        let profile = provider.profile(account).await?;
        let (rate, games) = if sample > RECENT_FEED_LEN {
            let limit = u32::try_from(sample).unwrap_or(u32::MAX);
            shared_win_rate(&provider.match_history(account, limit).await?)
        } else {
            win_rate(&provider.recent_matches(account).await?, sample)
        };
        entries.push(LeaderboardEntry {
            name: profile.display_name(),
            win_rate: rate,
            games,
        });
    }
    Ok(leaderboard_table(entries))
}

/// Best teammate per roster player over up to `limit` shared matches each.
pub async fn best_teammates(
    provider: &dyn StatsProvider,
    roster: &Roster,
    limit: u32,
    source: TeammateSource,
) -> Result<String, UpstreamError> {
    let entries = match source {
        TeammateSource::Peers => teammates_from_peers(provider, roster, limit).await?,
        TeammateSource::Roster => teammates_from_roster(provider, roster, limit).await?,
    };
    Ok(teammates_table(&entries))
}

async fn teammates_from_peers(
    provider: &dyn StatsProvider,
    roster: &Roster,
    limit: u32,
) -> Result<Vec<TeammateEntry>, UpstreamError> {
    let mut entries = Vec::with_capacity(roster.len());
    for account in roster.iter() {
        let profile = provider.profile(account).await?;
        let mut peers = provider.peers(account).await?;
        peers.sort_by(|a, b| b.with_games.cmp(&a.with_games));
        peers.truncate(PEER_CANDIDATES);

        let mut best = TeammateEntry::empty(profile.display_name());
        for peer in &peers {
            let shared = provider.matches_with(account, peer.account_id, limit).await?;
            let (rate, games) = shared_win_rate(&shared);
            let name = peer
                .persona_name
                .as_deref()
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map_or_else(|| format!("Account {}", peer.account_id), str::to_string);
            best.offer(name, rate, games);
        }
        debug!(account = %account, candidates = peers.len(), "Best teammate resolved from peers");
        entries.push(best);
    }
    Ok(entries)
}

async fn teammates_from_roster(
    provider: &dyn StatsProvider,
    roster: &Roster,
    limit: u32,
) -> Result<Vec<TeammateEntry>, UpstreamError> {
    let mut names = HashMap::with_capacity(roster.len());
    for account in roster.iter() {
        let profile = provider.profile(account).await?;
        names.insert(account, display_name(&profile.persona_name));
    }

    let mut entries = Vec::with_capacity(roster.len());
    for account in roster.iter() {
        let mut best = TeammateEntry::empty(names[&account].clone());
        for friend in roster.iter().filter(|friend| *friend != account) {
            let shared = provider.matches_with(account, friend, limit).await?;
            let (rate, games) = shared_win_rate(&shared);
            best.offer(names[&friend].clone(), rate, games);
        }
        entries.push(best);
    }
    Ok(entries)
}
