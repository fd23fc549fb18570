//! Fixed-width text rendering of match feeds, leaderboards and alerts.

use std::cmp::Ordering;
use std::fmt::{self, Write};

use chrono::TimeZone;

use crate::domain::{HeroCatalog, MatchRecord};

pub const WIN_GLYPH: &str = "✅";
pub const LOSS_GLYPH: &str = "❌";
/// Placeholder when a player has no qualifying teammate.
pub const NO_DATA: &str = "no data";

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";
const NAME_WIDTH: usize = 16;
const HERO_WIDTH: usize = 12;
const MEDALS: [&str; 3] = ["🥇", "🥈", "🥉"];

/// `M:SS`; non-positive durations render as `0:00`.
#[must_use]
pub fn format_duration(seconds: i64) -> String {
    if seconds <= 0 {
        return "0:00".to_string();
    }
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Cut `text` to at most `max_width` bytes, ending in `...` when shortened.
///
/// Budgets of three bytes or less are hard cuts without an ellipsis. Cuts
/// never split a UTF-8 sequence, so the result may be slightly shorter.
#[must_use]
pub fn truncate(text: &str, max_width: usize) -> String {
    if text.len() <= max_width {
        return text.to_string();
    }
    if max_width <= 3 {
        return text[..floor_char_boundary(text, max_width)].to_string();
    }
    let cut = floor_char_boundary(text, max_width - 3);
    format!("{}...", &text[..cut])
}

fn floor_char_boundary(text: &str, index: usize) -> usize {
    (0..=index.min(text.len()))
        .rev()
        .find(|i| text.is_char_boundary(*i))
        .unwrap_or(0)
}

#[must_use]
pub const fn outcome_glyph(won: bool) -> &'static str {
    if won {
        WIN_GLYPH
    } else {
        LOSS_GLYPH
    }
}

/// Match start as `YYYY-MM-DD HH:MM` in `tz`.
#[must_use]
pub fn format_start<Tz>(epoch: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    tz.timestamp_opt(epoch, 0)
        .single()
        .map_or_else(|| "-".to_string(), |t| t.format(DATE_FORMAT).to_string())
}

#[must_use]
pub fn kda(m: &MatchRecord) -> String {
    format!("{}/{}/{}", m.kills, m.deaths, m.assists)
}

/// Column header plus one row per match: date, hero, outcome, K/D/A, duration.
#[must_use]
pub fn match_table<Tz>(matches: &[MatchRecord], heroes: &HeroCatalog, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<16}  {:<12}  {:<4}  {:<7}  {:<6}",
        "Date", "Hero", "Res", "K/D/A", "Time"
    );
    for m in matches {
        let _ = writeln!(
            out,
            "{:<16}  {:<12}  {:<4}  {:<7}  {:<6}",
            format_start(m.start_time, tz),
            truncate(&heroes.name(m.hero_id), HERO_WIDTH),
            outcome_glyph(m.won()),
            kda(m),
            format_duration(m.duration)
        );
    }
    out
}

/// Single-line alert for a newly observed match.
#[must_use]
pub fn match_summary<Tz>(player: &str, m: &MatchRecord, heroes: &HeroCatalog, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    format!(
        "New match: {} | {} | {} | {} | {} | {}",
        player,
        heroes.name(m.hero_id),
        outcome_glyph(m.won()),
        kda(m),
        format_duration(m.duration),
        format_start(m.start_time, tz)
    )
}

/// One leaderboard line before ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardEntry {
    pub name: String,
    pub win_rate: f64,
    pub games: usize,
}

/// Rank entries by win rate, then by game count, both descending.
///
/// The top three places get medals; the rest are numbered.
#[must_use]
pub fn leaderboard_table(mut entries: Vec<LeaderboardEntry>) -> String {
    entries.sort_by(|a, b| match b.win_rate.total_cmp(&a.win_rate) {
        Ordering::Equal => b.games.cmp(&a.games),
        other => other,
    });

    let mut out = String::new();
    let _ = writeln!(out, "{:<3}  {:<16}  {:<9}  {:<5}", "#", "Player", "Win rate", "Games");
    for (i, e) in entries.iter().enumerate() {
        let rank = MEDALS
            .get(i)
            .map_or_else(|| (i + 1).to_string(), |medal| (*medal).to_string());
        let _ = writeln!(
            out,
            "{:<3}  {:<16}  {:>7.1}%  {:<5}",
            rank,
            truncate(&e.name, NAME_WIDTH),
            e.win_rate,
            e.games
        );
    }
    out
}

/// Best teammate of one roster player.
#[derive(Debug, Clone, PartialEq)]
pub struct TeammateEntry {
    pub player: String,
    pub teammate: Option<String>,
    pub win_rate: f64,
    pub games: usize,
}

impl TeammateEntry {
    #[must_use]
    pub fn empty(player: impl Into<String>) -> Self {
        Self {
            player: player.into(),
            teammate: None,
            win_rate: 0.0,
            games: 0,
        }
    }

    /// Replace the current pick when `win_rate`/`games` rank strictly higher.
    pub fn offer(&mut self, teammate: impl Into<String>, win_rate: f64, games: usize) {
        if games == 0 {
            return;
        }
        if win_rate > self.win_rate || (win_rate == self.win_rate && games > self.games) {
            self.teammate = Some(teammate.into());
            self.win_rate = win_rate;
            self.games = games;
        }
    }
}

#[must_use]
pub fn teammates_table(entries: &[TeammateEntry]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<16}  {:<16}  {:<9}  {:<5}",
        "Player", "Best teammate", "Win rate", "Games"
    );
    for e in entries {
        let _ = writeln!(
            out,
            "{:<16}  {:<16}  {:>7.1}%  {:<5}",
            truncate(&e.player, NAME_WIDTH),
            truncate(e.teammate.as_deref().unwrap_or(NO_DATA), NAME_WIDTH),
            e.win_rate,
            e.games
        );
    }
    out
}
