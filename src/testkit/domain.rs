//! Builders for domain primitives.

use crate::domain::{AccountId, MatchId, MatchRecord, Peer, SharedMatch};

/// Account id from a positive literal.
///
/// # Panics
///
/// Panics when `id` is not positive.
#[must_use]
pub fn account(id: i64) -> AccountId {
    AccountId::new(id).expect("test account id must be positive")
}

/// Radiant-side match with neutral stats; `won` decides the outcome.
#[must_use]
pub fn match_record(match_id: i64, hero_id: u32, won: bool) -> MatchRecord {
    MatchRecord {
        match_id: MatchId(match_id),
        hero_id,
        kills: 1,
        deaths: 1,
        assists: 1,
        duration: 1800,
        start_time: 1_700_000_000,
        player_slot: 0,
        radiant_win: won,
    }
}

/// Newest-first feed with descending ids, all wins.
#[must_use]
pub fn feed(ids: &[i64]) -> Vec<MatchRecord> {
    ids.iter().map(|id| match_record(*id, 1, true)).collect()
}

#[must_use]
pub fn shared(outcomes: &[bool]) -> Vec<SharedMatch> {
    outcomes
        .iter()
        .enumerate()
        .map(|(i, won)| SharedMatch {
            match_id: MatchId(i as i64 + 1),
            player_slot: 0,
            radiant_win: *won,
        })
        .collect()
}

#[must_use]
pub fn peer(id: i64, name: Option<&str>, with_games: u32) -> Peer {
    Peer {
        account_id: account(id),
        persona_name: name.map(str::to_string),
        with_games,
        with_win: 0,
    }
}
