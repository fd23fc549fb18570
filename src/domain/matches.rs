//! Match, profile and peer records returned by the statistics provider.

use serde::{Deserialize, Deserializer, Serialize};

use super::id::{AccountId, MatchId};

/// Player slots below this value are on the Radiant side.
pub const DIRE_SLOT_START: u16 = 128;

/// Whether a player in `player_slot` won a match with the given outcome.
#[must_use]
pub const fn is_win(radiant_win: bool, player_slot: u16) -> bool {
    radiant_win == (player_slot < DIRE_SLOT_START)
}

/// Missing and `null` fields both decode as `T::default()`.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One entry of a player's recent-matches feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub match_id: MatchId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub hero_id: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub kills: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub deaths: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub assists: u32,
    /// Match length in seconds.
    #[serde(default, deserialize_with = "null_as_default")]
    pub duration: i64,
    /// Unix timestamp of the match start.
    #[serde(default, deserialize_with = "null_as_default")]
    pub start_time: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub player_slot: u16,
    #[serde(default, deserialize_with = "null_as_default")]
    pub radiant_win: bool,
}

impl MatchRecord {
    #[must_use]
    pub const fn won(&self) -> bool {
        is_win(self.radiant_win, self.player_slot)
    }
}

/// Reduced match record returned by the player-matches queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedMatch {
    pub match_id: MatchId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub player_slot: u16,
    #[serde(default, deserialize_with = "null_as_default")]
    pub radiant_win: bool,
}

impl SharedMatch {
    #[must_use]
    pub const fn won(&self) -> bool {
        is_win(self.radiant_win, self.player_slot)
    }
}

/// Public profile of a player. Both fields are trimmed and may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    pub persona_name: String,
    pub avatar_url: String,
}

impl Profile {
    /// Display name with the `unknown` fallback for blank persona names.
    #[must_use]
    pub fn display_name(&self) -> String {
        display_name(&self.persona_name)
    }

    #[must_use]
    pub fn avatar(&self) -> Option<&str> {
        (!self.avatar_url.is_empty()).then_some(self.avatar_url.as_str())
    }
}

/// A player someone has shared matches with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Peer {
    pub account_id: AccountId,
    #[serde(default, rename = "personaname")]
    pub persona_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub with_games: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub with_win: u32,
}

/// Name shown for players whose persona name is blank.
pub const UNKNOWN_PLAYER: &str = "unknown";

/// Trimmed name, or [`UNKNOWN_PLAYER`] when blank.
#[must_use]
pub fn display_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        UNKNOWN_PLAYER.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn win_depends_on_side() {
        assert!(is_win(true, 0));
        assert!(is_win(true, 127));
        assert!(!is_win(true, 128));
        assert!(is_win(false, 132));
        assert!(!is_win(false, 4));
    }

    #[test]
    fn decode_recent_match() {
        let json = r#"{
            "match_id": 7412345678,
            "player_slot": 130,
            "radiant_win": false,
            "duration": 2410,
            "game_mode": 22,
            "hero_id": 14,
            "start_time": 1700000000,
            "kills": 7,
            "deaths": 3,
            "assists": 15
        }"#;
        let record: MatchRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.match_id, MatchId(7_412_345_678));
        assert_eq!(record.hero_id, 14);
        assert!(record.won());
    }

    #[test]
    fn decode_recent_match_with_null_fields() {
        let json = r#"[{
            "match_id": 7412345679,
            "player_slot": 3,
            "radiant_win": null,
            "duration": null,
            "hero_id": 14,
            "start_time": 1700000000,
            "kills": 2,
            "deaths": null,
            "assists": null
        }]"#;
        let records: Vec<MatchRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].deaths, 0);
        assert_eq!(records[0].duration, 0);
        assert!(!records[0].radiant_win);
        assert!(!records[0].won());
    }

    #[test]
    fn decode_shared_match_with_null_outcome() {
        let json = r#"{"match_id": 5, "player_slot": null, "radiant_win": null}"#;
        let shared: SharedMatch = serde_json::from_str(json).unwrap();
        assert_eq!(shared.player_slot, 0);
        assert!(!shared.won());
    }

    #[test]
    fn decode_peer_without_name() {
        let json = r#"{"account_id": 77, "with_games": 12, "with_win": 8}"#;
        let peer: Peer = serde_json::from_str(json).unwrap();
        assert_eq!(peer.account_id.get(), 77);
        assert!(peer.persona_name.is_none());
    }

    #[test]
    fn display_name_fallback() {
        assert_eq!(display_name("  "), UNKNOWN_PLAYER);
        assert_eq!(display_name(" Miracle- "), "Miracle-");
        assert!(Profile::default().avatar().is_none());
    }
}
