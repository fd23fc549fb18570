//! Provider-agnostic domain types.

mod hero;
mod id;
mod matches;
mod stats;

pub use hero::HeroCatalog;
pub use id::{AccountId, MatchId, STEAM_ID64_OFFSET};
pub use matches::{
    display_name, is_win, MatchRecord, Peer, Profile, SharedMatch, DIRE_SLOT_START, UNKNOWN_PLAYER,
};
pub use stats::{shared_win_rate, win_rate};

pub(crate) use matches::null_as_default;
