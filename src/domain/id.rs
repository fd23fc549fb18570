//! Identifier newtypes for tracked players and matches.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Offset between a 64-bit Steam id and the 32-bit account number OpenDota uses.
pub const STEAM_ID64_OFFSET: i64 = 76_561_197_960_265_728;

/// OpenDota account number of a tracked player.
///
/// Always strictly positive. Construction goes through [`AccountId::normalize`]
/// or [`AccountId::new`], both of which enforce that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct AccountId(i64);

impl AccountId {
    /// Wrap an already-normalized account number.
    #[must_use]
    pub const fn new(id: i64) -> Option<Self> {
        if id > 0 {
            Some(Self(id))
        } else {
            None
        }
    }

    /// Normalize a raw roster value.
    ///
    /// Values above the 32-bit range are 64-bit Steam ids and get
    /// [`STEAM_ID64_OFFSET`] subtracted. Returns `None` when the result
    /// is not positive.
    #[must_use]
    pub const fn normalize(raw: i64) -> Option<Self> {
        let id = if raw > u32::MAX as i64 {
            raw - STEAM_ID64_OFFSET
        } else {
            raw
        };
        Self::new(id)
    }

    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for AccountId {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("account id must be positive, got {value}"))
    }
}

impl From<AccountId> for i64 {
    fn from(id: AccountId) -> Self {
        id.0
    }
}

/// Upstream match identifier. Larger means more recent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(pub i64);

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
