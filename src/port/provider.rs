//! Upstream statistics query port.

use async_trait::async_trait;

use crate::domain::{AccountId, HeroCatalog, MatchRecord, Peer, Profile, SharedMatch};
use crate::error::UpstreamError;

/// Query interface of the match statistics provider.
///
/// Implementations are stateless per call and safe to share between the
/// monitor and the dispatcher. Empty sequences are valid results.
#[async_trait]
pub trait StatsProvider: Send + Sync {
    /// Full hero list. Fetched once at startup.
    async fn heroes(&self) -> Result<HeroCatalog, UpstreamError>;

    /// Recent matches of `account`, newest first.
    async fn recent_matches(&self, account: AccountId) -> Result<Vec<MatchRecord>, UpstreamError>;

    async fn profile(&self, account: AccountId) -> Result<Profile, UpstreamError>;

    async fn peers(&self, account: AccountId) -> Result<Vec<Peer>, UpstreamError>;

    /// Up to `limit` of `account`'s matches, newest first. Unlike
    /// [`recent_matches`](Self::recent_matches) this is not capped by the
    /// provider's feed size.
    async fn match_history(
        &self,
        account: AccountId,
        limit: u32,
    ) -> Result<Vec<SharedMatch>, UpstreamError>;

    /// Up to `limit` matches of `account` in which `other` also played.
    async fn matches_with(
        &self,
        account: AccountId,
        other: AccountId,
        limit: u32,
    ) -> Result<Vec<SharedMatch>, UpstreamError>;
}
