//! In-memory statistics provider.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::{AccountId, HeroCatalog, MatchRecord, Peer, Profile, SharedMatch};
use crate::error::UpstreamError;
use crate::port::StatsProvider;

/// A provider backed by maps, with per-account feed scripts.
///
/// Each `recent_matches` call pops the next scripted feed for the account;
/// the last one keeps being returned once the script is down to one entry.
/// Accounts without data return empty results.
#[derive(Default)]
pub struct FakeProvider {
    heroes: HeroCatalog,
    profiles: HashMap<AccountId, Profile>,
    feeds: Mutex<HashMap<AccountId, VecDeque<Option<Vec<MatchRecord>>>>>,
    history: HashMap<AccountId, Vec<SharedMatch>>,
    peers: HashMap<AccountId, Vec<Peer>>,
    shared: HashMap<(AccountId, AccountId), Vec<SharedMatch>>,
    failing: HashSet<AccountId>,
    calls: Mutex<Vec<String>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_heroes(mut self, heroes: HeroCatalog) -> Self {
        self.heroes = heroes;
        self
    }

    pub fn with_profile(mut self, account: AccountId, name: &str, avatar: &str) -> Self {
        self.profiles.insert(
            account,
            Profile {
                persona_name: name.to_string(),
                avatar_url: avatar.to_string(),
            },
        );
        self
    }

    /// Append one feed to the account's script.
    pub fn with_feed(self, account: AccountId, feed: Vec<MatchRecord>) -> Self {
        self.push_feed(account, Some(feed));
        self
    }

    /// Append one failing `recent_matches` call to the account's script.
    pub fn with_feed_error(self, account: AccountId) -> Self {
        self.push_feed(account, None);
        self
    }

    /// Full match history, newest first, served by `match_history`.
    pub fn with_history(mut self, account: AccountId, matches: Vec<SharedMatch>) -> Self {
        self.history.insert(account, matches);
        self
    }

    pub fn with_peers(mut self, account: AccountId, peers: Vec<Peer>) -> Self {
        self.peers.insert(account, peers);
        self
    }

    pub fn with_shared(mut self, account: AccountId, other: AccountId, matches: Vec<SharedMatch>) -> Self {
        self.shared.insert((account, other), matches);
        self
    }

    /// Make every query about `account` fail.
    pub fn failing(mut self, account: AccountId) -> Self {
        self.failing.insert(account);
        self
    }

    /// Queries issued so far, e.g. `recent:42`, `history:42:50` or `with:1:2:20`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("lock provider calls").clone()
    }

    fn push_feed(&self, account: AccountId, feed: Option<Vec<MatchRecord>>) {
        self.feeds
            .lock()
            .expect("lock provider feeds")
            .entry(account)
            .or_default()
            .push_back(feed);
    }

    fn record(&self, call: String) {
        self.calls.lock().expect("lock provider calls").push(call);
    }

    fn check(&self, account: AccountId, op: &str) -> Result<(), UpstreamError> {
        if self.failing.contains(&account) {
            return Err(unavailable(op, account));
        }
        Ok(())
    }
}

fn unavailable(op: &str, account: AccountId) -> UpstreamError {
    UpstreamError::status(format!("fake://{op}/{account}"), 503, b"unavailable")
}

#[async_trait]
impl StatsProvider for FakeProvider {
    async fn heroes(&self) -> Result<HeroCatalog, UpstreamError> {
        self.record("heroes".to_string());
        Ok(self.heroes.clone())
    }

    async fn recent_matches(&self, account: AccountId) -> Result<Vec<MatchRecord>, UpstreamError> {
        self.record(format!("recent:{account}"));
        self.check(account, "recent")?;
        let mut feeds = self.feeds.lock().expect("lock provider feeds");
        let Some(script) = feeds.get_mut(&account) else {
            return Ok(Vec::new());
        };
        let next = if script.len() > 1 {
            script.pop_front().flatten()
        } else {
            script.front().cloned().flatten()
        };
        next.ok_or_else(|| unavailable("recent", account))
    }

    async fn profile(&self, account: AccountId) -> Result<Profile, UpstreamError> {
        self.record(format!("profile:{account}"));
        self.check(account, "profile")?;
        Ok(self.profiles.get(&account).cloned().unwrap_or_default())
    }

    async fn peers(&self, account: AccountId) -> Result<Vec<Peer>, UpstreamError> {
        self.record(format!("peers:{account}"));
        self.check(account, "peers")?;
        Ok(self.peers.get(&account).cloned().unwrap_or_default())
    }

    async fn match_history(
        &self,
        account: AccountId,
        limit: u32,
    ) -> Result<Vec<SharedMatch>, UpstreamError> {
        self.record(format!("history:{account}:{limit}"));
        self.check(account, "history")?;
        let mut matches = self.history.get(&account).cloned().unwrap_or_default();
        matches.truncate(limit as usize);
        Ok(matches)
    }

    async fn matches_with(
        &self,
        account: AccountId,
        other: AccountId,
        limit: u32,
    ) -> Result<Vec<SharedMatch>, UpstreamError> {
        self.record(format!("with:{account}:{other}:{limit}"));
        self.check(account, "matches")?;
        let mut matches = self.shared.get(&(account, other)).cloned().unwrap_or_default();
        matches.truncate(limit as usize);
        Ok(matches)
    }
}
