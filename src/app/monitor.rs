//! Background poller that reports matches played since the last cycle.
//!
//! Per account the monitor keeps a watermark: the newest match id already
//! accounted for. The first successful poll only sets it (no backfill);
//! later polls notify every feed entry newer than the watermark, oldest
//! first, then move the watermark to the feed head.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, TimeZone};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::format::match_summary;
use super::roster::Roster;
use crate::domain::{AccountId, HeroCatalog, MatchId, MatchRecord, UNKNOWN_PLAYER};
use crate::port::{Notifier, StatsProvider};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Newest observed match id per account. Memory only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Watermarks {
    seen: HashMap<AccountId, MatchId>,
}

impl Watermarks {
    #[must_use]
    pub fn get(&self, account: AccountId) -> Option<MatchId> {
        self.seen.get(&account).copied()
    }

    /// Apply one newest-first feed and return the unseen matches oldest first.
    ///
    /// An empty feed changes nothing. A feed whose head is older than the
    /// watermark is ignored so the watermark never moves backwards.
    pub fn observe<'a>(&mut self, account: AccountId, feed: &'a [MatchRecord]) -> Vec<&'a MatchRecord> {
        let Some(head) = feed.first() else {
            return Vec::new();
        };
        let Some(previous) = self.get(account) else {
            self.seen.insert(account, head.match_id);
            return Vec::new();
        };
        if head.match_id <= previous {
            return Vec::new();
        }

        let mut fresh: Vec<_> = feed.iter().take_while(|m| m.match_id != previous).collect();
        fresh.reverse();
        self.seen.insert(account, head.match_id);
        fresh
    }
}

/// Outcome counters of one poll cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub polled: usize,
    pub failed: usize,
    pub notified: usize,
}

pub struct ChangeMonitor<Tz = Local> {
    provider: Arc<dyn StatsProvider>,
    heroes: Arc<HeroCatalog>,
    roster: Roster,
    notifier: Arc<dyn Notifier>,
    interval: Duration,
    tz: Tz,
    watermarks: Watermarks,
    names: HashMap<AccountId, String>,
}

impl ChangeMonitor<Local> {
    #[must_use]
    pub fn new(
        provider: Arc<dyn StatsProvider>,
        heroes: Arc<HeroCatalog>,
        roster: Roster,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            provider,
            heroes,
            roster,
            notifier,
            interval: DEFAULT_POLL_INTERVAL,
            tz: Local,
            watermarks: Watermarks::default(),
            names: HashMap::new(),
        }
    }
}

impl<Tz> ChangeMonitor<Tz>
where
    Tz: TimeZone + Send + Sync,
    Tz::Offset: fmt::Display,
{
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Render match start times in `tz` instead of local time.
    #[must_use]
    pub fn with_timezone<Other>(self, tz: Other) -> ChangeMonitor<Other> {
        ChangeMonitor {
            provider: self.provider,
            heroes: self.heroes,
            roster: self.roster,
            notifier: self.notifier,
            interval: self.interval,
            tz,
            watermarks: self.watermarks,
            names: self.names,
        }
    }

    #[must_use]
    pub const fn watermarks(&self) -> &Watermarks {
        &self.watermarks
    }

    /// Learn display names once. Failures fall back to the unknown name.
    pub async fn prime_names(&mut self) {
        for account in self.roster.iter() {
            match self.provider.profile(account).await {
                Ok(profile) => {
                    self.names.insert(account, profile.display_name());
                }
                Err(e) => warn!(account = %account, error = %e, "Monitor profile fetch failed"),
            }
        }
    }

    /// Poll every roster account once, in roster order.
    pub async fn poll_cycle(&mut self) -> CycleReport {
        let mut report = CycleReport::default();
        for account in self.roster.iter() {
            report.polled += 1;
            let feed = match self.provider.recent_matches(account).await {
                Ok(feed) => feed,
                Err(e) => {
                    report.failed += 1;
                    warn!(account = %account, error = %e, "Monitor match fetch failed");
                    continue;
                }
            };

            let fresh = self.watermarks.observe(account, &feed);
            if fresh.is_empty() {
                continue;
            }
            debug!(account = %account, count = fresh.len(), "New matches observed");

            let name = self
                .names
                .get(&account)
                .map_or(UNKNOWN_PLAYER, String::as_str);
            for m in fresh {
                let line = match_summary(name, m, &self.heroes, &self.tz);
                if let Err(e) = self.notifier.accept(&line).await {
                    warn!(account = %account, match_id = %m.match_id, error = %e, "Match notification failed");
                }
                report.notified += 1;
            }
        }
        report
    }

    /// Run forever: one cycle immediately, then one per interval.
    pub async fn run(mut self) {
        info!(
            accounts = self.roster.len(),
            interval_secs = self.interval.as_secs(),
            "Match monitor started"
        );
        self.prime_names().await;

        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let report = self.poll_cycle().await;
            debug!(
                polled = report.polled,
                failed = report.failed,
                notified = report.notified,
                "Monitor cycle finished"
            );
        }
    }
}
