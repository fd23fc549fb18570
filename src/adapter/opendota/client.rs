//! OpenDota REST API client.
//!
//! Every query except the hero list passes through the shared
//! [`RateLimiter`] before touching the network. The client never retries;
//! failures are classified into [`UpstreamError`] and returned.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::dto::{HeroDto, PlayerDto};
use super::limiter::RateLimiter;
use crate::domain::{AccountId, HeroCatalog, MatchRecord, Peer, Profile, SharedMatch};
use crate::error::UpstreamError;
use crate::port::StatsProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.opendota.com/api";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// HTTP client for the OpenDota API.
pub struct OpenDotaClient {
    http: HttpClient,
    base_url: String,
    limiter: Arc<RateLimiter>,
}

impl OpenDotaClient {
    /// Create a client with the given base URL, request timeout and shared limiter.
    #[must_use]
    pub fn new(base_url: impl Into<String>, timeout: Duration, limiter: Arc<RateLimiter>) -> Self {
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            limiter,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_limited<T>(&self, url: &str) -> Result<T, UpstreamError>
    where
        T: DeserializeOwned,
    {
        self.limiter.acquire().await;
        self.get_json(url).await
    }

    async fn get_json<T>(&self, url: &str) -> Result<T, UpstreamError>
    where
        T: DeserializeOwned,
    {
        debug!(url = %url, "OpenDota request");

        let transport = |source| UpstreamError::Transport {
            url: url.to_string(),
            source,
        };

        let response = self.http.get(url).send().await.map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            return Err(UpstreamError::status(url, status.as_u16(), &body));
        }

        let body = response.bytes().await.map_err(transport)?;
        serde_json::from_slice(&body).map_err(|source| UpstreamError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl StatsProvider for OpenDotaClient {
    async fn heroes(&self) -> Result<HeroCatalog, UpstreamError> {
        let heroes: Vec<HeroDto> = self.get_json(&self.url("/heroes")).await?;
        debug!(count = heroes.len(), "Fetched heroes");
        Ok(HeroCatalog::new(
            heroes.into_iter().map(|h| (h.id, h.localized_name)),
        ))
    }

    async fn recent_matches(&self, account: AccountId) -> Result<Vec<MatchRecord>, UpstreamError> {
        let url = self.url(&format!("/players/{account}/recentMatches"));
        self.get_limited(&url).await
    }

    async fn profile(&self, account: AccountId) -> Result<Profile, UpstreamError> {
        let url = self.url(&format!("/players/{account}"));
        let player: PlayerDto = self.get_limited(&url).await?;
        Ok(player.into())
    }

    async fn peers(&self, account: AccountId) -> Result<Vec<Peer>, UpstreamError> {
        let url = self.url(&format!("/players/{account}/peers"));
        self.get_limited(&url).await
    }

    async fn match_history(
        &self,
        account: AccountId,
        limit: u32,
    ) -> Result<Vec<SharedMatch>, UpstreamError> {
        let url = self.url(&format!("/players/{account}/matches?limit={limit}"));
        self.get_limited(&url).await
    }

    async fn matches_with(
        &self,
        account: AccountId,
        other: AccountId,
        limit: u32,
    ) -> Result<Vec<SharedMatch>, UpstreamError> {
        let url = self.url(&format!(
            "/players/{account}/matches?included_account_id={other}&limit={limit}"
        ));
        self.get_limited(&url).await
    }
}
