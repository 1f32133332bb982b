//! # Rate Feed Client
//!
//! `EcbClient` performs one HTTP fetch of the daily document.
//! `CachedRates` shares the last fetched table between tasks and refetches
//! once it is older than the configured TTL.
//!
//! ```text
//! rates() ──► read lock: fresh? ──yes──► Arc<RateTable>
//!                  │ no
//!                  ▼
//!             write lock: fresh now? ──yes──► Arc<RateTable>
//!                  │ no
//!                  ▼
//!             EcbClient::fetch() ──► store + return
//! ```
//!
//! A failed refetch returns the error and keeps the previous table cached.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::{FeedSettings, FxConfig};
use crate::currency::RateTable;
use crate::ecb;
use crate::error::FxResult;

// =============================================================================
// ECB Client
// =============================================================================

#[derive(Debug, Clone)]
pub struct EcbClient {
    http: reqwest::Client,
    url: String,
}

impl EcbClient {
    pub fn new(settings: &FeedSettings) -> FxResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(settings.user_agent.clone())
            .build()?;

        Ok(Self {
            http,
            url: settings.url.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Downloads and parses the current rate document.
    pub async fn fetch(&self) -> FxResult<RateTable> {
        debug!(url = %self.url, "Fetching rate document");

        let body = self
            .http
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let table = ecb::parse_daily(&body)?;
        info!(date = ?table.date(), currencies = table.len(), "Fetched exchange rates");
        Ok(table)
    }
}

// =============================================================================
// Cached Rates
// =============================================================================

#[derive(Debug)]
struct Snapshot {
    table: Arc<RateTable>,
    fetched_at: Instant,
}

#[derive(Debug)]
pub struct CachedRates {
    client: EcbClient,
    ttl: Duration,
    state: RwLock<Option<Snapshot>>,
}

impl CachedRates {
    pub fn new(client: EcbClient, ttl: Duration) -> Self {
        Self {
            client,
            ttl,
            state: RwLock::new(None),
        }
    }

    pub fn from_config(config: &FxConfig) -> FxResult<Self> {
        let client = EcbClient::new(&config.feed)?;
        Ok(Self::new(client, Duration::from_secs(config.cache.ttl_secs)))
    }

    fn fresh(&self, snapshot: &Option<Snapshot>) -> Option<Arc<RateTable>> {
        snapshot
            .as_ref()
            .filter(|s| s.fetched_at.elapsed() < self.ttl)
            .map(|s| Arc::clone(&s.table))
    }

    /// Returns the cached table, fetching it first when missing or stale.
    pub async fn rates(&self) -> FxResult<Arc<RateTable>> {
        if let Some(table) = self.fresh(&*self.state.read().await) {
            debug!("Rate cache hit");
            return Ok(table);
        }

        let mut state = self.state.write().await;
        // Another task may have refreshed while we waited for the lock
        if let Some(table) = self.fresh(&state) {
            debug!("Rate cache hit after lock");
            return Ok(table);
        }

        debug!("Rate cache miss");
        self.store(&mut state).await
    }

    /// Fetches unconditionally and replaces the cached table.
    pub async fn refresh(&self) -> FxResult<Arc<RateTable>> {
        let mut state = self.state.write().await;
        self.store(&mut state).await
    }

    /// Drops the cached table so the next `rates()` refetches.
    pub async fn invalidate(&self) {
        *self.state.write().await = None;
    }

    async fn store(&self, state: &mut Option<Snapshot>) -> FxResult<Arc<RateTable>> {
        let table = match self.client.fetch().await {
            Ok(table) => Arc::new(table),
            Err(e) => {
                warn!(error = %e, retryable = e.is_retryable(), "Rate fetch failed");
                return Err(e);
            }
        };

        *state = Some(Snapshot {
            table: Arc::clone(&table),
            fetched_at: Instant::now(),
        });
        Ok(table)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
