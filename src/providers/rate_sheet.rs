use crate::core::cache::KeyValueCollection;
use crate::core::market::{MarketDataProvider, MarketSnapshot};
use crate::providers::util::get_with_retry;
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

const SNAPSHOT_KEY: &[u8] = b"snapshot";
const SNAPSHOT_TTL: Duration = Duration::from_secs(6 * 60 * 60);

/// Fetches a JSON [`MarketSnapshot`] from `{base_url}/snapshot.json`.
pub struct RateSheetProvider {
    base_url: String,
    cache: Arc<dyn KeyValueCollection>,
}

impl RateSheetProvider {
    pub fn new(base_url: &str, cache: Arc<dyn KeyValueCollection>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            cache,
        }
    }

    async fn cached_snapshot(&self) -> Option<MarketSnapshot> {
        match self.cache.get(SNAPSHOT_KEY).await {
            Ok(Some(raw)) => match serde_json::from_slice(&raw) {
                Ok(snapshot) => Some(snapshot),
                Err(e) => {
                    warn!("Discarding unreadable cached rate sheet: {e}");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!("Rate sheet cache read failed: {e}");
                None
            }
        }
    }
}

#[async_trait]
impl MarketDataProvider for RateSheetProvider {
    async fn fetch_snapshot(&self) -> Result<MarketSnapshot> {
        if let Some(snapshot) = self.cached_snapshot().await {
            debug!("Using cached rate sheet from {}", snapshot.as_of);
            return Ok(snapshot);
        }

        let url = format!("{}/snapshot.json", self.base_url);
        debug!("Requesting rate sheet from {}", url);

        let client = reqwest::Client::builder()
            .user_agent("fintechora/0.1")
            .build()?;
        let response_text = get_with_retry(&client, &url, 3, 500)
            .await?
            .text()
            .await
            .with_context(|| format!("Failed to read rate sheet body from {url}"))?;

        if response_text.trim().is_empty() {
            return Err(anyhow!("Received empty rate sheet from {}", url));
        }

        let snapshot: MarketSnapshot = serde_json::from_str(&response_text)
            .with_context(|| format!("Failed to parse rate sheet from {url}"))?;

        if let Err(e) = self
            .cache
            .put(SNAPSHOT_KEY, &serde_json::to_vec(&snapshot)?, Some(SNAPSHOT_TTL))
            .await
        {
            warn!("Failed to cache rate sheet: {e}");
        }

        Ok(snapshot)
    }
}
