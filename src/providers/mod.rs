pub mod rate_sheet;
pub mod static_market;
pub mod util;

use crate::core::config::AppConfig;
use crate::core::market::MarketDataProvider;
use crate::store::KeyValueStore;
use anyhow::Result;
use rate_sheet::RateSheetProvider;
use static_market::StaticMarketProvider;
use tracing::debug;

/// Persistent collection holding fetched rate sheets.
const MARKET_COLLECTION: &str = "market";

/// Picks the market provider configured in `config`.
pub fn market_provider(
    config: &AppConfig,
    store: &KeyValueStore,
) -> Result<Box<dyn MarketDataProvider>> {
    Ok(match &config.providers.market {
        Some(market) => Box::new(RateSheetProvider::new(
            &market.base_url,
            store.collection(MARKET_COLLECTION, true)?,
        )),
        None => Box::new(StaticMarketProvider::default()),
    })
}

/// Drops cached rate sheets so the next fetch goes to the provider.
pub async fn clear_market_cache(store: &KeyValueStore) -> Result<()> {
    store.collection(MARKET_COLLECTION, true)?.clear().await?;
    debug!("Cleared market cache");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_clear_market_cache() {
        let store = KeyValueStore::in_memory();
        let market = store.collection(MARKET_COLLECTION, true).unwrap();
        market.put(b"snapshot", b"{}", None).await.unwrap();

        clear_market_cache(&store).await.unwrap();
        assert!(market.get(b"snapshot").await.unwrap().is_none());
    }
}
