//! Storage abstractions shared by record repositories and provider caches.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// A named set of byte keys and values.
///
/// Entries written with a TTL read as absent once it has elapsed.
#[async_trait]
pub trait KeyValueCollection: Send + Sync {
    async fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;

    async fn put(&self, key: &[u8], value: &[u8], ttl: Option<Duration>) -> Result<()>;

    async fn remove(&self, key: &[u8]) -> Result<()>;

    async fn clear(&self) -> Result<()>;

    /// Live entries whose key starts with `prefix`, in key order.
    async fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>>;
}

pub trait Store: Send + Sync {
    /// Returns the collection called `name`. `persist` selects the on-disk backend
    /// when the store has one.
    fn get_collection(
        &self,
        name: &str,
        persist: bool,
        create_if_missing: bool,
    ) -> Option<Arc<dyn KeyValueCollection>>;
}
