use crate::core::cache::KeyValueCollection;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

struct MemoryEntry {
    value: Vec<u8>,
    expires_at: Option<Instant>,
}

impl MemoryEntry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|expiry| expiry >= now)
    }
}

/// In-memory collection backed by an ordered map.
#[derive(Default)]
pub struct MemoryCollection {
    inner: Mutex<BTreeMap<Vec<u8>, MemoryEntry>>,
}

impl MemoryCollection {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueCollection for MemoryCollection {
    async fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let now = Instant::now();
        let mut entries = self.inner.lock().await;
        let lookup = entries
            .get(key)
            .map(|entry| entry.is_live(now).then(|| entry.value.clone()));
        match lookup {
            Some(Some(value)) => {
                debug!("Memory HIT for key: {}", String::from_utf8_lossy(key));
                Ok(Some(value))
            }
            Some(None) => {
                debug!("Memory entry expired for key: {}", String::from_utf8_lossy(key));
                entries.remove(key);
                Ok(None)
            }
            None => {
                debug!("Memory MISS for key: {}", String::from_utf8_lossy(key));
                Ok(None)
            }
        }
    }

    async fn put(&self, key: &[u8], value: &[u8], ttl: Option<Duration>) -> Result<()> {
        let entry = MemoryEntry {
            value: value.to_vec(),
            expires_at: ttl.map(|duration| Instant::now() + duration),
        };
        self.inner.lock().await.insert(key.to_vec(), entry);
        debug!("Memory PUT for key: {}", String::from_utf8_lossy(key));
        Ok(())
    }

    async fn remove(&self, key: &[u8]) -> Result<()> {
        self.inner.lock().await.remove(key);
        debug!("Memory REMOVE for key: {}", String::from_utf8_lossy(key));
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.inner.lock().await.clear();
        debug!("Memory CLEAR");
        Ok(())
    }

    async fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        let now = Instant::now();
        let entries = self.inner.lock().await;
        Ok(entries
            .range(prefix.to_vec()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .filter(|(_, entry)| entry.is_live(now))
            .map(|(key, entry)| (key.clone(), entry.value.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    #[tokio::test]
    async fn test_memory_get_put() {
        let collection = MemoryCollection::new();

        assert!(collection.get(b"key1").await.unwrap().is_none());

        collection.put(b"key1", b"123", None).await.unwrap();
        assert_eq!(collection.get(b"key1").await.unwrap(), Some(b"123".to_vec()));

        assert!(collection.get(b"key2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_memory_ttl_expiration() {
        let collection = MemoryCollection::new();

        collection
            .put(b"key1", b"123", Some(Duration::from_millis(10)))
            .await
            .unwrap();
        assert!(collection.get(b"key1").await.unwrap().is_some());

        sleep(Duration::from_millis(20)).await;
        assert!(collection.get(b"key1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_memory_remove_and_clear() {
        let collection = MemoryCollection::new();
        collection.put(b"key1", b"1", None).await.unwrap();
        collection.put(b"key2", b"2", None).await.unwrap();

        collection.remove(b"key1").await.unwrap();
        assert!(collection.get(b"key1").await.unwrap().is_none());
        assert!(collection.get(b"key2").await.unwrap().is_some());

        collection.clear().await.unwrap();
        assert!(collection.get(b"key2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_memory_scan_prefix() {
        let collection = MemoryCollection::new();
        collection.put(b"alice/2", b"b", None).await.unwrap();
        collection.put(b"alice/1", b"a", None).await.unwrap();
        collection.put(b"bob/1", b"c", None).await.unwrap();

        let entries = collection.scan_prefix(b"alice/").await.unwrap();
        assert_eq!(
            entries,
            vec![
                (b"alice/1".to_vec(), b"a".to_vec()),
                (b"alice/2".to_vec(), b"b".to_vec()),
            ]
        );
        assert_eq!(collection.scan_prefix(b"").await.unwrap().len(), 3);
    }
}
