use crate::core::cache::KeyValueCollection;
use anyhow::{Context, Result};
use async_trait::async_trait;
use fjall::{Keyspace, PartitionHandle, PersistMode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tracing::debug;

#[derive(Serialize, Deserialize)]
struct DiskEntry {
    value: Vec<u8>,
    expires_at: Option<SystemTime>,
}

impl DiskEntry {
    fn is_live(&self, now: SystemTime) -> bool {
        self.expires_at.is_none_or(|expiry| expiry >= now)
    }
}

/// Collection stored in a fjall partition. Writes are synced before returning.
pub struct DiskCollection {
    keyspace: Arc<Keyspace>,
    partition: PartitionHandle,
}

impl DiskCollection {
    pub fn new(keyspace: Arc<Keyspace>, partition: PartitionHandle) -> Self {
        Self {
            keyspace,
            partition,
        }
    }

    fn decode(raw: &[u8]) -> Result<DiskEntry> {
        serde_json::from_slice(raw).context("Failed to decode stored entry")
    }

    fn sync(&self) -> Result<()> {
        self.keyspace
            .persist(PersistMode::SyncAll)
            .context("Failed to persist keyspace")
    }
}

#[async_trait]
impl KeyValueCollection for DiskCollection {
    async fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let Some(raw) = self.partition.get(key)? else {
            debug!("Disk MISS for key: {}", String::from_utf8_lossy(key));
            return Ok(None);
        };

        let entry = Self::decode(&raw)?;
        if !entry.is_live(SystemTime::now()) {
            debug!("Disk entry expired for key: {}", String::from_utf8_lossy(key));
            self.partition.remove(key)?;
            return Ok(None);
        }

        debug!("Disk HIT for key: {}", String::from_utf8_lossy(key));
        Ok(Some(entry.value))
    }

    async fn put(&self, key: &[u8], value: &[u8], ttl: Option<Duration>) -> Result<()> {
        let entry = DiskEntry {
            value: value.to_vec(),
            expires_at: ttl.map(|d| SystemTime::now() + d),
        };
        self.partition.insert(key, serde_json::to_vec(&entry)?)?;
        self.sync()?;
        debug!("Disk PUT for key: {}", String::from_utf8_lossy(key));
        Ok(())
    }

    async fn remove(&self, key: &[u8]) -> Result<()> {
        self.partition.remove(key)?;
        self.sync()?;
        debug!("Disk REMOVE for key: {}", String::from_utf8_lossy(key));
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let keys = self
            .partition
            .keys()
            .map(|key| key.map(|k| k.to_vec()))
            .collect::<Result<Vec<_>, _>>()?;
        for key in keys {
            self.partition.remove(key)?;
        }
        self.sync()?;
        debug!("Disk CLEAR");
        Ok(())
    }

    async fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        let now = SystemTime::now();
        let mut entries = Vec::new();
        for item in self.partition.prefix(prefix) {
            let (key, raw) = item?;
            let entry = Self::decode(&raw)?;
            if entry.is_live(now) {
                entries.push((key.to_vec(), entry.value));
            }
        }
        Ok(entries)
    }
}
