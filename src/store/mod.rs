pub mod disk;
pub mod memory;
pub mod records;

use crate::core::cache::{KeyValueCollection, Store};
use anyhow::{Context, Result};
use disk::DiskCollection;
use fjall::{Keyspace, PartitionCreateOptions};
use memory::MemoryCollection;
use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, RwLock},
};
use tracing::{debug, warn};

/// A thread-safe key-value store that can hold multiple collections.
pub struct KeyValueStore {
    collections: RwLock<HashMap<String, Arc<dyn KeyValueCollection>>>,
    keyspace: Option<Arc<Keyspace>>,
}

impl KeyValueStore {
    /// Opens (or creates) the on-disk keyspace under `data_path`.
    pub fn open(data_path: &Path) -> Result<Self> {
        let db_path = data_path.join("db");
        std::fs::create_dir_all(&db_path)
            .with_context(|| format!("Failed to create data directory: {}", db_path.display()))?;
        let keyspace = fjall::Config::new(&db_path)
            .open()
            .with_context(|| format!("Failed to open data store at {}", db_path.display()))?;
        debug!("Opened data store at {}", db_path.display());

        Ok(Self {
            collections: RwLock::new(HashMap::new()),
            keyspace: Some(Arc::new(keyspace)),
        })
    }

    /// A store without a disk backend; persistent collections are kept in memory.
    pub fn in_memory() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            keyspace: None,
        }
    }

    /// Like [`Store::get_collection`] with `create_if_missing`, but reports why it failed.
    pub fn collection(&self, name: &str, persist: bool) -> Result<Arc<dyn KeyValueCollection>> {
        self.get_collection(name, persist, true)
            .with_context(|| format!("Failed to open collection '{name}'"))
    }

    fn create_collection(&self, name: &str, persist: bool) -> Option<Arc<dyn KeyValueCollection>> {
        match (&self.keyspace, persist) {
            (Some(keyspace), true) => {
                match keyspace.open_partition(name, PartitionCreateOptions::default()) {
                    Ok(partition) => Some(Arc::new(DiskCollection::new(
                        Arc::clone(keyspace),
                        partition,
                    )) as Arc<dyn KeyValueCollection>),
                    Err(e) => {
                        warn!("Failed to open partition {name}: {e}");
                        None
                    }
                }
            }
            _ => Some(Arc::new(MemoryCollection::new()) as Arc<dyn KeyValueCollection>),
        }
    }
}

impl Store for KeyValueStore {
    fn get_collection(
        &self,
        name: &str,
        persist: bool,
        create_if_missing: bool,
    ) -> Option<Arc<dyn KeyValueCollection>> {
        if let Some(collection) = self
            .collections
            .read()
            .ok()
            .and_then(|collections| collections.get(name).cloned())
        {
            return Some(collection);
        }

        if !create_if_missing {
            return None;
        }

        let mut collections = self.collections.write().ok()?;
        if let Some(existing) = collections.get(name) {
            return Some(Arc::clone(existing));
        }
        let collection = self.create_collection(name, persist)?;
        collections.insert(name.to_string(), Arc::clone(&collection));
        Some(collection)
    }
}
