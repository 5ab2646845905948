use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::KeyValueStore;
use crate::errors::{Result, StorageError};

/// Process-local store. Used by tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        let items = self.items.read().map_err(|_| StorageError::LockPoisoned)?;
        Ok(items.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut items = self.items.write().map_err(|_| StorageError::LockPoisoned)?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        let mut items = self.items.write().map_err(|_| StorageError::LockPoisoned)?;
        items.remove(key);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let mut items = self.items.write().map_err(|_| StorageError::LockPoisoned)?;
        items.clear();
        Ok(())
    }
}
