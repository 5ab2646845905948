use std::{collections::BTreeMap, fs, path::PathBuf, sync::Mutex};

use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};

use super::KeyValueStore;
use crate::errors::{Result, StorageError};

const CURRENT_VERSION: u32 = 1;

/// Key-value store backed by a single pretty-printed JSON file.
///
/// The file is re-read on every operation so external edits are picked up.
/// A missing or empty file is an empty store.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

#[derive(Serialize, Deserialize, Default)]
struct StoreFile {
    version: u32,
    items: BTreeMap<String, String>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn with_store<F>(&self, op: F) -> Result<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let _guard = self.lock.lock().map_err(|_| StorageError::LockPoisoned)?;
        let mut items = self.load_locked()?;
        op(&mut items);
        self.persist_locked(items)
    }

    fn read_store(&self) -> Result<BTreeMap<String, String>> {
        let _guard = self.lock.lock().map_err(|_| StorageError::LockPoisoned)?;
        self.load_locked()
    }

    fn load_locked(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let raw = fs::read(&self.path)?;
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(BTreeMap::new());
        }

        let file: StoreFile = serde_json::from_slice(&raw).map_err(|e| {
            StorageError::Corrupt(format!("{}: {}", self.path.display(), e))
        })?;
        Ok(file.items)
    }

    fn persist_locked(&self, items: BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = StoreFile {
            version: CURRENT_VERSION,
            items,
        };
        let json = serde_json::to_string_pretty(&file)?;
        fs::write(&self.path, json)?;
        debug!("Persisted store to {}", self.path.display());
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        let items = self.read_store()?;
        Ok(items.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.with_store(|items| {
            items.insert(key.to_string(), value.to_string());
        })
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        self.with_store(|items| {
            items.remove(key);
        })
    }

    async fn clear(&self) -> Result<()> {
        self.with_store(|items| items.clear())
    }
}
