use std::sync::Arc;

use async_trait::async_trait;
use log::error;

use crate::errors::Result;
use crate::lists::lists_model::{StockList, UserSettings};
use crate::lists::lists_traits::ListRepositoryTrait;
use crate::storage::KeyValueStore;

pub const LISTS_KEY: &str = "stockLists";
pub const SETTINGS_KEY: &str = "userSettings";

/// Lists and settings stored as two JSON blobs in a key-value store.
///
/// Blobs that fail to parse are logged and read as empty lists or default
/// settings; the next save overwrites them.
pub struct ListRepository {
    store: Arc<dyn KeyValueStore>,
}

impl ListRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ListRepositoryTrait for ListRepository {
    async fn load_lists(&self) -> Result<Vec<StockList>> {
        let raw = match self.store.get_item(LISTS_KEY).await? {
            Some(raw) if !raw.is_empty() => raw,
            _ => return Ok(Vec::new()),
        };

        match serde_json::from_str(&raw) {
            Ok(lists) => Ok(lists),
            Err(e) => {
                error!("Failed to parse stock lists from storage: {}", e);
                Ok(Vec::new())
            }
        }
    }

    async fn save_lists(&self, lists: &[StockList]) -> Result<()> {
        let json = serde_json::to_string(lists)?;
        self.store.set_item(LISTS_KEY, &json).await
    }

    async fn load_settings(&self) -> Result<UserSettings> {
        let raw = match self.store.get_item(SETTINGS_KEY).await? {
            Some(raw) if !raw.is_empty() => raw,
            _ => return Ok(UserSettings::default()),
        };

        match serde_json::from_str(&raw) {
            Ok(settings) => Ok(settings),
            Err(e) => {
                error!("Failed to parse user settings from storage: {}", e);
                Ok(UserSettings::default())
            }
        }
    }

    async fn save_settings(&self, settings: &UserSettings) -> Result<()> {
        let json = serde_json::to_string(settings)?;
        self.store.set_item(SETTINGS_KEY, &json).await
    }

    async fn lists_exist(&self) -> Result<bool> {
        Ok(self.store.get_item(LISTS_KEY).await?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lists::ListItem;
    use crate::storage::MemoryStore;

    fn repo() -> (ListRepository, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (ListRepository::new(store.clone()), store)
    }

    fn sample_list() -> StockList {
        StockList {
            id: "l1".to_string(),
            name: "Tech".to_string(),
            icon: "💼".to_string(),
            symbols: vec![ListItem::new("AAPL")],
            is_portfolio: false,
            created_at: 1,
            updated_at: 2,
        }
    }

    #[tokio::test]
    async fn test_empty_store_defaults() {
        let (repo, _) = repo();
        assert!(repo.load_lists().await.unwrap().is_empty());
        assert_eq!(repo.load_settings().await.unwrap(), UserSettings::default());
        assert!(!repo.lists_exist().await.unwrap());
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let (repo, _) = repo();
        repo.save_lists(&[sample_list()]).await.unwrap();
        repo.save_settings(&UserSettings {
            default_list_id: Some("l1".to_string()),
        })
        .await
        .unwrap();

        assert_eq!(repo.load_lists().await.unwrap(), vec![sample_list()]);
        assert_eq!(
            repo.load_settings().await.unwrap().default_list_id.as_deref(),
            Some("l1")
        );
    }

    #[tokio::test]
    async fn test_empty_array_counts_as_existing() {
        let (repo, _) = repo();
        repo.save_lists(&[]).await.unwrap();
        assert!(repo.lists_exist().await.unwrap());
    }

    #[tokio::test]
    async fn test_corrupt_blobs_fall_back_to_defaults() {
        let (repo, store) = repo();
        store.set_item(LISTS_KEY, "{broken").await.unwrap();
        store.set_item(SETTINGS_KEY, "[1,2]").await.unwrap();

        assert!(repo.load_lists().await.unwrap().is_empty());
        assert_eq!(repo.load_settings().await.unwrap(), UserSettings::default());
        assert!(repo.lists_exist().await.unwrap());
    }
}
