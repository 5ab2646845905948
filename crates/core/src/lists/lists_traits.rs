use async_trait::async_trait;

use crate::errors::Result;
use crate::lists::lists_model::{ListItem, ListUpdate, NewStockList, StockList, UserSettings};

/// Trait for list persistence
#[async_trait]
pub trait ListRepositoryTrait: Send + Sync {
    async fn load_lists(&self) -> Result<Vec<StockList>>;
    async fn save_lists(&self, lists: &[StockList]) -> Result<()>;
    async fn load_settings(&self) -> Result<UserSettings>;
    async fn save_settings(&self, settings: &UserSettings) -> Result<()>;
    /// True once lists have been saved at least once, even if empty.
    async fn lists_exist(&self) -> Result<bool>;
}

/// Trait for list service operations
#[async_trait]
pub trait ListServiceTrait: Send + Sync {
    async fn get_lists(&self) -> Result<Vec<StockList>>;
    async fn get_settings(&self) -> Result<UserSettings>;
    async fn create_list(&self, new_list: NewStockList) -> Result<StockList>;
    async fn update_list(&self, list_id: &str, update: ListUpdate) -> Result<StockList>;
    async fn delete_list(&self, list_id: &str) -> Result<Vec<StockList>>;
    async fn duplicate_list(&self, list_id: &str) -> Result<StockList>;
    async fn move_list_up(&self, index: usize) -> Result<Vec<StockList>>;
    async fn move_list_down(&self, index: usize) -> Result<Vec<StockList>>;
    async fn add_symbol(&self, list_id: &str, symbol: &str) -> Result<StockList>;
    async fn set_position(
        &self,
        list_id: &str,
        symbol: &str,
        units: f64,
        cost_basis: f64,
    ) -> Result<StockList>;
    async fn update_position(
        &self,
        list_id: &str,
        index: usize,
        units: Option<f64>,
        cost_basis: Option<f64>,
    ) -> Result<StockList>;
    async fn remove_symbol(&self, list_id: &str, index: usize) -> Result<StockList>;
    async fn move_symbol_up(&self, list_id: &str, index: usize) -> Result<StockList>;
    async fn move_symbol_down(&self, list_id: &str, index: usize) -> Result<StockList>;
    async fn move_symbol_to_list(
        &self,
        source_id: &str,
        index: usize,
        target_id: &str,
    ) -> Result<Vec<StockList>>;
    async fn default_list(&self) -> Result<Option<StockList>>;
    async fn all_symbols(&self) -> Result<Vec<String>>;
    /// Find a list by id, or by case-insensitive name.
    async fn find_list(&self, id_or_name: &str) -> Result<Option<StockList>>;
    async fn find_item(&self, list_id: &str, symbol: &str) -> Result<Option<(usize, ListItem)>>;
}
