use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};
use stockwatch_market_data::{Clock, SystemClock};
use uuid::Uuid;

use crate::errors::{Error, Result, ValidationError};
use crate::lists::lists_model::{ListItem, ListUpdate, NewStockList, StockList, UserSettings};
use crate::lists::lists_traits::{ListRepositoryTrait, ListServiceTrait};

const UNITS_ERROR: &str = "Units must be a positive number";
const COST_BASIS_ERROR: &str = "Cost basis must be a positive number";

/// List operations over a repository.
///
/// Every mutation loads the current collection, applies the change, stamps
/// `updated_at`, and saves the whole collection back.
pub struct ListService {
    repository: Arc<dyn ListRepositoryTrait>,
    clock: Arc<dyn Clock>,
}

impl ListService {
    pub fn new(repository: Arc<dyn ListRepositoryTrait>) -> Self {
        Self::with_clock(repository, Arc::new(SystemClock))
    }

    pub fn with_clock(repository: Arc<dyn ListRepositoryTrait>, clock: Arc<dyn Clock>) -> Self {
        ListService { repository, clock }
    }

    /// Apply `op` to one list and persist the collection.
    async fn update_one<F>(&self, list_id: &str, op: F) -> Result<StockList>
    where
        F: FnOnce(&mut StockList) -> Result<bool> + Send,
    {
        let mut lists = self.repository.load_lists().await?;
        let list = lists
            .iter_mut()
            .find(|l| l.id == list_id)
            .ok_or_else(|| Error::ListNotFound(list_id.to_string()))?;

        if op(list)? {
            list.updated_at = self.clock.now_ms();
            let updated = list.clone();
            self.repository.save_lists(&lists).await?;
            Ok(updated)
        } else {
            Ok(list.clone())
        }
    }

    async fn set_default_list(&self, list_id: &str) -> Result<()> {
        let mut settings = self.repository.load_settings().await?;
        settings.default_list_id = Some(list_id.to_string());
        self.repository.save_settings(&settings).await
    }

    async fn move_list(&self, from: usize, to: Option<usize>) -> Result<Vec<StockList>> {
        let mut lists = self.repository.load_lists().await?;
        match to {
            Some(to) if from < lists.len() && to < lists.len() => {
                lists.swap(from, to);
                self.repository.save_lists(&lists).await?;
            }
            _ => debug!("Ignoring list move from index {}", from),
        }
        Ok(lists)
    }
}

fn validate_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::InvalidInput("Name is required".to_string()).into());
    }
    Ok(trimmed.to_string())
}

fn require_positive(value: f64, message: &str) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::InvalidInput(message.to_string()).into())
    }
}

fn require_non_negative(value: Option<f64>, message: &str) -> Result<()> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => {
            Err(ValidationError::InvalidInput(message.to_string()).into())
        }
        _ => Ok(()),
    }
}

fn check_index(index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(ValidationError::IndexOutOfRange { index, len }.into())
    }
}

#[async_trait]
impl ListServiceTrait for ListService {
    async fn get_lists(&self) -> Result<Vec<StockList>> {
        self.repository.load_lists().await
    }

    async fn get_settings(&self) -> Result<UserSettings> {
        self.repository.load_settings().await
    }

    async fn create_list(&self, new_list: NewStockList) -> Result<StockList> {
        let name = validate_name(&new_list.name)?;
        let now = self.clock.now_ms();
        let list = StockList {
            id: Uuid::new_v4().to_string(),
            name,
            icon: new_list.icon,
            symbols: Vec::new(),
            is_portfolio: new_list.is_portfolio,
            created_at: now,
            updated_at: now,
        };

        let mut lists = self.repository.load_lists().await?;
        lists.push(list.clone());
        self.repository.save_lists(&lists).await?;
        info!("Created list '{}' ({})", list.name, list.id);
        Ok(list)
    }

    async fn update_list(&self, list_id: &str, update: ListUpdate) -> Result<StockList> {
        let name = validate_name(&update.name)?;
        self.update_one(list_id, |list| {
            list.name = name;
            list.icon = update.icon;
            list.is_portfolio = update.is_portfolio;
            Ok(true)
        })
        .await
    }

    async fn delete_list(&self, list_id: &str) -> Result<Vec<StockList>> {
        let mut lists = self.repository.load_lists().await?;
        let before = lists.len();
        lists.retain(|l| l.id != list_id);
        if lists.len() == before {
            return Err(Error::ListNotFound(list_id.to_string()));
        }
        self.repository.save_lists(&lists).await?;
        info!("Deleted list {}", list_id);
        Ok(lists)
    }

    async fn duplicate_list(&self, list_id: &str) -> Result<StockList> {
        let mut lists = self.repository.load_lists().await?;
        let source = lists
            .iter()
            .find(|l| l.id == list_id)
            .ok_or_else(|| Error::ListNotFound(list_id.to_string()))?;

        let now = self.clock.now_ms();
        let copy = StockList {
            id: Uuid::new_v4().to_string(),
            name: format!("{} (Copy)", source.name),
            created_at: now,
            updated_at: now,
            ..source.clone()
        };

        lists.push(copy.clone());
        self.repository.save_lists(&lists).await?;
        Ok(copy)
    }

    async fn move_list_up(&self, index: usize) -> Result<Vec<StockList>> {
        self.move_list(index, index.checked_sub(1)).await
    }

    async fn move_list_down(&self, index: usize) -> Result<Vec<StockList>> {
        self.move_list(index, index.checked_add(1)).await
    }

    async fn add_symbol(&self, list_id: &str, symbol: &str) -> Result<StockList> {
        let symbol = symbol.to_string();
        let updated = self
            .update_one(list_id, |list| {
                if list.contains(&symbol) {
                    return Err(Error::DuplicateSymbol {
                        symbol: symbol.clone(),
                        list: list.name.clone(),
                    });
                }
                list.symbols.push(ListItem::new(symbol.clone()));
                Ok(true)
            })
            .await?;

        self.set_default_list(list_id).await?;
        Ok(updated)
    }

    async fn set_position(
        &self,
        list_id: &str,
        symbol: &str,
        units: f64,
        cost_basis: f64,
    ) -> Result<StockList> {
        require_positive(units, UNITS_ERROR)?;
        require_positive(cost_basis, COST_BASIS_ERROR)?;

        let updated = self
            .update_one(list_id, |list| {
                match list.symbols.iter_mut().find(|item| item.symbol == symbol) {
                    Some(item) => {
                        item.units = Some(units);
                        item.cost_basis = Some(cost_basis);
                    }
                    None => list
                        .symbols
                        .push(ListItem::with_position(symbol, units, cost_basis)),
                }
                Ok(true)
            })
            .await?;

        self.set_default_list(list_id).await?;
        Ok(updated)
    }

    async fn update_position(
        &self,
        list_id: &str,
        index: usize,
        units: Option<f64>,
        cost_basis: Option<f64>,
    ) -> Result<StockList> {
        require_non_negative(units, UNITS_ERROR)?;
        require_non_negative(cost_basis, COST_BASIS_ERROR)?;

        // Zero units means the position is gone.
        let units = units.filter(|u| *u != 0.0);
        let cost_basis = units.and(cost_basis);

        self.update_one(list_id, |list| {
            check_index(index, list.symbols.len())?;
            let item = &mut list.symbols[index];
            item.units = units;
            item.cost_basis = cost_basis;
            Ok(true)
        })
        .await
    }

    async fn remove_symbol(&self, list_id: &str, index: usize) -> Result<StockList> {
        self.update_one(list_id, |list| {
            check_index(index, list.symbols.len())?;
            list.symbols.remove(index);
            Ok(true)
        })
        .await
    }

    async fn move_symbol_up(&self, list_id: &str, index: usize) -> Result<StockList> {
        self.update_one(list_id, |list| {
            if index == 0 || index >= list.symbols.len() {
                return Ok(false);
            }
            list.symbols.swap(index, index - 1);
            Ok(true)
        })
        .await
    }

    async fn move_symbol_down(&self, list_id: &str, index: usize) -> Result<StockList> {
        self.update_one(list_id, |list| {
            if index + 1 >= list.symbols.len() {
                return Ok(false);
            }
            list.symbols.swap(index, index + 1);
            Ok(true)
        })
        .await
    }

    async fn move_symbol_to_list(
        &self,
        source_id: &str,
        index: usize,
        target_id: &str,
    ) -> Result<Vec<StockList>> {
        let mut lists = self.repository.load_lists().await?;
        if source_id == target_id {
            return Ok(lists);
        }

        let source_pos = lists
            .iter()
            .position(|l| l.id == source_id)
            .ok_or_else(|| Error::ListNotFound(source_id.to_string()))?;
        let target_pos = lists
            .iter()
            .position(|l| l.id == target_id)
            .ok_or_else(|| Error::ListNotFound(target_id.to_string()))?;
        check_index(index, lists[source_pos].symbols.len())?;

        let keep_position = lists[source_pos].is_portfolio && lists[target_pos].is_portfolio;
        let now = self.clock.now_ms();

        let mut item = lists[source_pos].symbols.remove(index);
        lists[source_pos].updated_at = now;
        if !keep_position {
            item = ListItem::new(item.symbol);
        }
        debug!(
            "Moving {} from list {} to list {}",
            item.symbol, source_id, target_id
        );
        lists[target_pos].symbols.push(item);
        lists[target_pos].updated_at = now;

        self.repository.save_lists(&lists).await?;
        Ok(lists)
    }

    async fn default_list(&self) -> Result<Option<StockList>> {
        let lists = self.repository.load_lists().await?;
        let settings = self.repository.load_settings().await?;

        let preferred = settings
            .default_list_id
            .as_deref()
            .and_then(|id| lists.iter().find(|l| l.id == id));

        Ok(preferred.or_else(|| lists.first()).cloned())
    }

    async fn all_symbols(&self) -> Result<Vec<String>> {
        let lists = self.repository.load_lists().await?;
        let mut seen = HashSet::new();
        Ok(lists
            .iter()
            .flat_map(|l| l.symbols.iter())
            .filter(|item| seen.insert(item.symbol.clone()))
            .map(|item| item.symbol.clone())
            .collect())
    }

    async fn find_list(&self, id_or_name: &str) -> Result<Option<StockList>> {
        let lists = self.repository.load_lists().await?;
        let needle = id_or_name.trim();
        Ok(lists
            .iter()
            .find(|l| l.id == needle)
            .or_else(|| lists.iter().find(|l| l.name.eq_ignore_ascii_case(needle)))
            .cloned())
    }

    async fn find_item(&self, list_id: &str, symbol: &str) -> Result<Option<(usize, ListItem)>> {
        let lists = self.repository.load_lists().await?;
        let list = lists
            .iter()
            .find(|l| l.id == list_id)
            .ok_or_else(|| Error::ListNotFound(list_id.to_string()))?;
        Ok(list
            .symbols
            .iter()
            .position(|item| item.symbol.eq_ignore_ascii_case(symbol))
            .map(|i| (i, list.symbols[i].clone())))
    }
}
