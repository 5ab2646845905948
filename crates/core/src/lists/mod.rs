//! Lists module - domain models, persistence and services.

mod lists_model;
mod lists_repository;
mod lists_service;
mod lists_traits;

#[cfg(test)]
mod lists_service_tests;

pub use lists_model::{ListItem, ListUpdate, NewStockList, StockList, UserSettings};
pub use lists_repository::{ListRepository, LISTS_KEY, SETTINGS_KEY};
pub use lists_service::ListService;
pub use lists_traits::{ListRepositoryTrait, ListServiceTrait};
