//! Stock list domain models.

use serde::{Deserialize, Serialize};

/// One symbol in a list, with optional position data for portfolios.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListItem {
    pub symbol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<f64>,
    /// Total amount paid for the position, not per share
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_basis: Option<f64>,
}

impl ListItem {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            units: None,
            cost_basis: None,
        }
    }

    pub fn with_position(symbol: impl Into<String>, units: f64, cost_basis: f64) -> Self {
        Self {
            symbol: symbol.into(),
            units: Some(units),
            cost_basis: Some(cost_basis),
        }
    }

    pub fn has_position(&self) -> bool {
        self.units.is_some_and(|u| u != 0.0)
    }
}

/// A named, ordered collection of symbols.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StockList {
    pub id: String,
    pub name: String,
    /// Emoji shown next to the name
    pub icon: String,
    pub symbols: Vec<ListItem>,
    pub is_portfolio: bool,
    /// Epoch milliseconds
    pub created_at: i64,
    /// Epoch milliseconds
    pub updated_at: i64,
}

impl StockList {
    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.iter().any(|item| item.symbol == symbol)
    }
}

/// Input model for creating a new list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStockList {
    pub name: String,
    pub icon: String,
    pub is_portfolio: bool,
}

/// Editable list properties
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUpdate {
    pub name: String,
    pub icon: String,
    pub is_portfolio: bool,
}

/// Persisted user preferences.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    /// List that quick-add actions target
    pub default_list_id: Option<String>,
}
