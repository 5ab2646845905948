//! Search result models for symbol lookup.

use serde::{Deserialize, Serialize};

/// Raw search hit as returned by a provider.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProviderSearchItem {
    pub symbol: String,
    pub short_name: String,
    pub long_name: String,
    /// Provider quote type (e.g. "EQUITY", "ETF", "CRYPTOCURRENCY")
    pub quote_type: String,
    pub exchange: String,
    pub price: Option<f64>,
}

/// Result from a ticker/symbol search, ready for display.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Symbol/ticker (e.g., "AAPL", "SHOP.TO")
    pub symbol: String,

    /// Display name (e.g., "Apple Inc.")
    pub name: String,

    /// Last price, when the provider includes one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,

    /// Human readable type (e.g., "Stock", "ETF", "Crypto")
    #[serde(rename = "type")]
    pub asset_type: String,

    /// Exchange code (e.g., "NMS")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange: Option<String>,
}

impl SearchResult {
    /// Create a new search result with required fields.
    pub fn new(
        symbol: impl Into<String>,
        name: impl Into<String>,
        asset_type: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
            price: None,
            asset_type: asset_type.into(),
            exchange: None,
        }
    }

    /// Set the price.
    pub fn with_price(mut self, price: Option<f64>) -> Self {
        self.price = price;
        self
    }

    /// Set the exchange. Empty strings are treated as absent.
    pub fn with_exchange(mut self, exchange: impl Into<String>) -> Self {
        let exchange = exchange.into();
        self.exchange = if exchange.is_empty() {
            None
        } else {
            Some(exchange)
        };
        self
    }
}

/// Map a provider quote type to the label shown to users.
pub fn format_quote_type(quote_type: Option<&str>) -> String {
    let Some(raw) = quote_type.filter(|t| !t.is_empty()) else {
        return "Unknown".to_string();
    };

    match raw.to_uppercase().as_str() {
        "EQUITY" => "Stock",
        "ETF" => "ETF",
        "MUTUALFUND" => "Mutual Fund",
        "INDEX" => "Index",
        "CRYPTOCURRENCY" => "Crypto",
        "FUTURE" => "Future",
        "CURRENCY" => "Currency",
        _ => raw,
    }
    .to_string()
}
