//! Stockwatch Market Data Crate
//!
//! Quote and symbol search fetching for the Stockwatch lists.
//!
//! # Overview
//!
//! ```text
//! +------------------+     +------------------+
//! |   QuoteCache     |     |   SearchCache    |  (TTL, per symbol / per query)
//! +------------------+     +------------------+
//!          |                        |
//!          v                        v
//!        +----------------------------+
//!        |   MarketDataProvider       |  (Yahoo Finance)
//!        +----------------------------+
//! ```
//!
//! # Core Types
//!
//! - [`Quote`] - Latest market snapshot for one symbol
//! - [`QuoteResult`] - Per-symbol outcome of a fetch, success or failure
//! - [`SearchResult`] - Display-ready symbol search hit
//! - [`QuoteCache`] - 60 second cache over [`MarketDataProvider::get_latest_quote`]
//! - [`SearchCache`] - 5 minute cache over [`MarketDataProvider::search`]

pub mod cache;
pub mod errors;
pub mod models;
pub mod provider;

pub use cache::{
    Clock, ManualClock, QuoteCache, SearchCache, SystemClock, QUOTE_CACHE_TTL_MS,
    SEARCH_CACHE_TTL_MS,
};
pub use errors::MarketDataError;
pub use models::{
    format_quote_type, ProviderQuote, ProviderSearchItem, Quote, QuoteResult, SearchResult,
    INVALID_SYMBOL_MESSAGE, UNEXPECTED_ERROR_MESSAGE,
};
pub use provider::yahoo::YahooProvider;
pub use provider::MarketDataProvider;
