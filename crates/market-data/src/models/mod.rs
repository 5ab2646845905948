//! Market data models
//!
//! - `quote` - Quote snapshot, raw provider record and the per-symbol result
//! - `search` - Search hits and their display form

mod quote;
mod search;

pub use quote::{ProviderQuote, Quote, QuoteResult, INVALID_SYMBOL_MESSAGE, UNEXPECTED_ERROR_MESSAGE};
pub use search::{format_quote_type, ProviderSearchItem, SearchResult};
