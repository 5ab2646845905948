//! TTL caches in front of a market data provider.

pub mod clock;
mod quote_cache;
mod search_cache;


pub use clock::{Clock, ManualClock, SystemClock};
pub use quote_cache::{CachedQuote, QuoteCache, QUOTE_CACHE_TTL_MS};
pub use search_cache::{SearchCache, SEARCH_CACHE_TTL_MS};
