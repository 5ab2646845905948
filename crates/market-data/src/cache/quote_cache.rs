//! In-memory quote cache with a fixed TTL.
//!
//! Every fetch outcome, success or failure, is stored for [`QUOTE_CACHE_TTL_MS`].
//! A cached failure is replayed until it expires; there is no early retry.
//! Entries are never evicted, only overwritten once stale, which is fine for
//! the handful of symbols a user tracks.

use std::sync::Arc;

use dashmap::DashMap;
use futures::future::join_all;
use tracing::{debug, warn};

use crate::cache::clock::{Clock, SystemClock};
use crate::models::{Quote, QuoteResult};
use crate::provider::MarketDataProvider;

/// Quotes are considered fresh while `now - fetched_at < 60s`.
pub const QUOTE_CACHE_TTL_MS: i64 = 60_000;

/// A cached fetch outcome.
#[derive(Debug, Clone)]
pub struct CachedQuote {
    pub result: QuoteResult,
    pub fetched_at_ms: i64,
}

/// Quote fetcher with a per-symbol TTL cache in front of a provider.
///
/// Cloning is cheap and clones share the same cache.
#[derive(Clone)]
pub struct QuoteCache {
    provider: Arc<dyn MarketDataProvider>,
    clock: Arc<dyn Clock>,
    entries: Arc<DashMap<String, CachedQuote>>,
}

impl QuoteCache {
    /// Create a cache over `provider` using the wall clock.
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self::with_clock(provider, Arc::new(SystemClock))
    }

    /// Create a cache with an explicit time source.
    pub fn with_clock(provider: Arc<dyn MarketDataProvider>, clock: Arc<dyn Clock>) -> Self {
        Self {
            provider,
            clock,
            entries: Arc::new(DashMap::new()),
        }
    }

    /// Fetch one symbol, serving a fresh cached result when available.
    ///
    /// Never fails: provider errors become [`QuoteResult::Err`] with the fixed
    /// "Invalid or unavailable symbol" message.
    pub async fn fetch_one(&self, symbol: &str) -> QuoteResult {
        if let Some(cached) = self.fresh(symbol) {
            debug!("Quote cache hit for {}", symbol);
            return cached;
        }

        let result = match self.provider.get_latest_quote(symbol).await {
            Ok(raw) => QuoteResult::Ok(Quote::from_provider(symbol, raw)),
            Err(e) => {
                warn!(
                    "Quote fetch for {} from {} failed: {}",
                    symbol,
                    self.provider.id(),
                    e
                );
                QuoteResult::invalid(symbol)
            }
        };

        self.entries.insert(
            symbol.to_string(),
            CachedQuote {
                result: result.clone(),
                fetched_at_ms: self.clock.now_ms(),
            },
        );

        result
    }

    /// Fetch several symbols concurrently.
    ///
    /// `result[i]` always corresponds to `symbols[i]`. Duplicates are fetched
    /// independently. A fetch that never settles (its task panicked) yields an
    /// "Unexpected error" result for that position only.
    ///
    /// Each symbol is fetched on its own tokio task, so this must be called
    /// from within a tokio runtime.
    pub async fn fetch_many<S: AsRef<str>>(&self, symbols: &[S]) -> Vec<QuoteResult> {
        let handles = symbols.iter().map(|symbol| {
            let cache = self.clone();
            let symbol = symbol.as_ref().to_string();
            tokio::spawn(async move { cache.fetch_one(&symbol).await })
        });

        join_all(handles)
            .await
            .into_iter()
            .zip(symbols)
            .map(|(joined, symbol)| match joined {
                Ok(result) => result,
                Err(e) => {
                    warn!("Quote fetch task for {} did not complete: {}", symbol.as_ref(), e);
                    QuoteResult::unexpected(symbol.as_ref())
                }
            })
            .collect()
    }

    /// Drop every cached entry.
    pub fn clear_cache(&self) {
        self.entries.clear();
    }

    /// Number of cached entries, fresh or stale.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn fresh(&self, symbol: &str) -> Option<QuoteResult> {
        let now = self.clock.now_ms();
        self.entries
            .get(symbol)
            .filter(|entry| now - entry.fetched_at_ms < QUOTE_CACHE_TTL_MS)
            .map(|entry| entry.result.clone())
    }
}
