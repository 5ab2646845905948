//! Symbol search with a short-lived per-query cache.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, error};

use crate::cache::clock::{Clock, SystemClock};
use crate::models::{format_quote_type, ProviderSearchItem, SearchResult};
use crate::provider::MarketDataProvider;

/// Search results stay fresh for five minutes.
pub const SEARCH_CACHE_TTL_MS: i64 = 300_000;

const MAX_SEARCH_RESULTS: usize = 20;

struct CachedSearch {
    results: Vec<SearchResult>,
    fetched_at_ms: i64,
}

/// Provider search keyed by the normalized query text.
#[derive(Clone)]
pub struct SearchCache {
    provider: Arc<dyn MarketDataProvider>,
    clock: Arc<dyn Clock>,
    entries: Arc<DashMap<String, CachedSearch>>,
}

impl SearchCache {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self::with_clock(provider, Arc::new(SystemClock))
    }

    pub fn with_clock(provider: Arc<dyn MarketDataProvider>, clock: Arc<dyn Clock>) -> Self {
        Self {
            provider,
            clock,
            entries: Arc::new(DashMap::new()),
        }
    }

    /// Search for symbols matching `query`.
    ///
    /// Blank queries return nothing without touching the provider. Provider
    /// failures are logged and reported as an empty, uncached result.
    pub async fn search(&self, query: &str) -> Vec<SearchResult> {
        let key = query.trim().to_lowercase();
        if key.is_empty() {
            return Vec::new();
        }

        let now = self.clock.now_ms();
        if let Some(entry) = self.entries.get(&key) {
            if now - entry.fetched_at_ms < SEARCH_CACHE_TTL_MS {
                debug!("Search cache hit for '{}'", key);
                return entry.results.clone();
            }
        }

        let items = match self.provider.search(query).await {
            Ok(items) => items,
            Err(e) => {
                error!("Symbol search for '{}' failed: {}", query, e);
                return Vec::new();
            }
        };

        let results: Vec<SearchResult> = items
            .into_iter()
            .filter(|item| !item.symbol.is_empty() && !item.short_name.is_empty())
            .map(to_search_result)
            .take(MAX_SEARCH_RESULTS)
            .collect();

        self.entries.insert(
            key,
            CachedSearch {
                results: results.clone(),
                fetched_at_ms: self.clock.now_ms(),
            },
        );

        results
    }

    pub fn clear_cache(&self) {
        self.entries.clear();
    }
}

fn to_search_result(item: ProviderSearchItem) -> SearchResult {
    let name = [&item.short_name, &item.long_name, &item.symbol]
        .into_iter()
        .find(|s| !s.is_empty())
        .cloned()
        .unwrap_or_default();

    SearchResult::new(item.symbol, name, format_quote_type(Some(&item.quote_type)))
        .with_price(item.price)
        .with_exchange(item.exchange)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::clock::ManualClock;
    use crate::errors::MarketDataError;
    use crate::models::ProviderQuote;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct MockSearchProvider {
        items: Vec<ProviderSearchItem>,
        fail: bool,
        queries: Mutex<Vec<String>>,
    }

    impl MockSearchProvider {
        fn new(items: Vec<ProviderSearchItem>) -> Arc<Self> {
            Arc::new(Self {
                items,
                fail: false,
                queries: Mutex::new(Vec::new()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                items: Vec::new(),
                fail: true,
                queries: Mutex::new(Vec::new()),
            })
        }

        fn query_count(&self) -> usize {
            self.queries.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl MarketDataProvider for MockSearchProvider {
        fn id(&self) -> &'static str {
            "MOCK"
        }

        async fn get_latest_quote(&self, symbol: &str) -> Result<ProviderQuote, MarketDataError> {
            Err(MarketDataError::SymbolNotFound(symbol.to_string()))
        }

        async fn search(&self, query: &str) -> Result<Vec<ProviderSearchItem>, MarketDataError> {
            self.queries.lock().unwrap().push(query.to_string());
            if self.fail {
                return Err(MarketDataError::provider("MOCK", "search backend down"));
            }
            Ok(self.items.clone())
        }
    }

    fn item(symbol: &str, short: &str, long: &str, quote_type: &str) -> ProviderSearchItem {
        ProviderSearchItem {
            symbol: symbol.to_string(),
            short_name: short.to_string(),
            long_name: long.to_string(),
            quote_type: quote_type.to_string(),
            exchange: "NMS".to_string(),
            price: None,
        }
    }

    #[tokio::test]
    async fn test_blank_query_skips_provider() {
        let provider = MockSearchProvider::new(vec![item("AAPL", "Apple", "", "EQUITY")]);
        let cache = SearchCache::new(provider.clone());

        assert!(cache.search("   ").await.is_empty());
        assert!(cache.search("").await.is_empty());
        assert_eq!(provider.query_count(), 0);
    }

    #[tokio::test]
    async fn test_maps_and_filters_results() {
        let provider = MockSearchProvider::new(vec![
            item("AAPL", "Apple Inc.", "Apple Inc.", "EQUITY"),
            item("", "Nameless", "", "EQUITY"),
            item("XYZ", "", "Long Only Corp", "ETF"),
            item("BTC-USD", "Bitcoin USD", "", "CRYPTOCURRENCY"),
        ]);
        let cache = SearchCache::new(provider);

        let results = cache.search("a").await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].symbol, "AAPL");
        assert_eq!(results[0].name, "Apple Inc.");
        assert_eq!(results[0].asset_type, "Stock");
        assert_eq!(results[0].exchange.as_deref(), Some("NMS"));
        assert_eq!(results[1].asset_type, "Crypto");
    }

    #[tokio::test]
    async fn test_truncates_to_twenty() {
        let items = (0..30)
            .map(|i| item(&format!("SYM{}", i), "Name", "", "EQUITY"))
            .collect();
        let cache = SearchCache::new(MockSearchProvider::new(items));

        let results = cache.search("sym").await;
        assert_eq!(results.len(), MAX_SEARCH_RESULTS);
        assert_eq!(results[19].symbol, "SYM19");
    }

    #[tokio::test]
    async fn test_normalized_query_hits_cache() {
        let provider = MockSearchProvider::new(vec![item("AAPL", "Apple", "", "EQUITY")]);
        let clock = Arc::new(ManualClock::new(0));
        let cache = SearchCache::with_clock(provider.clone(), clock.clone());

        cache.search("Apple").await;
        clock.advance(SEARCH_CACHE_TTL_MS - 1);
        let results = cache.search("  apple ").await;

        assert_eq!(results.len(), 1);
        assert_eq!(provider.query_count(), 1);

        clock.advance(1);
        cache.search("apple").await;
        assert_eq!(provider.query_count(), 2);
    }

    #[tokio::test]
    async fn test_provider_error_returns_empty_and_is_not_cached() {
        let provider = MockSearchProvider::failing();
        let cache = SearchCache::new(provider.clone());

        assert!(cache.search("apple").await.is_empty());
        assert!(cache.search("apple").await.is_empty());
        assert_eq!(provider.query_count(), 2);
    }

    #[tokio::test]
    async fn test_clear_cache() {
        let provider = MockSearchProvider::new(vec![item("AAPL", "Apple", "", "EQUITY")]);
        let cache = SearchCache::new(provider.clone());

        cache.search("apple").await;
        cache.clear_cache();
        cache.search("apple").await;

        assert_eq!(provider.query_count(), 2);
    }
}
