//! Market data provider trait definitions.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::{ProviderQuote, ProviderSearchItem};

/// Trait for market data providers.
///
/// Implement this trait to plug a quote source into the caches. Failures are
/// reported as `Err`; the caches decide how much of them reaches the caller.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use stockwatch_market_data::provider::MarketDataProvider;
///
/// struct StaticProvider;
///
/// #[async_trait]
/// impl MarketDataProvider for StaticProvider {
///     fn id(&self) -> &'static str {
///         "STATIC"
///     }
///
///     async fn get_latest_quote(&self, symbol: &str) -> Result<ProviderQuote, MarketDataError> {
///         Ok(ProviderQuote {
///             symbol: Some(symbol.to_string()),
///             regular_market_price: Some(1.0),
///             ..Default::default()
///         })
///     }
/// }
/// ```
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Unique identifier for this provider, e.g. "YAHOO". Used in logs.
    fn id(&self) -> &'static str;

    /// Fetch the latest quote for a single symbol.
    async fn get_latest_quote(&self, symbol: &str) -> Result<ProviderQuote, MarketDataError>;

    /// Search for symbols matching the query.
    ///
    /// Default implementation returns `NotSupported`.
    async fn search(&self, query: &str) -> Result<Vec<ProviderSearchItem>, MarketDataError> {
        let _ = query;
        Err(MarketDataError::NotSupported {
            operation: "search".to_string(),
            provider: self.id().to_string(),
        })
    }
}
