//! Yahoo Finance market data provider.
//!
//! Covers everything Yahoo lists under a single ticker:
//! - Equities/ETFs (e.g., AAPL, SHOP.TO)
//! - Cryptocurrencies (e.g., BTC-USD)
//! - Foreign exchange rates (e.g., EURUSD=X)

mod models;

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use lazy_static::lazy_static;
use reqwest::{header, StatusCode};
use tracing::debug;
use urlencoding::encode;
use yahoo_finance_api as yahoo;

use crate::errors::MarketDataError;
use crate::models::{ProviderQuote, ProviderSearchItem};
use crate::provider::MarketDataProvider;

use models::{raw, YahooQuoteSummaryResponse, YahooQuoteSummaryResult};

const PROVIDER_ID: &str = "YAHOO";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

// ============================================================================
// Crumb/Cookie Authentication
// ============================================================================

/// Cached Yahoo authentication data
#[derive(Debug, Clone)]
struct CrumbData {
    cookie: String,
    crumb: String,
}

lazy_static! {
    /// Global cache for Yahoo authentication crumb
    static ref YAHOO_CRUMB: RwLock<Option<CrumbData>> = RwLock::default();
}

// ============================================================================
// Yahoo Provider
// ============================================================================

/// Yahoo Finance market data provider.
pub struct YahooProvider {
    connector: yahoo::YahooConnector,
    client: reqwest::Client,
}

impl YahooProvider {
    /// Create a new Yahoo Finance provider.
    pub fn new() -> Result<Self, MarketDataError> {
        let connector = yahoo::YahooConnector::new().map_err(|e| {
            MarketDataError::provider(
                PROVIDER_ID,
                format!("Failed to initialize Yahoo connector: {}", e),
            )
        })?;
        Ok(Self {
            connector,
            client: reqwest::Client::new(),
        })
    }

    /// Ensure we have a valid Yahoo authentication crumb.
    async fn ensure_crumb(&self) -> Result<CrumbData, MarketDataError> {
        {
            let guard = YAHOO_CRUMB.read().unwrap_or_else(|e| e.into_inner());
            if let Some(crumb) = guard.as_ref() {
                return Ok(crumb.clone());
            }
        }

        self.fetch_crumb().await
    }

    /// Fetch a new Yahoo authentication crumb.
    async fn fetch_crumb(&self) -> Result<CrumbData, MarketDataError> {
        // Step 1: Get cookie from fc.yahoo.com
        let response = self
            .client
            .get("https://fc.yahoo.com")
            .send()
            .await
            .map_err(|e| MarketDataError::provider(PROVIDER_ID, format!("Failed to get cookie: {}", e)))?;

        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.split_once(';').map(|(v, _)| v.to_string()))
            .ok_or_else(|| MarketDataError::provider(PROVIDER_ID, "Failed to parse Yahoo cookie"))?;

        // Step 2: Get crumb using cookie
        let crumb = self
            .client
            .get("https://query1.finance.yahoo.com/v1/test/getcrumb")
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::COOKIE, &cookie)
            .send()
            .await
            .map_err(|e| MarketDataError::provider(PROVIDER_ID, format!("Failed to get crumb: {}", e)))?
            .text()
            .await
            .map_err(|e| MarketDataError::provider(PROVIDER_ID, format!("Failed to read crumb: {}", e)))?;

        let crumb_data = CrumbData { cookie, crumb };

        let mut guard = YAHOO_CRUMB.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(crumb_data.clone());

        Ok(crumb_data)
    }

    /// Clear the cached crumb (used when authentication fails)
    fn clear_crumb(&self) {
        let mut guard = YAHOO_CRUMB.write().unwrap_or_else(|e| e.into_inner());
        *guard = None;
    }

    /// Fetch the price and summary modules for one symbol.
    async fn fetch_quote_summary(
        &self,
        symbol: &str,
    ) -> Result<YahooQuoteSummaryResult, MarketDataError> {
        let crumb = self.ensure_crumb().await?;

        let url = format!(
            "https://query1.finance.yahoo.com/v10/finance/quoteSummary/{}?modules=price,summaryDetail&crumb={}",
            encode(symbol),
            encode(&crumb.crumb)
        );

        let response = self
            .client
            .get(&url)
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::COOKIE, &crumb.cookie)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    MarketDataError::Timeout {
                        provider: PROVIDER_ID.to_string(),
                    }
                } else {
                    MarketDataError::Network(e)
                }
            })?;

        match response.status() {
            StatusCode::UNAUTHORIZED => {
                self.clear_crumb();
                return Err(MarketDataError::provider(
                    PROVIDER_ID,
                    "Yahoo authentication expired",
                ));
            }
            StatusCode::NOT_FOUND => return Err(MarketDataError::SymbolNotFound(symbol.to_string())),
            StatusCode::TOO_MANY_REQUESTS => {
                return Err(MarketDataError::RateLimited {
                    provider: PROVIDER_ID.to_string(),
                })
            }
            _ => {}
        }

        let data: YahooQuoteSummaryResponse = response.json().await.map_err(|e| {
            MarketDataError::provider(PROVIDER_ID, format!("Failed to parse quote response: {}", e))
        })?;

        data.quote_summary
            .result
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| MarketDataError::SymbolNotFound(symbol.to_string()))
    }
}

/// Map a quoteSummary result onto the provider record.
fn summary_to_provider_quote(result: YahooQuoteSummaryResult) -> Result<ProviderQuote, MarketDataError> {
    let price = result.price.ok_or_else(|| MarketDataError::ValidationFailed {
        message: "Response has no price module".to_string(),
    })?;
    let detail = result.summary_detail;

    Ok(ProviderQuote {
        symbol: price.symbol,
        short_name: price.short_name,
        long_name: price.long_name,
        regular_market_price: raw(&price.regular_market_price),
        regular_market_change: raw(&price.regular_market_change),
        regular_market_change_percent: raw(&price.regular_market_change_percent).map(|f| f * 100.0),
        regular_market_day_high: raw(&price.regular_market_day_high),
        regular_market_day_low: raw(&price.regular_market_day_low),
        regular_market_volume: raw(&price.regular_market_volume),
        regular_market_open: raw(&price.regular_market_open),
        regular_market_previous_close: raw(&price.regular_market_previous_close),
        regular_market_time: price
            .regular_market_time
            .and_then(|ts| Utc.timestamp_opt(ts, 0).single()),
        fifty_two_week_high: detail.as_ref().and_then(|d| raw(&d.fifty_two_week_high)),
        fifty_two_week_low: detail.as_ref().and_then(|d| raw(&d.fifty_two_week_low)),
        market_cap: raw(&price.market_cap)
            .or_else(|| detail.as_ref().and_then(|d| raw(&d.market_cap))),
        currency: price.currency,
        exchange: price.exchange,
        quote_type: price.quote_type,
    })
}

// ============================================================================
// MarketDataProvider Implementation
// ============================================================================

#[async_trait]
impl MarketDataProvider for YahooProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn get_latest_quote(&self, symbol: &str) -> Result<ProviderQuote, MarketDataError> {
        debug!("Fetching latest quote for {} from Yahoo", symbol);
        let result = self.fetch_quote_summary(symbol).await?;
        summary_to_provider_quote(result)
    }

    async fn search(&self, query: &str) -> Result<Vec<ProviderSearchItem>, MarketDataError> {
        let encoded_query = encode(query);

        debug!("Searching Yahoo for '{}'", query);

        let result = self
            .connector
            .search_ticker(&encoded_query)
            .await
            .map_err(|e| MarketDataError::provider(PROVIDER_ID, e.to_string()))?;

        Ok(result
            .quotes
            .into_iter()
            .map(|item| ProviderSearchItem {
                symbol: item.symbol,
                short_name: item.short_name,
                long_name: item.long_name,
                quote_type: item.quote_type,
                exchange: item.exchange,
                price: None,
            })
            .collect())
    }
}
