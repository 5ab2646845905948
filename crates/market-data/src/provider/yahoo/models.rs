//! Yahoo Finance API response models.
//!
//! These models parse the quoteSummary API response, which carries names,
//! day range and 52-week data that the chart endpoint does not.

use serde::Deserialize;

/// Main response wrapper for quoteSummary API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooQuoteSummaryResponse {
    pub quote_summary: YahooQuoteSummary,
}

/// Quote summary container
#[derive(Debug, Deserialize)]
pub struct YahooQuoteSummary {
    #[serde(default)]
    pub result: Option<Vec<YahooQuoteSummaryResult>>,
    // Note: error field exists in API but we handle errors via HTTP status/empty results
}

/// Individual result from quoteSummary API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooQuoteSummaryResult {
    pub price: Option<YahooPriceData>,
    pub summary_detail: Option<YahooSummaryDetail>,
}

/// Price data from quoteSummary API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooPriceData {
    pub symbol: Option<String>,
    pub currency: Option<String>,
    pub exchange: Option<String>,
    pub short_name: Option<String>,
    pub long_name: Option<String>,
    pub quote_type: Option<String>,
    pub regular_market_price: Option<YahooPriceDetail>,
    pub regular_market_change: Option<YahooPriceDetail>,
    /// Fraction, not percent: 0.0123 means +1.23%
    pub regular_market_change_percent: Option<YahooPriceDetail>,
    pub regular_market_open: Option<YahooPriceDetail>,
    pub regular_market_day_high: Option<YahooPriceDetail>,
    pub regular_market_day_low: Option<YahooPriceDetail>,
    pub regular_market_volume: Option<YahooPriceDetail>,
    pub regular_market_previous_close: Option<YahooPriceDetail>,
    pub market_cap: Option<YahooPriceDetail>,
    pub regular_market_time: Option<i64>,
}

/// Price detail with raw and formatted values
#[derive(Debug, Deserialize, Clone)]
pub struct YahooPriceDetail {
    pub raw: Option<f64>,
    // Note: fmt field exists but we only use raw values
}

/// Summary detail data (financial metrics)
/// Yahoo returns these as nested objects like {"raw": 123.45, "fmt": "123.45"}
/// or empty objects {} when no data is available.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooSummaryDetail {
    pub market_cap: Option<YahooPriceDetail>,
    pub fifty_two_week_high: Option<YahooPriceDetail>,
    pub fifty_two_week_low: Option<YahooPriceDetail>,
}

/// Unwrap an optional `{raw}` detail.
pub fn raw(detail: &Option<YahooPriceDetail>) -> Option<f64> {
    detail.as_ref().and_then(|d| d.raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_price_detail() {
        let json = r#"{"raw": 150.25, "fmt": "150.25"}"#;
        let detail: YahooPriceDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.raw, Some(150.25));
    }

    #[test]
    fn test_deserialize_empty_price_detail() {
        let detail: YahooPriceDetail = serde_json::from_str("{}").unwrap();
        assert_eq!(detail.raw, None);
    }

    #[test]
    fn test_deserialize_full_response() {
        let json = r#"{
            "quoteSummary": {
                "result": [{
                    "price": {
                        "symbol": "AAPL",
                        "currency": "USD",
                        "exchange": "NMS",
                        "shortName": "Apple Inc.",
                        "longName": "Apple Inc.",
                        "quoteType": "EQUITY",
                        "regularMarketPrice": {"raw": 189.5, "fmt": "189.50"},
                        "regularMarketChange": {"raw": 1.25, "fmt": "1.25"},
                        "regularMarketChangePercent": {"raw": 0.0066, "fmt": "0.66%"},
                        "regularMarketVolume": {"raw": 51234567, "fmt": "51.23M"},
                        "regularMarketTime": 1700000000
                    },
                    "summaryDetail": {
                        "fiftyTwoWeekHigh": {"raw": 199.62},
                        "fiftyTwoWeekLow": {"raw": 124.17},
                        "marketCap": {}
                    }
                }],
                "error": null
            }
        }"#;

        let response: YahooQuoteSummaryResponse = serde_json::from_str(json).unwrap();
        let result = response.quote_summary.result.unwrap();
        let price = result[0].price.as_ref().unwrap();
        assert_eq!(price.symbol.as_deref(), Some("AAPL"));
        assert_eq!(raw(&price.regular_market_price), Some(189.5));
        assert_eq!(raw(&price.regular_market_volume), Some(51234567.0));
        assert_eq!(price.regular_market_time, Some(1700000000));

        let detail = result[0].summary_detail.as_ref().unwrap();
        assert_eq!(raw(&detail.fifty_two_week_high), Some(199.62));
        assert_eq!(raw(&detail.market_cap), None);
    }

    #[test]
    fn test_deserialize_error_response() {
        let json = r#"{"quoteSummary": {"result": null, "error": {"code": "Not Found"}}}"#;
        let response: YahooQuoteSummaryResponse = serde_json::from_str(json).unwrap();
        assert!(response.quote_summary.result.is_none());
    }
}
