use chrono::{DateTime, Utc};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// Message stored for any provider failure. UI text and callers key off this
/// exact string, so provider error details never replace it.
pub const INVALID_SYMBOL_MESSAGE: &str = "Invalid or unavailable symbol";

/// Message used when a batch entry fails to settle at all.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "Unexpected error";

/// Market data snapshot for one symbol.
///
/// Every field except `symbol` is optional because providers omit data for
/// some instruments (e.g. no market cap for currencies).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regular_market_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regular_market_change: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regular_market_change_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regular_market_day_high: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regular_market_day_low: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regular_market_volume: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regular_market_open: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regular_market_previous_close: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regular_market_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fifty_two_week_high: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fifty_two_week_low: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_type: Option<String>,
}

impl Quote {
    /// Create a quote carrying only a symbol.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Default::default()
        }
    }

    /// Build a quote from a provider record.
    ///
    /// The provider's echoed symbol wins over `requested` when present, since
    /// providers may canonicalize (e.g. append an exchange suffix).
    pub fn from_provider(requested: &str, raw: ProviderQuote) -> Self {
        Self {
            symbol: raw
                .symbol
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| requested.to_string()),
            short_name: raw.short_name,
            long_name: raw.long_name,
            regular_market_price: raw.regular_market_price,
            regular_market_change: raw.regular_market_change,
            regular_market_change_percent: raw.regular_market_change_percent,
            regular_market_day_high: raw.regular_market_day_high,
            regular_market_day_low: raw.regular_market_day_low,
            regular_market_volume: raw.regular_market_volume,
            regular_market_open: raw.regular_market_open,
            regular_market_previous_close: raw.regular_market_previous_close,
            regular_market_time: raw.regular_market_time,
            fifty_two_week_high: raw.fifty_two_week_high,
            fifty_two_week_low: raw.fifty_two_week_low,
            market_cap: raw.market_cap,
            currency: raw.currency,
            exchange: raw.exchange,
            quote_type: raw.quote_type,
        }
    }

    /// Best display name: short name, then long name, then the symbol.
    pub fn display_name(&self) -> &str {
        self.short_name
            .as_deref()
            .or(self.long_name.as_deref())
            .unwrap_or(&self.symbol)
    }
}

/// Raw single-symbol record as returned by a provider.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProviderQuote {
    /// Symbol echoed back by the provider, possibly canonicalized.
    pub symbol: Option<String>,
    pub short_name: Option<String>,
    pub long_name: Option<String>,
    pub regular_market_price: Option<f64>,
    pub regular_market_change: Option<f64>,
    pub regular_market_change_percent: Option<f64>,
    pub regular_market_day_high: Option<f64>,
    pub regular_market_day_low: Option<f64>,
    pub regular_market_volume: Option<f64>,
    pub regular_market_open: Option<f64>,
    pub regular_market_previous_close: Option<f64>,
    pub regular_market_time: Option<DateTime<Utc>>,
    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
    pub market_cap: Option<f64>,
    pub currency: Option<String>,
    pub exchange: Option<String>,
    pub quote_type: Option<String>,
}

/// Outcome of fetching one symbol.
///
/// Exactly one result is produced per requested symbol. The failure variant
/// carries the symbol as it was requested, not a provider-normalized one.
#[derive(Clone, Debug, PartialEq)]
pub enum QuoteResult {
    Ok(Quote),
    Err { symbol: String, error: String },
}

impl QuoteResult {
    /// Failure result with the fixed provider-failure message.
    pub fn invalid(symbol: impl Into<String>) -> Self {
        Self::Err {
            symbol: symbol.into(),
            error: INVALID_SYMBOL_MESSAGE.to_string(),
        }
    }

    /// Failure result for a batch entry that never settled.
    pub fn unexpected(symbol: impl Into<String>) -> Self {
        Self::Err {
            symbol: symbol.into(),
            error: UNEXPECTED_ERROR_MESSAGE.to_string(),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    /// The quote, if this is a success.
    pub fn quote(&self) -> Option<&Quote> {
        match self {
            Self::Ok(quote) => Some(quote),
            Self::Err { .. } => None,
        }
    }

    /// Symbol for display: the quote's symbol or the requested one.
    pub fn symbol(&self) -> &str {
        match self {
            Self::Ok(quote) => &quote.symbol,
            Self::Err { symbol, .. } => symbol,
        }
    }

    /// Error message, if this is a failure.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Ok(_) => None,
            Self::Err { error, .. } => Some(error),
        }
    }
}

impl Serialize for QuoteResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Ok(quote) => {
                let mut state = serializer.serialize_struct("QuoteResult", 2)?;
                state.serialize_field("ok", &true)?;
                state.serialize_field("data", quote)?;
                state.end()
            }
            Self::Err { symbol, error } => {
                let mut state = serializer.serialize_struct("QuoteResult", 3)?;
                state.serialize_field("ok", &false)?;
                state.serialize_field("symbol", symbol)?;
                state.serialize_field("error", error)?;
                state.end()
            }
        }
    }
}
