//! Error types for the market data crate.
//!
//! Provider implementations return [`MarketDataError`]. The quote cache folds
//! every variant into a single user-facing message, so the variants exist for
//! logging and for callers that talk to a provider directly.

use thiserror::Error;

/// Failure modes of a quote or search request.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// Provider has no data for this symbol.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// HTTP 429 from the provider.
    #[error("Rate limited: {provider}")]
    RateLimited {
        provider: String,
    },

    #[error("Timeout: {provider}")]
    Timeout {
        provider: String,
    },

    /// Anything else the provider reported, e.g. a non-success status.
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        provider: String,
        message: String,
    },

    /// The provider returned data that could not be interpreted.
    #[error("Validation failed: {message}")]
    ValidationFailed {
        message: String,
    },

    /// The provider does not implement the requested operation.
    #[error("{operation} is not supported by {provider}")]
    NotSupported {
        /// e.g. "search"
        operation: String,
        provider: String,
    },

    /// Transport failure before any response arrived.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MarketDataError {
    /// Shorthand for a [`MarketDataError::ProviderError`].
    pub fn provider(provider: &str, message: impl Into<String>) -> Self {
        Self::ProviderError {
            provider: provider.to_string(),
            message: message.into(),
        }
    }
}
