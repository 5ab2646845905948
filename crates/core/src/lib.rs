//! Stockwatch Core - stock lists, positions and their persistence.
//!
//! Lists and user settings live as two JSON blobs in a [`storage::KeyValueStore`].
//! Quotes come from `stockwatch-market-data`; this crate only decides which
//! symbols to ask for and how holdings are valued.

pub mod errors;
pub mod export;
pub mod lists;
pub mod migration;
pub mod portfolio;
pub mod refresher;
pub mod storage;
pub mod symbols;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
