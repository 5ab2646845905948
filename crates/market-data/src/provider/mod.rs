//! Market data provider abstraction and the Yahoo Finance implementation.
//!
//! Only one provider is wired at a time. The trait exists so the caches can be
//! exercised against in-memory providers in tests.

mod traits;

pub mod yahoo;

pub use traits::MarketDataProvider;
