//! One-time migration from the v1 comma-separated symbol preference.
//!
//! v1 stored a single `STOCKWATCH_SYMBOLS`-style string. v2 keeps named lists
//! in the key-value store. The migration only runs while no lists have ever
//! been saved, and it never touches the v1 value.

use log::{debug, info};
use stockwatch_market_data::Clock;
use uuid::Uuid;

use crate::errors::Result;
use crate::lists::{ListItem, ListRepositoryTrait, StockList};
use crate::symbols::{parse_symbols, pluralize};

pub const MIGRATED_LIST_NAME: &str = "Watchlist";
pub const MIGRATED_LIST_ICON: &str = "📋";

/// What a completed migration produced.
#[derive(Debug, Clone, PartialEq)]
pub struct MigrationOutcome {
    pub list: StockList,
    pub migrated_count: usize,
}

impl MigrationOutcome {
    /// User-facing summary, e.g. "Migrated 3 stocks to your Watchlist".
    pub fn message(&self) -> String {
        format!(
            "Migrated {} to your {}",
            pluralize(self.migrated_count, "stock"),
            MIGRATED_LIST_NAME
        )
    }
}

/// True when no lists exist yet and the v1 value holds at least one symbol.
pub async fn needs_migration(
    repository: &dyn ListRepositoryTrait,
    v1_symbols: Option<&str>,
) -> Result<bool> {
    if repository.lists_exist().await? {
        return Ok(false);
    }
    Ok(!parse_symbols(v1_symbols).is_empty())
}

/// Create the "Watchlist" list from the v1 symbols if migration is needed.
pub async fn migrate_from_v1_if_needed(
    repository: &dyn ListRepositoryTrait,
    v1_symbols: Option<&str>,
    clock: &dyn Clock,
) -> Result<Option<MigrationOutcome>> {
    if repository.lists_exist().await? {
        debug!("Lists already exist, skipping v1 migration");
        return Ok(None);
    }

    let symbols = parse_symbols(v1_symbols);
    if symbols.is_empty() {
        return Ok(None);
    }

    let now = clock.now_ms();
    let list = StockList {
        id: Uuid::new_v4().to_string(),
        name: MIGRATED_LIST_NAME.to_string(),
        icon: MIGRATED_LIST_ICON.to_string(),
        symbols: symbols.into_iter().map(ListItem::new).collect(),
        is_portfolio: false,
        created_at: now,
        updated_at: now,
    };

    repository.save_lists(std::slice::from_ref(&list)).await?;

    let outcome = MigrationOutcome {
        migrated_count: list.symbols.len(),
        list,
    };
    info!("{}", outcome.message());
    Ok(Some(outcome))
}
