use std::sync::Arc;

use stockwatch_core::{
    lists::{ListRepository, ListRepositoryTrait, ListService, ListServiceTrait},
    migration::{migrate_from_v1_if_needed, MigrationOutcome},
    storage::{FileStore, KeyValueStore},
};
use stockwatch_market_data::{
    MarketDataProvider, QuoteCache, SearchCache, SystemClock, YahooProvider,
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

pub struct AppState {
    pub repository: Arc<dyn ListRepositoryTrait>,
    pub lists: Arc<dyn ListServiceTrait>,
    pub quotes: QuoteCache,
    pub search: SearchCache,
}

pub fn init_tracing(log_format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so command output on stdout stays clean.
    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

pub fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(&config.data_file));
    tracing::debug!("Data file in use: {}", config.data_file.display());

    let repository: Arc<dyn ListRepositoryTrait> = Arc::new(ListRepository::new(store));
    let lists: Arc<dyn ListServiceTrait> = Arc::new(ListService::new(repository.clone()));

    let provider: Arc<dyn MarketDataProvider> = Arc::new(YahooProvider::new()?);

    Ok(Arc::new(AppState {
        repository,
        lists,
        quotes: QuoteCache::new(provider.clone()),
        search: SearchCache::new(provider),
    }))
}

/// Run the v1 migration once, before any command touches the lists.
pub async fn run_migration(
    state: &AppState,
    config: &Config,
) -> anyhow::Result<Option<MigrationOutcome>> {
    let outcome = migrate_from_v1_if_needed(
        state.repository.as_ref(),
        config.v1_symbols.as_deref(),
        &SystemClock,
    )
    .await?;
    Ok(outcome)
}
