use std::{path::PathBuf, time::Duration};

const DEFAULT_DATA_FILE: &str = "./data/stockwatch.json";
const DEFAULT_REFRESH_INTERVAL_MS: u64 = 60_000;

pub struct Config {
    pub data_file: PathBuf,
    pub refresh_interval: Duration,
    /// Legacy v1 comma-separated symbols, read once for migration
    pub v1_symbols: Option<String>,
    pub log_format: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_file = lookup("STOCKWATCH_DATA_FILE")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATA_FILE.into());
        let refresh_ms: u64 = lookup("STOCKWATCH_REFRESH_INTERVAL_MS")
            .and_then(|s| s.trim().parse().ok())
            .filter(|ms| *ms > 0)
            .unwrap_or(DEFAULT_REFRESH_INTERVAL_MS);
        let v1_symbols = lookup("STOCKWATCH_SYMBOLS");
        let log_format = lookup("STOCKWATCH_LOG_FORMAT").unwrap_or_else(|| "text".into());

        Self {
            data_file: PathBuf::from(data_file),
            refresh_interval: Duration::from_millis(refresh_ms),
            v1_symbols,
            log_format,
        }
    }
}
