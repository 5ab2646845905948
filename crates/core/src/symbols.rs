//! Symbol list parsing.

use std::collections::HashSet;

/// Parse a comma-separated symbol string into unique uppercase tickers.
///
/// Entries are trimmed, empty entries dropped, and the first occurrence of a
/// repeated symbol wins.
pub fn parse_symbols(input: Option<&str>) -> Vec<String> {
    let Some(input) = input else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    input
        .split(',')
        .map(|raw| raw.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.clone()))
        .collect()
}

/// "1 stock", "2 stocks"
pub fn pluralize(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}
