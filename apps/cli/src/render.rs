//! Plain-text rendering of quotes, lists and positions.

use std::collections::HashMap;
use std::fmt::Write as _;

use chrono::{DateTime, Local, Utc};
use rust_decimal::prelude::*;
use stockwatch_core::lists::{ListItem, StockList};
use stockwatch_core::portfolio::{portfolio_stats, position_metrics, DEFAULT_CURRENCY};
use stockwatch_market_data::{Quote, QuoteResult, SearchResult};

const MISSING: &str = "—";

/// Group digits in thousands with a fixed number of decimals.
pub fn format_number(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}

fn currency_symbol(currency: &str) -> Option<&'static str> {
    match currency.to_uppercase().as_str() {
        "USD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        "JPY" => Some("¥"),
        "INR" => Some("₹"),
        _ => None,
    }
}

pub fn format_currency(value: Option<f64>, currency: &str) -> String {
    let Some(value) = value else {
        return MISSING.to_string();
    };
    let amount = format_number(value.abs(), 2);
    let sign = if value < 0.0 { "-" } else { "" };
    match currency_symbol(currency) {
        Some(symbol) => format!("{}{}{}", sign, symbol, amount),
        None => format!("{}{} {}", sign, currency.to_uppercase(), amount),
    }
}

fn format_decimal_currency(value: Option<Decimal>, currency: &str) -> String {
    format_currency(value.and_then(|d| d.round_dp(2).to_f64()), currency)
}

pub fn format_percent_change(percent: Option<f64>) -> String {
    match percent {
        Some(p) => format!("{}{:.2}%", if p >= 0.0 { "+" } else { "" }, p),
        None => String::new(),
    }
}

/// 1.23K, 4.56M, 7.89B, 1.00T
pub fn format_large_number(value: Option<f64>) -> String {
    let Some(value) = value else {
        return MISSING.to_string();
    };
    let tiers = [(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "K")];
    for (threshold, suffix) in tiers {
        if value >= threshold {
            return format!("{:.2}{}", value / threshold, suffix);
        }
    }
    format!("{:.0}", value)
}

fn signed_currency(value: Option<Decimal>, currency: &str) -> String {
    match value {
        Some(v) if v >= Decimal::ZERO => format!("+{}", format_decimal_currency(Some(v), currency)),
        other => format_decimal_currency(other, currency),
    }
}

fn quote_line(quote: &Quote) -> String {
    let price = format_currency(quote.regular_market_price, quote_currency(quote));
    format!(
        "{:<10} {:<28} {:>12} {:>8}",
        quote.symbol,
        truncate(quote.display_name(), 28),
        price,
        format_percent_change(quote.regular_market_change_percent)
    )
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

fn quote_currency(quote: &Quote) -> &str {
    quote.currency.as_deref().unwrap_or(DEFAULT_CURRENCY)
}

fn format_market_time(time: Option<DateTime<Utc>>) -> String {
    match time {
        Some(t) => t.with_timezone(&Local).format("%b %-d, %-I:%M %p").to_string(),
        None => MISSING.to_string(),
    }
}

/// Market data block shown under a row with `--detail`.
pub fn render_quote_detail(quote: &Quote) -> String {
    let currency = quote_currency(quote);
    let money = |value: Option<f64>| format_currency(value, currency);
    let rows = [
        ("As of", format_market_time(quote.regular_market_time)),
        ("Open", money(quote.regular_market_open)),
        ("High", money(quote.regular_market_day_high)),
        ("Low", money(quote.regular_market_day_low)),
        ("Close", money(quote.regular_market_previous_close)),
        ("52W High", money(quote.fifty_two_week_high)),
        ("52W Low", money(quote.fifty_two_week_low)),
        ("Volume", format_large_number(quote.regular_market_volume)),
        ("Mkt Cap", format_large_number(quote.market_cap)),
    ];

    let mut out = String::new();
    for (label, value) in rows {
        let _ = writeln!(out, "      {:<10} {}", label, value);
    }
    out
}

/// Render a list section: header, one row per symbol, position figures for
/// portfolio lists and, with `detail`, the market data block under each row.
pub fn render_list(
    list: &StockList,
    results: &HashMap<String, QuoteResult>,
    detail: bool,
) -> String {
    let quotes: HashMap<String, Quote> = results
        .iter()
        .filter_map(|(symbol, result)| result.quote().map(|q| (symbol.clone(), q.clone())))
        .collect();

    let count = list.symbols.len();
    let mut header = format!(
        "{} {}  ({} {})",
        list.icon,
        list.name,
        count,
        if count == 1 { "item" } else { "items" }
    );
    if let Some(stats) = portfolio_stats(list, &quotes) {
        header = format!(
            "{} {}  {}  Day: {}",
            list.icon,
            list.name,
            format_decimal_currency(Some(stats.total_value), &stats.currency),
            signed_currency(Some(stats.day_pl), &stats.currency)
        );
    }

    let mut out = String::new();
    let _ = writeln!(out, "{}", header);
    if list.symbols.is_empty() {
        let _ = writeln!(out, "  (empty)");
    }
    for item in &list.symbols {
        match results.get(&item.symbol) {
            Some(QuoteResult::Ok(quote)) => {
                let _ = write!(out, "  {}", quote_line(quote));
                if list.is_portfolio {
                    let _ = write!(out, "  {}", position_summary(item, quote));
                }
                let _ = writeln!(out);
                if detail {
                    out.push_str(&render_quote_detail(quote));
                }
            }
            Some(QuoteResult::Err { error, .. }) => {
                let _ = writeln!(out, "  {:<10} {}", item.symbol, error);
            }
            None => {
                let _ = writeln!(out, "  {:<10} {}", item.symbol, MISSING);
            }
        }
    }
    out
}

fn position_summary(item: &ListItem, quote: &Quote) -> String {
    let Some(units) = item.units else {
        return format!("{} shares", MISSING);
    };
    let currency = quote_currency(quote);
    let metrics = position_metrics(item, quote);

    let mut summary = format!(
        "{} shares · {}  Day: {}",
        units,
        format_decimal_currency(metrics.current_value, currency),
        format_decimal_currency(metrics.day_pl, currency)
    );
    if let (Some(pl), Some(pct)) = (metrics.unrealized_pl, metrics.unrealized_pl_percent) {
        let _ = write!(
            summary,
            "  P&L: {} ({}{:.2}%)",
            signed_currency(Some(pl), currency),
            if pl >= Decimal::ZERO { "+" } else { "" },
            pct.round_dp(2)
        );
    }
    summary
}

pub fn render_lists_overview(lists: &[StockList], default_list_id: Option<&str>) -> String {
    if lists.is_empty() {
        return "No lists yet. Create one with `stockwatch lists create <name>`.\n".to_string();
    }

    let mut out = String::new();
    for (index, list) in lists.iter().enumerate() {
        let marker = if Some(list.id.as_str()) == default_list_id {
            " (default)"
        } else {
            ""
        };
        let kind = if list.is_portfolio { "portfolio" } else { "watchlist" };
        let symbols: Vec<&str> = list.symbols.iter().map(|i| i.symbol.as_str()).collect();
        let _ = writeln!(
            out,
            "{}. {} {} [{}]{}  {}",
            index + 1,
            list.icon,
            list.name,
            kind,
            marker,
            list.id
        );
        if !symbols.is_empty() {
            let _ = writeln!(out, "   {}", symbols.join(", "));
        }
    }
    out
}

pub fn render_search_results(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return "No results.\n".to_string();
    }
    let mut out = String::new();
    for result in results {
        let _ = writeln!(
            out,
            "{:<12} {:<36} {:<12} {}",
            result.symbol,
            truncate(&result.name, 36),
            result.asset_type,
            result.exchange.as_deref().unwrap_or("")
        );
    }
    out
}
