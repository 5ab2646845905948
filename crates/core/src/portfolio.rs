//! Position and portfolio valuation for lists that track holdings.

use std::collections::HashMap;

use log::warn;
use rust_decimal::prelude::*;
use serde::Serialize;
use stockwatch_market_data::Quote;

use crate::lists::{ListItem, StockList};

pub const DEFAULT_CURRENCY: &str = "USD";

/// Aggregate value of a portfolio list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioStats {
    pub total_value: Decimal,
    pub day_pl: Decimal,
    pub currency: String,
}

/// Valuation of a single position against its latest quote.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionMetrics {
    pub current_value: Option<Decimal>,
    pub day_pl: Option<Decimal>,
    pub unrealized_pl: Option<Decimal>,
    pub unrealized_pl_percent: Option<Decimal>,
    pub cost_per_share: Option<Decimal>,
}

fn decimal(value: Option<f64>) -> Option<Decimal> {
    value.and_then(Decimal::from_f64)
}

/// Units held, ignoring missing or zero positions.
fn held_units(item: &ListItem) -> Option<Decimal> {
    decimal(item.units).filter(|u| !u.is_zero())
}

/// Sum position values and day P&L over a portfolio list.
///
/// Returns `None` for plain watchlists. Items without a quote or without
/// units are skipped, as are figures too large to represent. The currency is
/// taken from the last priced quote.
pub fn portfolio_stats(list: &StockList, quotes: &HashMap<String, Quote>) -> Option<PortfolioStats> {
    if !list.is_portfolio {
        return None;
    }

    let mut stats = PortfolioStats {
        total_value: Decimal::ZERO,
        day_pl: Decimal::ZERO,
        currency: DEFAULT_CURRENCY.to_string(),
    };

    for item in &list.symbols {
        let (Some(quote), Some(units)) = (quotes.get(&item.symbol), held_units(item)) else {
            continue;
        };

        if let Some(price) = decimal(quote.regular_market_price) {
            match units
                .checked_mul(price)
                .and_then(|value| stats.total_value.checked_add(value))
            {
                Some(total) => stats.total_value = total,
                None => warn!("Value of {} overflows; left out of the total", item.symbol),
            }
            stats.currency = quote
                .currency
                .clone()
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());
        }
        if let Some(change) = decimal(quote.regular_market_change) {
            match units
                .checked_mul(change)
                .and_then(|pl| stats.day_pl.checked_add(pl))
            {
                Some(total) => stats.day_pl = total,
                None => warn!("Day P&L of {} overflows; left out of the total", item.symbol),
            }
        }
    }

    Some(stats)
}

/// Compute the per-position figures shown next to a holding.
pub fn position_metrics(item: &ListItem, quote: &Quote) -> PositionMetrics {
    let units = held_units(item);
    let cost_basis = decimal(item.cost_basis);
    let price = decimal(quote.regular_market_price);
    let change = decimal(quote.regular_market_change);

    // Figures that overflow Decimal are reported as missing.
    let current_value = units.zip(price).and_then(|(u, p)| u.checked_mul(p));
    let day_pl = match (units, change, price) {
        (Some(u), Some(c), Some(_)) => u.checked_mul(c),
        _ => None,
    };
    let unrealized_pl = current_value
        .zip(cost_basis)
        .and_then(|(v, c)| v.checked_sub(c));
    let unrealized_pl_percent = unrealized_pl
        .zip(cost_basis.filter(|c| !c.is_zero()))
        .and_then(|(pl, c)| pl.checked_div(c))
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED));
    let cost_per_share = cost_basis.zip(units).and_then(|(c, u)| c.checked_div(u));

    PositionMetrics {
        current_value,
        day_pl,
        unrealized_pl,
        unrealized_pl_percent,
        cost_per_share,
    }
}
