use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use chrono::{Local, Utc};
use serde_json::json;
use stockwatch_core::{
    export::{export_to_json, import_data, validate_import_data},
    lists::{ListItem, ListUpdate, NewStockList, StockList},
    portfolio::portfolio_stats,
    refresher::start_refresher,
    symbols::pluralize,
};
use stockwatch_market_data::{Quote, QuoteResult};
use tracing::{debug, error, info};

use crate::cli::{AddArgs, Command, ListFilter, ListsCommand, MoveArgs, PositionArgs};
use crate::config::Config;
use crate::main_lib::AppState;
use crate::render;

pub async fn run(state: Arc<AppState>, config: &Config, command: Command, json: bool) -> Result<()> {
    match command {
        Command::Quotes(filter) => show_quotes(&state, &filter, json).await,
        Command::Search { query } => search(&state, &query, json).await,
        Command::Lists(cmd) => lists(&state, cmd, json).await,
        Command::Add(args) => add(&state, args).await,
        Command::Remove { list, symbol } => remove(&state, &list, &symbol).await,
        Command::Position(args) => position(&state, args).await,
        Command::Move(args) => move_symbol(&state, args).await,
        Command::Export { output } => {
            let lists = state.lists.get_lists().await?;
            let settings = state.repository.load_settings().await?;
            let document = export_to_json(&lists, &settings, Utc::now())?;
            match output {
                Some(path) => {
                    std::fs::write(&path, document)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    println!(
                        "Exported {} to {}",
                        pluralize(lists.len(), "list"),
                        path.display()
                    );
                }
                None => println!("{}", document),
            }
            Ok(())
        }
        Command::Import { file, dry_run } => {
            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let data = validate_import_data(&raw)?;
            if dry_run {
                let stocks: usize = data.lists.iter().map(|l| l.symbols.len()).sum();
                println!(
                    "Valid export: {} with {}",
                    pluralize(data.lists.len(), "list"),
                    pluralize(stocks, "stock")
                );
                return Ok(());
            }
            let summary = import_data(state.repository.as_ref(), &data).await?;
            println!("{}", summary.message());
            Ok(())
        }
        Command::Watch(filter) => watch(state, config, filter, json).await,
    }
}

async fn resolve_list(state: &AppState, id_or_name: &str) -> Result<StockList> {
    state
        .lists
        .find_list(id_or_name)
        .await?
        .ok_or_else(|| anyhow!("No list named \"{}\"", id_or_name))
}

async fn resolve_item(state: &AppState, list: &StockList, symbol: &str) -> Result<(usize, ListItem)> {
    state
        .lists
        .find_item(&list.id, symbol)
        .await?
        .ok_or_else(|| anyhow!("{} is not in \"{}\"", symbol.trim().to_uppercase(), list.name))
}

fn normalize_symbol(symbol: &str) -> Result<String> {
    let symbol = symbol.trim().to_uppercase();
    if symbol.is_empty() {
        bail!("Symbol is required");
    }
    Ok(symbol)
}

/// Lists selected by `filter` and the latest quote result for each of their
/// symbols, every symbol fetched once.
async fn load_quotes(
    state: &AppState,
    filter: &ListFilter,
) -> Result<(Vec<StockList>, HashMap<String, QuoteResult>)> {
    let (lists, symbols) = match &filter.list {
        Some(name) => {
            let list = resolve_list(state, name).await?;
            let symbols: Vec<String> = list.symbols.iter().map(|i| i.symbol.clone()).collect();
            (vec![list], symbols)
        }
        None => (
            state.lists.get_lists().await?,
            state.lists.all_symbols().await?,
        ),
    };

    debug!("Refreshing {} symbols", symbols.len());
    let results = state.quotes.fetch_many(&symbols).await;
    Ok((lists, symbols.into_iter().zip(results).collect()))
}

async fn show_quotes(state: &AppState, filter: &ListFilter, json: bool) -> Result<()> {
    let (lists, by_symbol) = load_quotes(state, filter).await?;

    if json {
        let quotes_by_symbol = quote_map(&by_symbol);
        let payload: Vec<_> = lists
            .iter()
            .map(|list| {
                let quotes: Vec<&QuoteResult> = list
                    .symbols
                    .iter()
                    .filter_map(|item| by_symbol.get(&item.symbol))
                    .collect();
                json!({
                    "id": list.id,
                    "name": list.name,
                    "isPortfolio": list.is_portfolio,
                    "quotes": quotes,
                    "stats": portfolio_stats(list, &quotes_by_symbol),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    if lists.is_empty() {
        print!("{}", render::render_lists_overview(&lists, None));
        return Ok(());
    }
    for list in &lists {
        println!("{}", render::render_list(list, &by_symbol, filter.detail));
    }
    Ok(())
}

fn quote_map(results: &HashMap<String, QuoteResult>) -> HashMap<String, Quote> {
    results
        .iter()
        .filter_map(|(symbol, result)| result.quote().map(|q| (symbol.clone(), q.clone())))
        .collect()
}

async fn search(state: &AppState, query: &str, json: bool) -> Result<()> {
    let results = state.search.search(query).await;
    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print!("{}", render::render_search_results(&results));
    }
    Ok(())
}

async fn lists(state: &AppState, command: ListsCommand, json: bool) -> Result<()> {
    match command {
        ListsCommand::Show => {
            let lists = state.lists.get_lists().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&lists)?);
            } else {
                let settings = state.lists.get_settings().await?;
                print!(
                    "{}",
                    render::render_lists_overview(&lists, settings.default_list_id.as_deref())
                );
            }
        }
        ListsCommand::Create {
            name,
            icon,
            portfolio,
        } => {
            let list = state
                .lists
                .create_list(NewStockList {
                    name,
                    icon,
                    is_portfolio: portfolio,
                })
                .await?;
            println!("Created \"{}\"", list.name);
        }
        ListsCommand::Rename {
            list,
            name,
            icon,
            portfolio,
        } => {
            let current = resolve_list(state, &list).await?;
            let updated = state
                .lists
                .update_list(
                    &current.id,
                    ListUpdate {
                        name,
                        icon: icon.unwrap_or(current.icon.clone()),
                        is_portfolio: portfolio.unwrap_or(current.is_portfolio),
                    },
                )
                .await?;
            println!("Updated \"{}\"", updated.name);
        }
        ListsCommand::Delete { list } => {
            let current = resolve_list(state, &list).await?;
            state.lists.delete_list(&current.id).await?;
            println!("Deleted \"{}\"", current.name);
        }
        ListsCommand::Duplicate { list } => {
            let current = resolve_list(state, &list).await?;
            let copy = state.lists.duplicate_list(&current.id).await?;
            println!("Created \"{}\"", copy.name);
        }
        ListsCommand::Up { list } => {
            let index = list_index(state, &list).await?;
            let lists = state.lists.move_list_up(index).await?;
            print!("{}", render::render_lists_overview(&lists, None));
        }
        ListsCommand::Down { list } => {
            let index = list_index(state, &list).await?;
            let lists = state.lists.move_list_down(index).await?;
            print!("{}", render::render_lists_overview(&lists, None));
        }
    }
    Ok(())
}

async fn list_index(state: &AppState, id_or_name: &str) -> Result<usize> {
    let target = resolve_list(state, id_or_name).await?;
    let lists = state.lists.get_lists().await?;
    lists
        .iter()
        .position(|l| l.id == target.id)
        .ok_or_else(|| anyhow!("No list named \"{}\"", id_or_name))
}

async fn add(state: &AppState, args: AddArgs) -> Result<()> {
    let list = resolve_list(state, &args.list).await?;
    let symbol = normalize_symbol(&args.symbol)?;

    match (args.units, args.cost_basis) {
        (Some(units), Some(cost_basis)) => {
            state
                .lists
                .set_position(&list.id, &symbol, units, cost_basis)
                .await?;
            println!("Saved {} shares of {} in \"{}\"", units, symbol, list.name);
        }
        _ => {
            state.lists.add_symbol(&list.id, &symbol).await?;
            println!("Added {} to \"{}\"", symbol, list.name);
        }
    }
    Ok(())
}

async fn remove(state: &AppState, list: &str, symbol: &str) -> Result<()> {
    let list = resolve_list(state, list).await?;
    let (index, item) = resolve_item(state, &list, symbol).await?;
    state.lists.remove_symbol(&list.id, index).await?;
    println!("Removed {} from \"{}\"", item.symbol, list.name);
    Ok(())
}

async fn position(state: &AppState, args: PositionArgs) -> Result<()> {
    let list = resolve_list(state, &args.list).await?;
    let (index, item) = resolve_item(state, &list, &args.symbol).await?;
    let updated = state
        .lists
        .update_position(&list.id, index, args.units, args.cost_basis)
        .await?;

    let has_position = updated
        .symbols
        .get(index)
        .map(ListItem::has_position)
        .unwrap_or(false);
    if has_position {
        println!("Updated position in {}", item.symbol);
    } else {
        println!("Cleared position in {}", item.symbol);
    }
    Ok(())
}

async fn move_symbol(state: &AppState, args: MoveArgs) -> Result<()> {
    let list = resolve_list(state, &args.list).await?;
    let (index, item) = resolve_item(state, &list, &args.symbol).await?;
    let direction = args.direction;

    if let Some(target) = direction.to {
        let target = resolve_list(state, &target).await?;
        state
            .lists
            .move_symbol_to_list(&list.id, index, &target.id)
            .await?;
        println!("Moved {} to \"{}\"", item.symbol, target.name);
        return Ok(());
    }

    let updated = if direction.up {
        state.lists.move_symbol_up(&list.id, index).await?
    } else {
        state.lists.move_symbol_down(&list.id, index).await?
    };
    let order: Vec<&str> = updated.symbols.iter().map(|i| i.symbol.as_str()).collect();
    println!("{}: {}", updated.name, order.join(", "));
    Ok(())
}

async fn watch(state: Arc<AppState>, config: &Config, filter: ListFilter, json: bool) -> Result<()> {
    info!(
        "Refreshing every {}s, press Ctrl-C to stop",
        config.refresh_interval.as_secs()
    );

    let handle = start_refresher(
        move || {
            let state = state.clone();
            let filter = filter.clone();
            async move {
                if !json {
                    println!("── {} ──", Local::now().format("%H:%M:%S"));
                }
                if let Err(e) = show_quotes(&state, &filter, json).await {
                    error!("Refresh failed: {:#}", e);
                }
            }
        },
        config.refresh_interval,
    );

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;
    handle.stop();
    info!("Stopped");
    Ok(())
}
