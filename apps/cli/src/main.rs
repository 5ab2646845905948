mod cli;
mod commands;
mod config;
mod main_lib;
mod render;

use clap::Parser;
use cli::Cli;
use config::Config;
use main_lib::{build_state, init_tracing, run_migration};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env();
    init_tracing(&config.log_format);
    let state = build_state(&config)?;

    if let Some(outcome) = run_migration(&state, &config).await? {
        eprintln!("{}", outcome.message());
    }

    commands::run(state, &config, cli.command(), cli.json).await
}
