use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about = "Watch stock quotes and track portfolio lists")]
pub struct Cli {
    /// Print machine-readable JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Show latest quotes for one list, or for every list
    Quotes(ListFilter),
    /// Search for symbols by name or ticker
    Search { query: String },
    /// Manage lists
    #[command(subcommand)]
    Lists(ListsCommand),
    /// Add a symbol to a list, optionally with a position
    Add(AddArgs),
    /// Remove a symbol from a list
    Remove { list: String, symbol: String },
    /// Edit or clear the position held in a symbol
    Position(PositionArgs),
    /// Reorder a symbol or move it to another list
    Move(MoveArgs),
    /// Write every list and setting as JSON
    Export {
        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Replace every list and setting with an export file
    Import {
        file: PathBuf,
        /// Validate only, change nothing
        #[arg(long)]
        dry_run: bool,
    },
    /// Refresh quotes on an interval until interrupted
    Watch(ListFilter),
}

impl Default for Command {
    fn default() -> Self {
        Command::Quotes(ListFilter::default())
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct ListFilter {
    /// List id or name
    #[arg(short, long)]
    pub list: Option<String>,
    /// Show open, high, low, close, 52-week range, volume and market cap
    #[arg(short, long)]
    pub detail: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum ListsCommand {
    /// Print every list with its symbols
    Show,
    /// Create a new list
    Create {
        name: String,
        #[arg(long, default_value = "📈")]
        icon: String,
        /// Track units and cost basis for this list
        #[arg(long)]
        portfolio: bool,
    },
    /// Rename a list, optionally changing its icon or portfolio flag
    Rename {
        list: String,
        name: String,
        #[arg(long)]
        icon: Option<String>,
        #[arg(long)]
        portfolio: Option<bool>,
    },
    /// Delete a list
    Delete { list: String },
    /// Copy a list under "<name> (Copy)"
    Duplicate { list: String },
    /// Move a list one place up
    Up { list: String },
    /// Move a list one place down
    Down { list: String },
}

#[derive(Debug, Clone, Args)]
pub struct AddArgs {
    pub list: String,
    pub symbol: String,
    /// Number of shares or units held
    #[arg(long, requires = "cost_basis")]
    pub units: Option<f64>,
    /// Total amount paid for the position
    #[arg(long, requires = "units")]
    pub cost_basis: Option<f64>,
}

#[derive(Debug, Clone, Args)]
pub struct PositionArgs {
    pub list: String,
    pub symbol: String,
    /// Units held; 0 or omitted clears the position
    #[arg(long)]
    pub units: Option<f64>,
    #[arg(long)]
    pub cost_basis: Option<f64>,
}

#[derive(Debug, Clone, Args)]
#[group(required = true, multiple = false)]
pub struct MoveDirection {
    #[arg(long)]
    pub up: bool,
    #[arg(long)]
    pub down: bool,
    /// Target list id or name
    #[arg(long)]
    pub to: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct MoveArgs {
    pub list: String,
    pub symbol: String,
    #[command(flatten)]
    pub direction: MoveDirection,
}
