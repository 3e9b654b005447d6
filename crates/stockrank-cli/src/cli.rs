//! Command-line arguments.
//!
//! | Command | Description |
//! |---------|-------------|
//! | `rank` | Rank the latest snapshot date and store the results |
//! | `rankings` | Print the leaderboard for one strategy |
//! | `strategies` | List the registered strategies |
//! | `import` | Load snapshots from a JSON file, then rank |
//! | `seed` | Load the built-in sample dataset, then rank |
//! | `show` | Print the stored metrics and ranks of one symbol |
//! | `companies` | Browse stored companies by sector or search text |

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use stockrank_core::{DEFAULT_COMPANY_LIMIT, DEFAULT_LIMIT};

#[derive(Debug, Parser)]
#[command(
    name = "stockrank",
    author,
    version,
    about = "Rank companies by valuation and quality metrics"
)]
pub struct Cli {
    /// DuckDB file to use instead of `$STOCKRANK_HOME/warehouse.duckdb`.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Treat warnings and errors as failures (exit code 5).
    #[arg(long, global = true, default_value_t = false)]
    pub strict: bool,

    /// Log filter such as `info` or `stockrank_core=debug`. Overrides `STOCKRANK_LOG`.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Rank the most recent snapshot date.
    Rank,
    /// Print the leaderboard for a strategy.
    Rankings(RankingsArgs),
    /// List available strategies.
    Strategies,
    /// Import snapshots from a JSON file.
    Import(ImportArgs),
    /// Load the built-in sample dataset.
    Seed(SeedArgs),
    /// Show the stored snapshot of one symbol.
    Show(ShowArgs),
    /// List stored companies.
    Companies(CompaniesArgs),
}

impl Command {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Rank => "rank",
            Self::Rankings(_) => "rankings",
            Self::Strategies => "strategies",
            Self::Import(_) => "import",
            Self::Seed(_) => "seed",
            Self::Show(_) => "show",
            Self::Companies(_) => "companies",
        }
    }
}

#[derive(Debug, Args)]
pub struct RankingsArgs {
    /// Strategy key, see `stockrank strategies`.
    pub strategy: String,

    /// Maximum rows to return (clamped to 500).
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    pub limit: usize,
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// JSON file holding an array of snapshot rows.
    pub file: PathBuf,

    /// Date (YYYY-MM-DD) for rows that carry none. Defaults to today (UTC).
    #[arg(long)]
    pub date: Option<String>,

    /// Skip the ranking pass after the import.
    #[arg(long, default_value_t = false)]
    pub no_rank: bool,
}

#[derive(Debug, Args)]
pub struct SeedArgs {
    /// Snapshot date (YYYY-MM-DD). Defaults to today (UTC).
    #[arg(long)]
    pub date: Option<String>,

    /// Skip the ranking pass after seeding.
    #[arg(long, default_value_t = false)]
    pub no_rank: bool,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    pub symbol: String,

    /// Snapshot date (YYYY-MM-DD). Defaults to the latest stored date.
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Debug, Args)]
pub struct CompaniesArgs {
    /// Exact sector name, e.g. "Technology".
    #[arg(long)]
    pub sector: Option<String>,

    /// Case-insensitive text matched against symbol and name.
    #[arg(long)]
    pub search: Option<String>,

    /// Companies to skip before the page starts.
    #[arg(long, default_value_t = 0)]
    pub skip: usize,

    /// Maximum rows to return (clamped to 200).
    #[arg(long, default_value_t = DEFAULT_COMPANY_LIMIT)]
    pub limit: usize,
}
