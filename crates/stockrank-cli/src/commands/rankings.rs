use serde::Serialize;
use stockrank_core::{RankingEntry, StrategySummary, MAX_LIMIT};

use crate::cli::RankingsArgs;
use crate::error::CliError;

use super::{CommandResult, Service};

#[derive(Debug, Serialize)]
struct RankingsResponseData {
    strategy: StrategySummary,
    limit: usize,
    entries: Vec<RankingEntry>,
}

pub fn run(args: &RankingsArgs, service: &Service<'_>) -> Result<CommandResult, CliError> {
    let entries = service.get_rankings(&args.strategy, args.limit)?;
    let strategy = service.registry().lookup(&args.strategy)?.summary();

    let mut warnings = Vec::new();
    if args.limit > MAX_LIMIT {
        warnings.push(format!("limit {} clamped to {MAX_LIMIT}", args.limit));
    }
    if entries.is_empty() {
        warnings.push(String::from("no ranked rows; run `stockrank rank` after loading data"));
    }

    let data = serde_json::to_value(RankingsResponseData {
        strategy,
        limit: args.limit.min(MAX_LIMIT),
        entries,
    })?;
    Ok(CommandResult::ok(data).with_warnings(warnings))
}
