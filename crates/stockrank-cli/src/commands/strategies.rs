use serde::Serialize;
use stockrank_core::{StrategyRegistry, StrategySummary};

use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct StrategiesResponseData {
    strategies: Vec<StrategySummary>,
}

pub fn run(registry: &StrategyRegistry) -> Result<CommandResult, CliError> {
    let strategies = registry
        .strategies()
        .iter()
        .map(|strategy| strategy.summary())
        .collect();
    let data = serde_json::to_value(StrategiesResponseData { strategies })?;
    Ok(CommandResult::ok(data))
}
