use crate::error::CliError;

use super::{CommandResult, Service};

pub fn run(service: &Service<'_>) -> Result<CommandResult, CliError> {
    let report = service.recompute_rankings()?;
    let empty = report.snapshot_date.is_none();
    let result = CommandResult::ok(serde_json::to_value(report)?);

    Ok(if empty {
        result.with_warning("no snapshots stored; run `stockrank seed` or `stockrank import <file>` first")
    } else {
        result
    })
}
