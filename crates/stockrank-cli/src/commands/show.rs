use stockrank_core::{SnapshotDate, Symbol};

use crate::cli::ShowArgs;
use crate::error::CliError;

use super::{CommandResult, Service};

pub fn run(args: &ShowArgs, service: &Service<'_>) -> Result<CommandResult, CliError> {
    let symbol = Symbol::parse(&args.symbol)?;
    let date = args.date.as_deref().map(SnapshotDate::parse).transpose()?;

    let Some(detail) = service.snapshot_detail(&symbol, date)? else {
        let when = date.map_or_else(|| String::from("any date"), |date| date.to_string());
        return Err(CliError::NotFound(format!("no snapshot stored for {symbol} on {when}")));
    };

    let result = CommandResult::ok(serde_json::to_value(&detail)?);
    Ok(if detail.ranks.is_none() {
        result.with_warning(format!("{symbol} has no ranks for {}", detail.snapshot.date))
    } else {
        result
    })
}
