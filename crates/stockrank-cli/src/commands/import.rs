use std::fs;

use serde::Serialize;
use stockrank_core::{import_rows, parse_document, ImportReport, RankingReport};
use tracing::info;

use crate::cli::ImportArgs;
use crate::error::CliError;

use super::{parse_date, ranking_warnings, CommandResult, Service};

#[derive(Debug, Serialize)]
pub(super) struct LoadResponseData {
    pub import: ImportReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ranking: Option<RankingReport>,
}

pub fn run(args: &ImportArgs, service: &Service<'_>) -> Result<CommandResult, CliError> {
    let default_date = parse_date(args.date.as_deref())?;
    let document = fs::read_to_string(&args.file)?;
    let rows = parse_document(&document)?;
    info!(file = %args.file.display(), rows = rows.len(), "import file read");

    let report = import_rows(service.store(), rows, default_date)?;
    finish(service, report, args.no_rank)
}

/// Rank after a write unless told not to, and collect the warnings both steps raise.
pub(super) fn finish(
    service: &Service<'_>,
    import: ImportReport,
    no_rank: bool,
) -> Result<CommandResult, CliError> {
    let mut warnings = import
        .rejected
        .iter()
        .map(|rejection| {
            format!(
                "row {} ({}) rejected: {}",
                rejection.index, rejection.symbol, rejection.reason
            )
        })
        .collect::<Vec<_>>();

    let ranking = if no_rank {
        if import.written() > 0 {
            warnings.push(String::from(
                "ranks for the imported dates were cleared; run `stockrank rank`",
            ));
        }
        None
    } else {
        let report = service.recompute_rankings()?;
        warnings.extend(ranking_warnings(&report, &import.dates));
        Some(report)
    };

    let data = serde_json::to_value(LoadResponseData { import, ranking })?;
    Ok(CommandResult::ok(data).with_warnings(warnings))
}
