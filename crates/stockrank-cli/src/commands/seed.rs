use crate::cli::SeedArgs;
use crate::error::CliError;

use super::import::finish;
use super::{parse_date, CommandResult, Service};

pub fn run(args: &SeedArgs, service: &Service<'_>) -> Result<CommandResult, CliError> {
    let date = parse_date(args.date.as_deref())?;
    let report = stockrank_core::seed(service.store(), date)?;
    finish(service, report, args.no_rank)
}
