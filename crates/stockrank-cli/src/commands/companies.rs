use serde::Serialize;
use stockrank_core::{Company, MAX_COMPANY_LIMIT};

use crate::cli::CompaniesArgs;
use crate::error::CliError;

use super::{CommandResult, Service};

#[derive(Debug, Serialize)]
struct CompaniesResponseData {
    skip: usize,
    limit: usize,
    companies: Vec<Company>,
}

pub fn run(args: &CompaniesArgs, service: &Service<'_>) -> Result<CommandResult, CliError> {
    let companies = service.list_companies(
        args.sector.as_deref(),
        args.search.as_deref(),
        args.skip,
        args.limit,
    )?;

    let mut warnings = Vec::new();
    if args.limit > MAX_COMPANY_LIMIT {
        warnings.push(format!("limit {} clamped to {MAX_COMPANY_LIMIT}", args.limit));
    }
    if companies.is_empty() {
        warnings.push(String::from("no companies matched"));
    }

    let data = serde_json::to_value(CompaniesResponseData {
        skip: args.skip,
        limit: args.limit.min(MAX_COMPANY_LIMIT),
        companies,
    })?;
    Ok(CommandResult::ok(data).with_warnings(warnings))
}
