mod companies;
mod import;
mod rank;
mod rankings;
mod seed;
mod show;
mod strategies;

use std::time::Instant;

use serde_json::Value;
use stockrank_core::{
    Envelope, EnvelopeError, EnvelopeMeta, RankingReport, RankingService, SnapshotDate,
    StrategyRegistry, Warehouse, WarehouseConfig,
};
use uuid::Uuid;

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }
}

pub type Service<'r> = RankingService<'r, Warehouse>;

pub fn run(cli: &Cli) -> Result<Envelope<Value>, CliError> {
    let started = Instant::now();
    let registry = StrategyRegistry::standard();

    let CommandResult {
        data,
        warnings,
        errors,
    } = match &cli.command {
        Command::Strategies => strategies::run(&registry)?,
        Command::Rank => rank::run(&open_service(cli, &registry)?)?,
        Command::Rankings(args) => rankings::run(args, &open_service(cli, &registry)?)?,
        Command::Import(args) => import::run(args, &open_service(cli, &registry)?)?,
        Command::Seed(args) => seed::run(args, &open_service(cli, &registry)?)?,
        Command::Show(args) => show::run(args, &open_service(cli, &registry)?)?,
        Command::Companies(args) => companies::run(args, &open_service(cli, &registry)?)?,
    };

    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    let mut meta = EnvelopeMeta::new(Uuid::new_v4().to_string(), cli.command.name(), latency_ms)?;
    for warning in warnings {
        meta.push_warning(warning);
    }

    let mut envelope = Envelope::success(meta, data);
    for error in errors {
        envelope.push_error(error)?;
    }
    Ok(envelope)
}

fn open_service<'r>(cli: &Cli, registry: &'r StrategyRegistry) -> Result<Service<'r>, CliError> {
    let config = match &cli.db {
        Some(path) => WarehouseConfig::at(path),
        None => WarehouseConfig::default(),
    };
    let warehouse = Warehouse::open(config).map_err(stockrank_core::CoreError::from)?;
    Ok(RankingService::new(warehouse, registry))
}

pub(crate) fn parse_date(value: Option<&str>) -> Result<SnapshotDate, CliError> {
    match value {
        Some(value) => Ok(SnapshotDate::parse(value)?),
        None => Ok(SnapshotDate::today()),
    }
}

/// Warnings for a ranking pass that followed a write.
pub(crate) fn ranking_warnings(report: &RankingReport, written: &[SnapshotDate]) -> Vec<String> {
    let Some(ranked) = report.snapshot_date else {
        return vec![String::from("no snapshots stored, nothing was ranked")];
    };
    written
        .iter()
        .filter(|date| **date != ranked)
        .map(|date| format!("{date} is not the latest snapshot date ({ranked}) and stays unranked"))
        .collect()
}
