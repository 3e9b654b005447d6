use std::time::Instant;

use serde::Serialize;
use stockrank_warehouse::WarehouseError;
use tracing::{debug, info, warn};

use crate::domain::{Company, MetricSnapshot, RankValues, Snapshot, SnapshotDate, Symbol};
use crate::ranking::{rank_snapshot, MetricCoverage, RankedSnapshot};
use crate::store::{CompanyFilter, RankingEntry, SnapshotStore};
use crate::strategy::{StrategyDescriptor, StrategyRegistry};
use crate::CoreError;

pub const DEFAULT_LIMIT: usize = 100;
pub const MAX_LIMIT: usize = 500;

pub const DEFAULT_COMPANY_LIMIT: usize = 50;
pub const MAX_COMPANY_LIMIT: usize = 200;

/// Ranking passes tried before a concurrently rewritten snapshot is reported.
const RANKING_ATTEMPTS: u32 = 3;

/// Summary of one ranking pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankingReport {
    pub snapshot_date: Option<SnapshotDate>,
    pub ranked_rows: usize,
    pub metrics: Vec<MetricCoverage>,
    pub composites: Vec<MetricCoverage>,
    pub excluded_from_composites: usize,
}

impl RankingReport {
    fn empty() -> Self {
        Self {
            snapshot_date: None,
            ranked_rows: 0,
            metrics: Vec::new(),
            composites: Vec::new(),
            excluded_from_composites: 0,
        }
    }
}

/// Stored state of one symbol on one date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotDetail {
    pub company: Option<Company>,
    pub snapshot: MetricSnapshot,
    pub ranks: Option<RankValues>,
}

/// Runs ranking passes and serves leaderboards over a [`SnapshotStore`].
pub struct RankingService<'r, S> {
    store: S,
    registry: &'r StrategyRegistry,
}

impl<'r, S: SnapshotStore> RankingService<'r, S> {
    pub fn new(store: S, registry: &'r StrategyRegistry) -> Self {
        Self { store, registry }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Rank the most recent snapshot date and persist the results.
    ///
    /// Derived rows for that date are replaced as a whole, and only if no
    /// snapshot write landed on that date since it was read. A pass that loses
    /// that race is rerun from a fresh read, up to three attempts in total.
    /// An empty store is not an error: the report says zero rows were ranked.
    pub fn recompute_rankings(&self) -> Result<RankingReport, CoreError> {
        let started = Instant::now();
        let mut attempt = 1;
        loop {
            let Some(snapshot) = self.store.latest_snapshot()? else {
                info!("no snapshots stored, nothing to rank");
                return Ok(RankingReport::empty());
            };

            let ranked = rank_snapshot(&snapshot.rows);
            match self.persist(&snapshot, &ranked) {
                Ok(written) => {
                    info!(
                        date = %snapshot.date,
                        rows = written,
                        excluded = ranked.excluded_from_composites,
                        attempts = attempt,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "ranking pass complete"
                    );
                    return Ok(RankingReport {
                        snapshot_date: Some(snapshot.date),
                        ranked_rows: written,
                        metrics: ranked.metrics,
                        composites: ranked.composites,
                        excluded_from_composites: ranked.excluded_from_composites,
                    });
                }
                Err(CoreError::Store(WarehouseError::StaleSnapshot { found, .. }))
                    if attempt < RANKING_ATTEMPTS =>
                {
                    warn!(
                        date = %snapshot.date,
                        read_version = snapshot.version,
                        found,
                        attempt,
                        "snapshot changed during ranking, rerunning pass"
                    );
                    attempt += 1;
                }
                Err(error) => return Err(error),
            }
        }
    }

    fn persist(&self, snapshot: &Snapshot, ranked: &RankedSnapshot) -> Result<usize, CoreError> {
        for coverage in ranked.metrics.iter().chain(&ranked.composites) {
            debug!(metric = coverage.metric, ranked = coverage.ranked, "metric ranked");
        }
        self.store
            .replace_derived(snapshot.date, snapshot.version, &ranked.derived)
    }

    /// Leaderboard for `key`, best first.
    ///
    /// `limit` must be positive; anything above [`MAX_LIMIT`] is clamped.
    pub fn get_rankings(&self, key: &str, limit: usize) -> Result<Vec<RankingEntry>, CoreError> {
        let strategy = self.registry.lookup(key)?;
        if limit == 0 {
            return Err(CoreError::InvalidLimit);
        }
        let limit = limit.min(MAX_LIMIT);
        let entries = self.store.ranked_entries(strategy.target, limit)?;
        debug!(strategy = strategy.key, limit, returned = entries.len(), "rankings read");
        Ok(entries)
    }

    /// Companies ordered by symbol, optionally narrowed to one sector and to a
    /// case-insensitive search over symbol and name.
    ///
    /// Blank filters are ignored. `limit` must be positive; anything above
    /// [`MAX_COMPANY_LIMIT`] is clamped.
    pub fn list_companies(
        &self,
        sector: Option<&str>,
        search: Option<&str>,
        skip: usize,
        limit: usize,
    ) -> Result<Vec<Company>, CoreError> {
        if limit == 0 {
            return Err(CoreError::InvalidLimit);
        }
        let filter = CompanyFilter {
            sector: non_blank(sector),
            search: non_blank(search),
            skip,
            limit: limit.min(MAX_COMPANY_LIMIT),
        };
        let companies = self.store.list_companies(&filter)?;
        debug!(
            sector = filter.sector.as_deref(),
            search = filter.search.as_deref(),
            skip,
            limit = filter.limit,
            returned = companies.len(),
            "companies read"
        );
        Ok(companies)
    }

    pub fn list_strategies(&self) -> &'r [StrategyDescriptor] {
        self.registry.strategies()
    }

    pub fn registry(&self) -> &'r StrategyRegistry {
        self.registry
    }

    /// Stored metrics and ranks for `symbol`, on `date` or the latest snapshot date.
    pub fn snapshot_detail(
        &self,
        symbol: &Symbol,
        date: Option<SnapshotDate>,
    ) -> Result<Option<SnapshotDetail>, CoreError> {
        let date = match date {
            Some(date) => date,
            None => match self.store.latest_snapshot_date()? {
                Some(date) => date,
                None => return Ok(None),
            },
        };
        let Some(snapshot) = self.store.find_snapshot(symbol, date)? else {
            return Ok(None);
        };

        let company = self.store.find_company(symbol)?;
        let ranks = self
            .store
            .load_derived(date)?
            .into_iter()
            .find(|derived| &derived.symbol == symbol)
            .map(|derived| derived.ranks);

        Ok(Some(SnapshotDetail {
            company,
            snapshot,
            ranks,
        }))
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}
