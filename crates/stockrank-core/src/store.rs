//! Storage seam between the ranking service and the warehouse.

use serde::Serialize;
use stockrank_warehouse::{
    CompanyQuery, RankedQuery, RankedRecord, SnapshotUpsert, UpsertOutcome, Warehouse,
};

use crate::domain::{Company, MetricSnapshot, Snapshot, SnapshotDate, SnapshotRow, Symbol};
use crate::ranking::DerivedMetrics;
use crate::strategy::StrategyTarget;
use crate::CoreError;

/// One leaderboard row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingEntry {
    pub symbol: String,
    pub name: Option<String>,
    pub rank: u32,
    pub score: Option<f64>,
    pub pe_ratio_ttm: Option<f64>,
    pub pe_ratio_ftm: Option<f64>,
    pub garp_ratio: Option<f64>,
    pub peg_ratio: Option<f64>,
    pub return_on_assets: Option<f64>,
}

impl From<RankedRecord> for RankingEntry {
    fn from(record: RankedRecord) -> Self {
        Self {
            symbol: record.symbol,
            name: record.name,
            rank: record.rank,
            score: record.score,
            pe_ratio_ttm: record.pe_ratio_ttm,
            pe_ratio_ftm: record.pe_ratio_ftm,
            garp_ratio: record.garp_ratio,
            peg_ratio: record.peg_ratio,
            return_on_assets: record.return_on_assets,
        }
    }
}

/// A company refresh paired with the snapshot written alongside it.
#[derive(Debug, Clone, PartialEq)]
pub struct CompanySnapshot {
    pub company: Company,
    pub snapshot: MetricSnapshot,
}

/// Filters and paging for [`SnapshotStore::list_companies`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyFilter {
    pub sector: Option<String>,
    pub search: Option<String>,
    pub skip: usize,
    pub limit: usize,
}

pub trait SnapshotStore {
    /// Rows of the most recent snapshot date, or `None` when nothing is stored.
    fn latest_snapshot(&self) -> Result<Option<Snapshot>, CoreError>;

    fn latest_snapshot_date(&self) -> Result<Option<SnapshotDate>, CoreError>;

    fn find_company(&self, symbol: &Symbol) -> Result<Option<Company>, CoreError>;

    /// Companies ordered by symbol.
    fn list_companies(&self, filter: &CompanyFilter) -> Result<Vec<Company>, CoreError>;

    fn find_snapshot(
        &self,
        symbol: &Symbol,
        date: SnapshotDate,
    ) -> Result<Option<MetricSnapshot>, CoreError>;

    /// Write companies and snapshots atomically, invalidating ranks for the
    /// dates touched.
    fn upsert_snapshots(&self, rows: &[CompanySnapshot]) -> Result<Vec<UpsertOutcome>, CoreError>;

    /// Replace every derived row for `date` in one step, provided `date` is
    /// still at `version`.
    fn replace_derived(
        &self,
        date: SnapshotDate,
        version: u64,
        derived: &[DerivedMetrics],
    ) -> Result<usize, CoreError>;

    /// Derived rows for `date` ordered by symbol.
    fn load_derived(&self, date: SnapshotDate) -> Result<Vec<DerivedMetrics>, CoreError>;

    /// Top `limit` rows of the latest ranked date ordered by `target`'s rank.
    fn ranked_entries(&self, target: StrategyTarget, limit: usize) -> Result<Vec<RankingEntry>, CoreError>;
}

impl<S: SnapshotStore + ?Sized> SnapshotStore for &S {
    fn latest_snapshot(&self) -> Result<Option<Snapshot>, CoreError> {
        (**self).latest_snapshot()
    }

    fn latest_snapshot_date(&self) -> Result<Option<SnapshotDate>, CoreError> {
        (**self).latest_snapshot_date()
    }

    fn find_company(&self, symbol: &Symbol) -> Result<Option<Company>, CoreError> {
        (**self).find_company(symbol)
    }

    fn list_companies(&self, filter: &CompanyFilter) -> Result<Vec<Company>, CoreError> {
        (**self).list_companies(filter)
    }

    fn find_snapshot(
        &self,
        symbol: &Symbol,
        date: SnapshotDate,
    ) -> Result<Option<MetricSnapshot>, CoreError> {
        (**self).find_snapshot(symbol, date)
    }

    fn upsert_snapshots(&self, rows: &[CompanySnapshot]) -> Result<Vec<UpsertOutcome>, CoreError> {
        (**self).upsert_snapshots(rows)
    }

    fn replace_derived(
        &self,
        date: SnapshotDate,
        version: u64,
        derived: &[DerivedMetrics],
    ) -> Result<usize, CoreError> {
        (**self).replace_derived(date, version, derived)
    }

    fn load_derived(&self, date: SnapshotDate) -> Result<Vec<DerivedMetrics>, CoreError> {
        (**self).load_derived(date)
    }

    fn ranked_entries(&self, target: StrategyTarget, limit: usize) -> Result<Vec<RankingEntry>, CoreError> {
        (**self).ranked_entries(target, limit)
    }
}

impl SnapshotStore for Warehouse {
    fn latest_snapshot(&self) -> Result<Option<Snapshot>, CoreError> {
        let Some(batch) = self.load_latest_snapshot()? else {
            return Ok(None);
        };
        let rows = batch
            .rows
            .into_iter()
            .map(SnapshotRow::from_record)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Some(Snapshot {
            date: SnapshotDate::parse(&batch.date)?,
            version: batch.version,
            rows,
        }))
    }

    fn latest_snapshot_date(&self) -> Result<Option<SnapshotDate>, CoreError> {
        let date = Warehouse::latest_snapshot_date(self)?;
        Ok(date.as_deref().map(SnapshotDate::parse).transpose()?)
    }

    fn find_company(&self, symbol: &Symbol) -> Result<Option<Company>, CoreError> {
        let record = Warehouse::find_company(self, symbol.as_str())?;
        Ok(record.map(Company::from_record).transpose()?)
    }

    fn list_companies(&self, filter: &CompanyFilter) -> Result<Vec<Company>, CoreError> {
        let query = CompanyQuery {
            sector: filter.sector.clone(),
            search: filter.search.clone(),
            offset: filter.skip,
            limit: filter.limit,
        };
        Warehouse::list_companies(self, &query)?
            .into_iter()
            .map(|record| Ok(Company::from_record(record)?))
            .collect()
    }

    fn find_snapshot(
        &self,
        symbol: &Symbol,
        date: SnapshotDate,
    ) -> Result<Option<MetricSnapshot>, CoreError> {
        let record = Warehouse::find_snapshot(self, symbol.as_str(), &date.to_iso_string())?;
        Ok(record.map(MetricSnapshot::from_record).transpose()?)
    }

    fn upsert_snapshots(&self, rows: &[CompanySnapshot]) -> Result<Vec<UpsertOutcome>, CoreError> {
        let records = rows
            .iter()
            .cloned()
            .map(|row| SnapshotUpsert {
                company: row.company.into_record(),
                snapshot: row.snapshot.into_record(),
            })
            .collect::<Vec<_>>();
        Ok(self.upsert_batch(&records)?)
    }

    fn replace_derived(
        &self,
        date: SnapshotDate,
        version: u64,
        derived: &[DerivedMetrics],
    ) -> Result<usize, CoreError> {
        let records = derived
            .iter()
            .map(DerivedMetrics::to_record)
            .collect::<Vec<_>>();
        Ok(self.replace_ranks(&date.to_iso_string(), version, &records)?)
    }

    fn load_derived(&self, date: SnapshotDate) -> Result<Vec<DerivedMetrics>, CoreError> {
        self.load_ranks(&date.to_iso_string())?
            .into_iter()
            .map(|record| -> Result<DerivedMetrics, CoreError> {
                Ok(DerivedMetrics {
                    symbol: Symbol::parse(&record.symbol)?,
                    date: SnapshotDate::parse(&record.date)?,
                    ranks: record.ranks,
                })
            })
            .collect()
    }

    fn ranked_entries(&self, target: StrategyTarget, limit: usize) -> Result<Vec<RankingEntry>, CoreError> {
        let query = RankedQuery {
            rank_column: target.rank_column(),
            score_column: target.score_column(),
            limit,
        };
        let records = Warehouse::ranked_entries(self, &query)?;
        Ok(records.into_iter().map(RankingEntry::from).collect())
    }
}
