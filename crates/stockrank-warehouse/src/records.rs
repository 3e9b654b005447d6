//! Plain row types exchanged with the warehouse.
//!
//! Dates travel as ISO `YYYY-MM-DD` strings; callers own parsing.

use serde::{Deserialize, Serialize};

/// Raw metric columns of `metric_snapshots`, in storage order.
pub const METRIC_COLUMNS: [&str; 20] = [
    "ask",
    "book_value",
    "market_cap",
    "ebitda",
    "pe_ratio_ttm",
    "pe_ratio_ftm",
    "peg_ratio",
    "garp_ratio",
    "eps_estimate_qtr",
    "eps_estimate_current_year",
    "eps_estimate_next_year",
    "eps_estimate_next_quarter",
    "return_on_assets",
    "return_on_equity",
    "dividend_yield",
    "net_income",
    "total_assets",
    "change_year_low_per",
    "change_year_high_per",
    "one_yr_target_price",
];

/// Rank columns of `snapshot_ranks`, in storage order.
pub const RANK_COLUMNS: [&str; 10] = [
    "rank_ebitda",
    "rank_pe_ratio_ttm",
    "rank_pe_ratio_ftm",
    "rank_peg_ratio",
    "rank_garp_ratio",
    "rank_return_on_assets",
    "rank_return_on_equity",
    "rank_dividend_yield",
    "rank_magic_formula_trailing",
    "rank_magic_formula_future",
];

/// Composite score columns of `snapshot_ranks`, in storage order.
pub const COMPOSITE_COLUMNS: [&str; 2] = ["magic_formula_trailing", "magic_formula_future"];

/// Nullable financial metrics for one company on one date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricValues {
    pub ask: Option<f64>,
    pub book_value: Option<f64>,
    pub market_cap: Option<f64>,
    pub ebitda: Option<f64>,
    pub pe_ratio_ttm: Option<f64>,
    pub pe_ratio_ftm: Option<f64>,
    pub peg_ratio: Option<f64>,
    pub garp_ratio: Option<f64>,
    pub eps_estimate_qtr: Option<f64>,
    pub eps_estimate_current_year: Option<f64>,
    pub eps_estimate_next_year: Option<f64>,
    pub eps_estimate_next_quarter: Option<f64>,
    pub return_on_assets: Option<f64>,
    pub return_on_equity: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub net_income: Option<f64>,
    pub total_assets: Option<f64>,
    pub change_year_low_per: Option<f64>,
    pub change_year_high_per: Option<f64>,
    pub one_yr_target_price: Option<f64>,
}

impl MetricValues {
    /// Values in [`METRIC_COLUMNS`] order.
    #[must_use]
    pub const fn to_columns(&self) -> [Option<f64>; 20] {
        [
            self.ask,
            self.book_value,
            self.market_cap,
            self.ebitda,
            self.pe_ratio_ttm,
            self.pe_ratio_ftm,
            self.peg_ratio,
            self.garp_ratio,
            self.eps_estimate_qtr,
            self.eps_estimate_current_year,
            self.eps_estimate_next_year,
            self.eps_estimate_next_quarter,
            self.return_on_assets,
            self.return_on_equity,
            self.dividend_yield,
            self.net_income,
            self.total_assets,
            self.change_year_low_per,
            self.change_year_high_per,
            self.one_yr_target_price,
        ]
    }

    /// Inverse of [`MetricValues::to_columns`].
    #[must_use]
    pub const fn from_columns(columns: [Option<f64>; 20]) -> Self {
        let [ask, book_value, market_cap, ebitda, pe_ratio_ttm, pe_ratio_ftm, peg_ratio, garp_ratio, eps_estimate_qtr, eps_estimate_current_year, eps_estimate_next_year, eps_estimate_next_quarter, return_on_assets, return_on_equity, dividend_yield, net_income, total_assets, change_year_low_per, change_year_high_per, one_yr_target_price] =
            columns;
        Self {
            ask,
            book_value,
            market_cap,
            ebitda,
            pe_ratio_ttm,
            pe_ratio_ftm,
            peg_ratio,
            garp_ratio,
            eps_estimate_qtr,
            eps_estimate_current_year,
            eps_estimate_next_year,
            eps_estimate_next_quarter,
            return_on_assets,
            return_on_equity,
            dividend_yield,
            net_income,
            total_assets,
            change_year_low_per,
            change_year_high_per,
            one_yr_target_price,
        }
    }
}

/// Ranks and composite scores computed by a ranking pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankValues {
    pub rank_ebitda: Option<u32>,
    pub rank_pe_ratio_ttm: Option<u32>,
    pub rank_pe_ratio_ftm: Option<u32>,
    pub rank_peg_ratio: Option<u32>,
    pub rank_garp_ratio: Option<u32>,
    pub rank_return_on_assets: Option<u32>,
    pub rank_return_on_equity: Option<u32>,
    pub rank_dividend_yield: Option<u32>,
    pub rank_magic_formula_trailing: Option<u32>,
    pub rank_magic_formula_future: Option<u32>,
    pub magic_formula_trailing: Option<u32>,
    pub magic_formula_future: Option<u32>,
}

impl RankValues {
    /// Ranks in [`RANK_COLUMNS`] order.
    #[must_use]
    pub const fn rank_columns(&self) -> [Option<u32>; 10] {
        [
            self.rank_ebitda,
            self.rank_pe_ratio_ttm,
            self.rank_pe_ratio_ftm,
            self.rank_peg_ratio,
            self.rank_garp_ratio,
            self.rank_return_on_assets,
            self.rank_return_on_equity,
            self.rank_dividend_yield,
            self.rank_magic_formula_trailing,
            self.rank_magic_formula_future,
        ]
    }

    /// Composite scores in [`COMPOSITE_COLUMNS`] order.
    #[must_use]
    pub const fn composite_columns(&self) -> [Option<u32>; 2] {
        [self.magic_formula_trailing, self.magic_formula_future]
    }

    #[must_use]
    pub const fn from_columns(ranks: [Option<u32>; 10], composites: [Option<u32>; 2]) -> Self {
        let [rank_ebitda, rank_pe_ratio_ttm, rank_pe_ratio_ftm, rank_peg_ratio, rank_garp_ratio, rank_return_on_assets, rank_return_on_equity, rank_dividend_yield, rank_magic_formula_trailing, rank_magic_formula_future] =
            ranks;
        let [magic_formula_trailing, magic_formula_future] = composites;
        Self {
            rank_ebitda,
            rank_pe_ratio_ttm,
            rank_pe_ratio_ftm,
            rank_peg_ratio,
            rank_garp_ratio,
            rank_return_on_assets,
            rank_return_on_equity,
            rank_dividend_yield,
            rank_magic_formula_trailing,
            rank_magic_formula_future,
            magic_formula_trailing,
            magic_formula_future,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRecord {
    pub symbol: String,
    pub name: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    pub symbol: String,
    pub date: String,
    pub values: MetricValues,
}

/// A snapshot row joined with its owning company's sector.
#[derive(Debug, Clone, PartialEq)]
pub struct SectorSnapshotRecord {
    pub snapshot: SnapshotRecord,
    pub sector: Option<String>,
}

/// Every row of one snapshot date, read together with the date's write version.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotBatch {
    pub date: String,
    pub version: u64,
    pub rows: Vec<SectorSnapshotRecord>,
}

/// Filters and paging for a company listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyQuery {
    /// Exact sector match.
    pub sector: Option<String>,
    /// Case-insensitive substring of the symbol or the name.
    pub search: Option<String>,
    pub offset: usize,
    pub limit: usize,
}

/// One company refresh plus one snapshot write.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotUpsert {
    pub company: CompanyRecord,
    pub snapshot: SnapshotRecord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankRecord {
    pub symbol: String,
    pub date: String,
    pub ranks: RankValues,
}

/// Parameters of a leaderboard read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedQuery {
    pub rank_column: &'static str,
    pub score_column: &'static str,
    pub limit: usize,
}

/// A leaderboard row: company identity, rank, score and display metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRecord {
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
