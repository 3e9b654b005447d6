use serde::Serialize;
use stockrank_warehouse::{MetricValues, RankValues};

/// Which end of a metric's range ranks first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Lower is better: the smallest eligible value gets rank 1.
    Ascending,
    /// Higher is better: the largest eligible value gets rank 1.
    Descending,
}

/// A raw metric that receives its own dense rank each pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RankedMetric {
    Ebitda,
    PeRatioTtm,
    PeRatioFtm,
    PegRatio,
    GarpRatio,
    ReturnOnAssets,
    ReturnOnEquity,
    DividendYield,
}

impl RankedMetric {
    pub const ALL: [Self; 8] = [
        Self::Ebitda,
        Self::PeRatioTtm,
        Self::PeRatioFtm,
        Self::PegRatio,
        Self::GarpRatio,
        Self::ReturnOnAssets,
        Self::ReturnOnEquity,
        Self::DividendYield,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            Self::Ebitda => "ebitda",
            Self::PeRatioTtm => "pe_ratio_ttm",
            Self::PeRatioFtm => "pe_ratio_ftm",
            Self::PegRatio => "peg_ratio",
            Self::GarpRatio => "garp_ratio",
            Self::ReturnOnAssets => "return_on_assets",
            Self::ReturnOnEquity => "return_on_equity",
            Self::DividendYield => "dividend_yield",
        }
    }

    pub const fn rank_column(self) -> &'static str {
        match self {
            Self::Ebitda => "rank_ebitda",
            Self::PeRatioTtm => "rank_pe_ratio_ttm",
            Self::PeRatioFtm => "rank_pe_ratio_ftm",
            Self::PegRatio => "rank_peg_ratio",
            Self::GarpRatio => "rank_garp_ratio",
            Self::ReturnOnAssets => "rank_return_on_assets",
            Self::ReturnOnEquity => "rank_return_on_equity",
            Self::DividendYield => "rank_dividend_yield",
        }
    }

    pub const fn direction(self) -> SortDirection {
        match self {
            Self::Ebitda | Self::ReturnOnAssets | Self::ReturnOnEquity | Self::DividendYield => {
                SortDirection::Descending
            }
            Self::PeRatioTtm | Self::PeRatioFtm | Self::PegRatio | Self::GarpRatio => {
                SortDirection::Ascending
            }
        }
    }

    pub const fn value(self, values: &MetricValues) -> Option<f64> {
        match self {
            Self::Ebitda => values.ebitda,
            Self::PeRatioTtm => values.pe_ratio_ttm,
            Self::PeRatioFtm => values.pe_ratio_ftm,
            Self::PegRatio => values.peg_ratio,
            Self::GarpRatio => values.garp_ratio,
            Self::ReturnOnAssets => values.return_on_assets,
            Self::ReturnOnEquity => values.return_on_equity,
            Self::DividendYield => values.dividend_yield,
        }
    }

    pub const fn rank(self, ranks: &RankValues) -> Option<u32> {
        match self {
            Self::Ebitda => ranks.rank_ebitda,
            Self::PeRatioTtm => ranks.rank_pe_ratio_ttm,
            Self::PeRatioFtm => ranks.rank_pe_ratio_ftm,
            Self::PegRatio => ranks.rank_peg_ratio,
            Self::GarpRatio => ranks.rank_garp_ratio,
            Self::ReturnOnAssets => ranks.rank_return_on_assets,
            Self::ReturnOnEquity => ranks.rank_return_on_equity,
            Self::DividendYield => ranks.rank_dividend_yield,
        }
    }

    pub fn set_rank(self, ranks: &mut RankValues, rank: Option<u32>) {
        let slot = match self {
            Self::Ebitda => &mut ranks.rank_ebitda,
            Self::PeRatioTtm => &mut ranks.rank_pe_ratio_ttm,
            Self::PeRatioFtm => &mut ranks.rank_pe_ratio_ftm,
            Self::PegRatio => &mut ranks.rank_peg_ratio,
            Self::GarpRatio => &mut ranks.rank_garp_ratio,
            Self::ReturnOnAssets => &mut ranks.rank_return_on_assets,
            Self::ReturnOnEquity => &mut ranks.rank_return_on_equity,
            Self::DividendYield => &mut ranks.rank_dividend_yield,
        };
        *slot = rank;
    }
}

/// Magic Formula composites: P/E rank plus return-on-assets rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositeMetric {
    MagicFormulaTrailing,
    MagicFormulaFuture,
}

impl CompositeMetric {
    pub const ALL: [Self; 2] = [Self::MagicFormulaTrailing, Self::MagicFormulaFuture];

    pub const fn key(self) -> &'static str {
        match self {
            Self::MagicFormulaTrailing => "magic_formula_trailing",
            Self::MagicFormulaFuture => "magic_formula_future",
        }
    }

    pub const fn rank_column(self) -> &'static str {
        match self {
            Self::MagicFormulaTrailing => "rank_magic_formula_trailing",
            Self::MagicFormulaFuture => "rank_magic_formula_future",
        }
    }

    /// The two single-metric ranks summed into this composite.
    pub const fn components(self) -> (RankedMetric, RankedMetric) {
        match self {
            Self::MagicFormulaTrailing => (RankedMetric::PeRatioTtm, RankedMetric::ReturnOnAssets),
            Self::MagicFormulaFuture => (RankedMetric::PeRatioFtm, RankedMetric::ReturnOnAssets),
        }
    }

    pub const fn value(self, ranks: &RankValues) -> Option<u32> {
        match self {
            Self::MagicFormulaTrailing => ranks.magic_formula_trailing,
            Self::MagicFormulaFuture => ranks.magic_formula_future,
        }
    }

    pub const fn rank(self, ranks: &RankValues) -> Option<u32> {
        match self {
            Self::MagicFormulaTrailing => ranks.rank_magic_formula_trailing,
            Self::MagicFormulaFuture => ranks.rank_magic_formula_future,
        }
    }

    pub fn set_value(self, ranks: &mut RankValues, value: Option<u32>) {
        match self {
            Self::MagicFormulaTrailing => ranks.magic_formula_trailing = value,
            Self::MagicFormulaFuture => ranks.magic_formula_future = value,
        }
    }

    pub fn set_rank(self, ranks: &mut RankValues, rank: Option<u32>) {
        match self {
            Self::MagicFormulaTrailing => ranks.rank_magic_formula_trailing = rank,
            Self::MagicFormulaFuture => ranks.rank_magic_formula_future = rank,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockrank_warehouse::{COMPOSITE_COLUMNS, METRIC_COLUMNS, RANK_COLUMNS};

    #[test]
    fn every_ranked_metric_maps_to_stored_columns() {
        for metric in RankedMetric::ALL {
            assert!(METRIC_COLUMNS.contains(&metric.key()), "{}", metric.key());
            assert!(RANK_COLUMNS.contains(&metric.rank_column()));
        }
        for composite in CompositeMetric::ALL {
            assert!(COMPOSITE_COLUMNS.contains(&composite.key()));
            assert!(RANK_COLUMNS.contains(&composite.rank_column()));
        }
    }

    #[test]
    fn valuation_ratios_rank_ascending() {
        assert_eq!(RankedMetric::PeRatioTtm.direction(), SortDirection::Ascending);
        assert_eq!(RankedMetric::GarpRatio.direction(), SortDirection::Ascending);
        assert_eq!(RankedMetric::Ebitda.direction(), SortDirection::Descending);
        assert_eq!(RankedMetric::DividendYield.direction(), SortDirection::Descending);
    }

    #[test]
    fn setters_write_the_matching_field() {
        let mut ranks = RankValues::default();
        RankedMetric::PegRatio.set_rank(&mut ranks, Some(3));
        CompositeMetric::MagicFormulaFuture.set_value(&mut ranks, Some(7));
        assert_eq!(ranks.rank_peg_ratio, Some(3));
        assert_eq!(ranks.magic_formula_future, Some(7));
        assert_eq!(CompositeMetric::MagicFormulaTrailing.value(&ranks), None);
    }
}
