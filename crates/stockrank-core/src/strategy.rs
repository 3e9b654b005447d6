//! Named ranking strategies.
//!
//! A strategy names the rank column a leaderboard orders by and the score
//! column shown beside it. The registry is fixed at construction; lookups for
//! anything else fail with [`CoreError::UnknownStrategy`].

use std::collections::BTreeSet;

use serde::Serialize;

use crate::domain::{CompositeMetric, RankedMetric};
use crate::{CoreError, ValidationError};

/// What a strategy orders by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyTarget {
    Metric(RankedMetric),
    Composite(CompositeMetric),
}

impl StrategyTarget {
    pub const fn rank_column(self) -> &'static str {
        match self {
            Self::Metric(metric) => metric.rank_column(),
            Self::Composite(composite) => composite.rank_column(),
        }
    }

    pub const fn score_column(self) -> &'static str {
        match self {
            Self::Metric(metric) => metric.key(),
            Self::Composite(composite) => composite.key(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyDescriptor {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub target: StrategyTarget,
}

impl StrategyDescriptor {
    pub const fn new(
        key: &'static str,
        name: &'static str,
        description: &'static str,
        target: StrategyTarget,
    ) -> Self {
        Self {
            key,
            name,
            description,
            target,
        }
    }

    pub fn summary(&self) -> StrategySummary {
        StrategySummary {
            key: self.key,
            name: self.name,
            description: self.description,
            rank_column: self.target.rank_column(),
            score_column: self.target.score_column(),
        }
    }
}

/// Serializable view of a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrategySummary {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub rank_column: &'static str,
    pub score_column: &'static str,
}

const STANDARD: [StrategyDescriptor; 10] = [
    StrategyDescriptor::new(
        "magic_formula_trailing",
        "Magic Formula (Trailing)",
        "Joel Greenblatt's Magic Formula on trailing P/E and return on assets",
        StrategyTarget::Composite(CompositeMetric::MagicFormulaTrailing),
    ),
    StrategyDescriptor::new(
        "magic_formula_future",
        "Magic Formula (Future)",
        "Joel Greenblatt's Magic Formula on forward P/E and return on assets",
        StrategyTarget::Composite(CompositeMetric::MagicFormulaFuture),
    ),
    StrategyDescriptor::new(
        "ebitda",
        "EBITDA",
        "Earnings before interest, taxes, depreciation and amortization, highest first",
        StrategyTarget::Metric(RankedMetric::Ebitda),
    ),
    StrategyDescriptor::new(
        "pe_ratio_ttm",
        "P/E Ratio (TTM)",
        "Trailing twelve month price to earnings, lowest first",
        StrategyTarget::Metric(RankedMetric::PeRatioTtm),
    ),
    StrategyDescriptor::new(
        "pe_ratio_ftm",
        "P/E Ratio (Forward)",
        "Forward twelve month price to earnings, lowest first",
        StrategyTarget::Metric(RankedMetric::PeRatioFtm),
    ),
    StrategyDescriptor::new(
        "peg_ratio",
        "PEG Ratio",
        "Price/earnings to growth, lowest first",
        StrategyTarget::Metric(RankedMetric::PegRatio),
    ),
    StrategyDescriptor::new(
        "garp_ratio",
        "GARP Ratio",
        "Growth at a reasonable price, trailing P/E over PEG, lowest first",
        StrategyTarget::Metric(RankedMetric::GarpRatio),
    ),
    StrategyDescriptor::new(
        "return_on_assets",
        "Return on Assets",
        "Net income relative to total assets, highest first",
        StrategyTarget::Metric(RankedMetric::ReturnOnAssets),
    ),
    StrategyDescriptor::new(
        "return_on_equity",
        "Return on Equity",
        "Net income relative to shareholder equity, highest first",
        StrategyTarget::Metric(RankedMetric::ReturnOnEquity),
    ),
    StrategyDescriptor::new(
        "dividend_yield",
        "Dividend Yield",
        "Annual dividend as a share of price, highest first",
        StrategyTarget::Metric(RankedMetric::DividendYield),
    ),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyRegistry {
    strategies: Vec<StrategyDescriptor>,
}

impl StrategyRegistry {
    /// Build a registry, rejecting empty or repeated keys.
    pub fn new(strategies: Vec<StrategyDescriptor>) -> Result<Self, ValidationError> {
        let mut seen = BTreeSet::new();
        for strategy in &strategies {
            if strategy.key.trim().is_empty() {
                return Err(ValidationError::EmptyStrategyKey);
            }
            if !seen.insert(strategy.key) {
                return Err(ValidationError::DuplicateStrategy {
                    key: strategy.key.to_owned(),
                });
            }
        }
        Ok(Self { strategies })
    }

    /// The ten built-in strategies: both Magic Formula variants plus one per
    /// ranked metric.
    pub fn standard() -> Self {
        Self {
            strategies: STANDARD.to_vec(),
        }
    }

    pub fn lookup(&self, key: &str) -> Result<&StrategyDescriptor, CoreError> {
        let wanted = key.trim();
        self.strategies
            .iter()
            .find(|strategy| strategy.key.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CoreError::UnknownStrategy {
                key: wanted.to_owned(),
            })
    }

    pub fn strategies(&self) -> &[StrategyDescriptor] {
        &self.strategies
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
