//! Magic Formula composites and the sector exclusion rule.
//!
//! Companies whose sector is in [`EXCLUDED_SECTORS`], or whose sector mentions
//! utilities anywhere, get no composite value and no composite rank. Their
//! single-metric ranks are left alone.

use crate::domain::{CompositeMetric, SnapshotRow, SortDirection};
use crate::ranking::{dense_ranks, DerivedMetrics, MetricCoverage};

/// Sectors left out of composite scoring, matched exactly.
pub const EXCLUDED_SECTORS: [&str; 5] = [
    "Financial Services",
    "Financials",
    "Finance",
    "Energy",
    "Utilities",
];

const UTILITIES_FRAGMENT: &str = "utilities";

pub fn is_excluded_sector(sector: Option<&str>) -> bool {
    let Some(sector) = sector.map(str::trim) else {
        return false;
    };
    EXCLUDED_SECTORS.contains(&sector) || sector.to_ascii_lowercase().contains(UTILITIES_FRAGMENT)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeOutcome {
    pub coverage: Vec<MetricCoverage>,
    pub excluded: usize,
}

/// Fill composite values and ranks on `derived`, which must line up with `rows`
/// and already carry single-metric ranks.
///
/// A composite value exists only when both component ranks are present and
/// non-zero. Composites rank ascending: the lowest sum is rank 1.
pub fn apply_composites(rows: &[SnapshotRow], derived: &mut [DerivedMetrics]) -> CompositeOutcome {
    debug_assert_eq!(rows.len(), derived.len());

    let excluded = rows
        .iter()
        .map(|row| is_excluded_sector(row.sector.as_deref()))
        .collect::<Vec<_>>();

    let mut coverage = Vec::with_capacity(CompositeMetric::ALL.len());
    for composite in CompositeMetric::ALL {
        let (first, second) = composite.components();
        for (target, excluded) in derived.iter_mut().zip(&excluded) {
            let value = if *excluded {
                None
            } else {
                match (first.rank(&target.ranks), second.rank(&target.ranks)) {
                    (Some(a), Some(b)) if a > 0 && b > 0 => a.checked_add(b),
                    _ => None,
                }
            };
            composite.set_value(&mut target.ranks, value);
        }

        let entries = derived
            .iter()
            .map(|target| {
                (
                    target.symbol.as_str(),
                    composite.value(&target.ranks).map(f64::from),
                )
            })
            .collect::<Vec<_>>();
        let ranks = dense_ranks(&entries, SortDirection::Ascending);

        let mut ranked = 0;
        for (target, rank) in derived.iter_mut().zip(ranks) {
            ranked += usize::from(rank.is_some());
            composite.set_rank(&mut target.ranks, rank);
        }
        coverage.push(MetricCoverage {
            metric: composite.key(),
            ranked,
        });
    }

    CompositeOutcome {
        coverage,
        excluded: excluded.iter().filter(|excluded| **excluded).count(),
    }
}
