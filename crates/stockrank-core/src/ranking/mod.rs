//! Ranking pass over one snapshot date.
//!
//! [`compute_ranks`] assigns a dense rank per metric; [`composite::apply_composites`]
//! then sums component ranks into the Magic Formula scores and ranks those.
//! [`rank_snapshot`] runs both in order and is what callers normally want.

pub mod composite;

use serde::Serialize;
use stockrank_warehouse::{RankRecord, RankValues};

use crate::domain::{RankedMetric, SnapshotDate, SnapshotRow, SortDirection, Symbol};

pub use composite::{apply_composites, is_excluded_sector, EXCLUDED_SECTORS};

/// Derived ranks and composite scores for one symbol on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivedMetrics {
    pub symbol: Symbol,
    pub date: SnapshotDate,
    pub ranks: RankValues,
}

impl DerivedMetrics {
    pub(crate) fn to_record(&self) -> RankRecord {
        RankRecord {
            symbol: self.symbol.to_string(),
            date: self.date.to_iso_string(),
            ranks: self.ranks,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricCoverage {
    pub metric: &'static str,
    pub ranked: usize,
}

/// Output of a full ranking pass, aligned with the input rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedSnapshot {
    pub derived: Vec<DerivedMetrics>,
    pub metrics: Vec<MetricCoverage>,
    pub composites: Vec<MetricCoverage>,
    pub excluded_from_composites: usize,
}

/// Dense ranks `1..=k` over the eligible values, in input order.
///
/// A value is eligible when present and strictly positive. Ties on value fall
/// back to ascending symbol, so equal values get consecutive distinct ranks.
/// Ineligible entries come back as `None`.
pub fn dense_ranks(entries: &[(&str, Option<f64>)], direction: SortDirection) -> Vec<Option<u32>> {
    let mut eligible = entries
        .iter()
        .enumerate()
        .filter_map(|(index, (symbol, value))| {
            value
                .filter(|value| *value > 0.0)
                .map(|value| (index, *symbol, value))
        })
        .collect::<Vec<_>>();

    eligible.sort_by(|left, right| {
        let by_value = match direction {
            SortDirection::Ascending => left.2.total_cmp(&right.2),
            SortDirection::Descending => right.2.total_cmp(&left.2),
        };
        by_value.then_with(|| left.1.cmp(right.1))
    });

    let mut ranks = vec![None; entries.len()];
    for (position, (index, _, _)) in eligible.into_iter().enumerate() {
        ranks[index] = u32::try_from(position + 1).ok();
    }
    ranks
}

/// Single-metric ranks for every row, composites left unset.
pub fn compute_ranks(rows: &[SnapshotRow]) -> (Vec<DerivedMetrics>, Vec<MetricCoverage>) {
    let mut derived = rows
        .iter()
        .map(|row| DerivedMetrics {
            symbol: row.symbol().clone(),
            date: row.snapshot.date,
            ranks: RankValues::default(),
        })
        .collect::<Vec<_>>();

    let mut coverage = Vec::with_capacity(RankedMetric::ALL.len());
    for metric in RankedMetric::ALL {
        let entries = rows
            .iter()
            .map(|row| (row.symbol().as_str(), metric.value(row.values())))
            .collect::<Vec<_>>();
        let ranks = dense_ranks(&entries, metric.direction());

        let mut ranked = 0;
        for (target, rank) in derived.iter_mut().zip(ranks) {
            ranked += usize::from(rank.is_some());
            metric.set_rank(&mut target.ranks, rank);
        }
        coverage.push(MetricCoverage {
            metric: metric.key(),
            ranked,
        });
    }

    (derived, coverage)
}

/// Rank every metric, then score and rank the composites.
pub fn rank_snapshot(rows: &[SnapshotRow]) -> RankedSnapshot {
    let (mut derived, metrics) = compute_ranks(rows);
    let outcome = apply_composites(rows, &mut derived);
    RankedSnapshot {
        derived,
        metrics,
        composites: outcome.coverage,
        excluded_from_composites: outcome.excluded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascending_ranks_smallest_first() {
        let entries = [("A", Some(10.0)), ("B", Some(20.0)), ("C", Some(5.0))];
        let ranks = dense_ranks(&entries, SortDirection::Ascending);
        assert_eq!(ranks, vec![Some(2), Some(3), Some(1)]);
    }

    #[test]
    fn skips_missing_zero_and_negative_values() {
        let entries = [
            ("A", None),
            ("B", Some(0.0)),
            ("C", Some(-3.0)),
            ("D", Some(4.0)),
            ("E", Some(f64::NAN)),
        ];
        let ranks = dense_ranks(&entries, SortDirection::Descending);
        assert_eq!(ranks, vec![None, None, None, Some(1), None]);
    }

    #[test]
    fn ties_break_on_symbol() {
        let entries = [("ZETA", Some(12.0)), ("ALFA", Some(12.0)), ("MIDS", Some(20.0))];
        let ranks = dense_ranks(&entries, SortDirection::Descending);
        assert_eq!(ranks, vec![Some(3), Some(2), Some(1)]);
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(dense_ranks(&[], SortDirection::Ascending).is_empty());
    }
}
