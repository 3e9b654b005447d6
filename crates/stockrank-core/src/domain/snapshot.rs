use serde::Serialize;
use stockrank_warehouse::{MetricValues, SectorSnapshotRecord, SnapshotRecord};

use crate::domain::{SnapshotDate, Symbol};
use crate::ValidationError;

/// Raw metrics for one company on one date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSnapshot {
    pub symbol: Symbol,
    pub date: SnapshotDate,
    pub values: MetricValues,
}

impl MetricSnapshot {
    pub fn new(symbol: Symbol, date: SnapshotDate, values: MetricValues) -> Self {
        Self {
            symbol,
            date,
            values,
        }
    }

    pub(crate) fn into_record(self) -> SnapshotRecord {
        SnapshotRecord {
            symbol: self.symbol.into(),
            date: self.date.to_iso_string(),
            values: self.values,
        }
    }

    pub(crate) fn from_record(record: SnapshotRecord) -> Result<Self, ValidationError> {
        Ok(Self {
            symbol: Symbol::parse(&record.symbol)?,
            date: SnapshotDate::parse(&record.date)?,
            values: record.values,
        })
    }
}

/// A snapshot row as the ranking pass sees it: metrics plus the company sector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotRow {
    pub snapshot: MetricSnapshot,
    pub sector: Option<String>,
}

impl SnapshotRow {
    pub fn symbol(&self) -> &Symbol {
        &self.snapshot.symbol
    }

    pub fn values(&self) -> &MetricValues {
        &self.snapshot.values
    }

    pub(crate) fn from_record(record: SectorSnapshotRecord) -> Result<Self, ValidationError> {
        Ok(Self {
            snapshot: MetricSnapshot::from_record(record.snapshot)?,
            sector: record.sector,
        })
    }
}

/// Every row stored for the most recent snapshot date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub date: SnapshotDate,
    /// Write version of `date` at the time the rows were read.
    pub version: u64,
    pub rows: Vec<SnapshotRow>,
}

/// GARP ratio from trailing P/E and PEG, rounded to two decimals.
///
/// Defined only when both inputs are present and positive.
pub fn garp_ratio(pe_ratio_ttm: Option<f64>, peg_ratio: Option<f64>) -> Option<f64> {
    match (pe_ratio_ttm, peg_ratio) {
        (Some(pe), Some(peg)) if pe > 0.0 && peg > 0.0 => {
            let ratio = pe / peg;
            ratio.is_finite().then(|| (ratio * 100.0).round() / 100.0)
        }
        _ => None,
    }
}

/// Replace non-finite numbers with nulls and fill a missing GARP ratio.
pub fn normalize_metrics(values: MetricValues) -> MetricValues {
    let columns = values
        .to_columns()
        .map(|value| value.filter(|value| value.is_finite()));
    let mut values = MetricValues::from_columns(columns);
    if values.garp_ratio.is_none() {
        values.garp_ratio = garp_ratio(values.pe_ratio_ttm, values.peg_ratio);
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garp_requires_positive_inputs() {
        assert_eq!(garp_ratio(Some(30.0), Some(2.0)), Some(15.0));
        assert_eq!(garp_ratio(Some(10.0), Some(3.0)), Some(3.33));
        assert_eq!(garp_ratio(Some(-5.0), Some(2.0)), None);
        assert_eq!(garp_ratio(Some(10.0), Some(0.0)), None);
        assert_eq!(garp_ratio(None, Some(1.0)), None);
    }

    #[test]
    fn normalize_drops_non_finite_and_keeps_given_garp() {
        let values = normalize_metrics(MetricValues {
            ebitda: Some(f64::NAN),
            pe_ratio_ttm: Some(f64::INFINITY),
            peg_ratio: Some(2.0),
            garp_ratio: None,
            ..MetricValues::default()
        });
        assert_eq!(values.ebitda, None);
        assert_eq!(values.pe_ratio_ttm, None);
        assert_eq!(values.garp_ratio, None);

        let given = normalize_metrics(MetricValues {
            pe_ratio_ttm: Some(20.0),
            peg_ratio: Some(2.0),
            garp_ratio: Some(4.5),
            ..MetricValues::default()
        });
        assert_eq!(given.garp_ratio, Some(4.5));
    }
}
