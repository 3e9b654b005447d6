//! JSON snapshot import.
//!
//! An import document is an array of rows:
//!
//! ```json
//! [{"symbol": "AAPL", "name": "Apple Inc.", "sector": "Technology",
//!   "date": "2026-02-20", "metrics": {"pe_ratio_ttm": 38.5, "return_on_assets": 30.5}}]
//! ```
//!
//! Rows without a `date` land on the caller's default date. Rows with an
//! invalid symbol or date are reported and skipped; the rest are written in
//! one batch.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use stockrank_warehouse::UpsertOutcome;
use tracing::{info, warn};

use crate::domain::company::clean_text;
use crate::domain::{normalize_metrics, Company, MetricSnapshot, MetricValues, SnapshotDate, Symbol};
use crate::store::{CompanySnapshot, SnapshotStore};
use crate::{CoreError, ValidationError};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ImportRow {
    pub symbol: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub metrics: MetricValues,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportRejection {
    /// Zero-based position in the input.
    pub index: usize,
    pub symbol: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ImportReport {
    pub total: usize,
    pub inserted: usize,
    pub updated: usize,
    pub unchanged: usize,
    /// Earlier rows for a `(symbol, date)` that a later row in the same input replaced.
    pub superseded: usize,
    pub rejected: Vec<ImportRejection>,
    /// Dates that received writes.
    pub dates: Vec<SnapshotDate>,
}

impl ImportReport {
    pub fn written(&self) -> usize {
        self.inserted + self.updated
    }
}

pub fn parse_document(document: &str) -> Result<Vec<ImportRow>, CoreError> {
    Ok(serde_json::from_str(document)?)
}

fn prepare(row: ImportRow, default_date: SnapshotDate) -> Result<CompanySnapshot, ValidationError> {
    let symbol = Symbol::parse(&row.symbol)?;
    let date = match row.date.as_deref().map(str::trim) {
        Some(date) if !date.is_empty() => SnapshotDate::parse(date)?,
        _ => default_date,
    };

    Ok(CompanySnapshot {
        company: Company {
            symbol: symbol.clone(),
            name: clean_text(row.name),
            sector: clean_text(row.sector),
            industry: clean_text(row.industry),
        },
        snapshot: MetricSnapshot::new(symbol, date, normalize_metrics(row.metrics)),
    })
}

/// Validate, deduplicate and write `rows`.
///
/// Rows identical to what is already stored are counted as unchanged and not
/// rewritten, so re-importing the same document leaves stored ranks in place.
pub fn import_rows<S: SnapshotStore>(
    store: &S,
    rows: Vec<ImportRow>,
    default_date: SnapshotDate,
) -> Result<ImportReport, CoreError> {
    let mut report = ImportReport {
        total: rows.len(),
        ..ImportReport::default()
    };

    let mut pending = BTreeMap::new();
    for (index, row) in rows.into_iter().enumerate() {
        let symbol = row.symbol.clone();
        match prepare(row, default_date) {
            Ok(prepared) => {
                let key = (prepared.snapshot.symbol.clone(), prepared.snapshot.date);
                if pending.insert(key, prepared).is_some() {
                    report.superseded += 1;
                }
            }
            Err(err) => {
                warn!(index, symbol = %symbol, error = %err, "import row rejected");
                report.rejected.push(ImportRejection {
                    index,
                    symbol,
                    reason: err.to_string(),
                });
            }
        }
    }

    let mut writes = Vec::with_capacity(pending.len());
    for prepared in pending.into_values() {
        if is_stored(store, &prepared)? {
            report.unchanged += 1;
        } else {
            writes.push(prepared);
        }
    }

    for outcome in store.upsert_snapshots(&writes)? {
        match outcome {
            UpsertOutcome::Inserted => report.inserted += 1,
            UpsertOutcome::Updated => report.updated += 1,
        }
    }
    report.dates = writes
        .iter()
        .map(|row| row.snapshot.date)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    info!(
        total = report.total,
        inserted = report.inserted,
        updated = report.updated,
        unchanged = report.unchanged,
        rejected = report.rejected.len(),
        "import complete"
    );
    Ok(report)
}

fn is_stored<S: SnapshotStore>(store: &S, row: &CompanySnapshot) -> Result<bool, CoreError> {
    let snapshot = &row.snapshot;
    let Some(stored) = store.find_snapshot(&snapshot.symbol, snapshot.date)? else {
        return Ok(false);
    };
    if stored.values != snapshot.values {
        return Ok(false);
    }
    Ok(store
        .find_company(&snapshot.symbol)?
        .is_some_and(|company| row.company.is_covered_by(&company)))
}
