//! Core ranking engine for stockrank.
//!
//! This crate contains:
//! - Domain types for companies, dated metric snapshots and derived ranks
//! - The ranking pass: per-metric dense ranks and Magic Formula composites
//! - The strategy registry and the ranking query service
//! - JSON import, the sample dataset and the response envelope

pub mod domain;
pub mod envelope;
pub mod error;
pub mod ingest;
pub mod ranking;
pub mod seed;
pub mod service;
pub mod store;
pub mod strategy;

pub use domain::{
    garp_ratio, normalize_metrics, Company, CompositeMetric, MetricSnapshot, MetricValues,
    RankValues, RankedMetric, Snapshot, SnapshotDate, SnapshotRow, SortDirection, Symbol,
};
pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta, SCHEMA_VERSION};
pub use error::{CoreError, ValidationError};
pub use ingest::{import_rows, parse_document, ImportRejection, ImportReport, ImportRow};
pub use ranking::{
    apply_composites, compute_ranks, dense_ranks, is_excluded_sector, rank_snapshot,
    DerivedMetrics, MetricCoverage, RankedSnapshot, EXCLUDED_SECTORS,
};
pub use seed::{sample_rows, seed};
pub use service::{
    RankingReport, RankingService, SnapshotDetail, DEFAULT_COMPANY_LIMIT, DEFAULT_LIMIT,
    MAX_COMPANY_LIMIT, MAX_LIMIT,
};
pub use store::{CompanyFilter, CompanySnapshot, RankingEntry, SnapshotStore};
pub use stockrank_warehouse::{UpsertOutcome, Warehouse, WarehouseConfig, WarehouseError};
pub use strategy::{StrategyDescriptor, StrategyRegistry, StrategySummary, StrategyTarget};
