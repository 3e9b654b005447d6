//! Domain types shared by the ranking pass, the registry and the import path.

pub mod company;
pub mod date;
pub mod metric;
pub mod snapshot;
pub mod symbol;

pub use company::Company;
pub use date::SnapshotDate;
pub use metric::{CompositeMetric, RankedMetric, SortDirection};
pub use snapshot::{garp_ratio, normalize_metrics, MetricSnapshot, Snapshot, SnapshotRow};
pub use stockrank_warehouse::{MetricValues, RankValues};
pub use symbol::Symbol;
