use thiserror::Error;

#[derive(Debug, Error)]
pub enum WarehouseError {
    #[error(transparent)]
    DuckDb(#[from] ::duckdb::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("query rejected: {0}")]
    QueryRejected(String),

    #[error("stored value is invalid: {0}")]
    InvalidData(String),

    #[error("snapshot for {date} changed while ranking (read version {expected}, now {found})")]
    StaleSnapshot {
        date: String,
        expected: u64,
        found: u64,
    },

    #[error("connection pool lock poisoned")]
    PoolPoisoned,
}
