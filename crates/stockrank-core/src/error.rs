use stockrank_warehouse::WarehouseError;
use thiserror::Error;

/// Validation and contract errors exposed by `stockrank-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must start with an ASCII letter: '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("date must be YYYY-MM-DD: '{value}'")]
    InvalidDate { value: String },

    #[error("strategy key cannot be empty")]
    EmptyStrategyKey,
    #[error("strategy '{key}' is registered more than once")]
    DuplicateStrategy { key: String },

    #[error("request_id must be at least 8 characters")]
    InvalidRequestId,
    #[error("schema_version must match vMAJOR.MINOR.PATCH: '{value}'")]
    InvalidSchemaVersion { value: String },
    #[error("error code cannot be empty")]
    EmptyErrorCode,
    #[error("error message cannot be empty")]
    EmptyErrorMessage,
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("strategy not found: '{key}'")]
    UnknownStrategy { key: String },

    #[error("limit must be greater than zero")]
    InvalidLimit,

    #[error("store error: {0}")]
    Store(#[from] WarehouseError),

    #[error("invalid import document: {0}")]
    Import(#[from] serde_json::Error),
}
