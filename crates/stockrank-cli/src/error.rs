use stockrank_core::{CoreError, ValidationError};
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("strict mode failed: warnings={warning_count}, errors={error_count}")]
    StrictModeViolation {
        warning_count: usize,
        error_count: usize,
    },

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Core(error) => match error {
                CoreError::UnknownStrategy { .. } => 4,
                CoreError::InvalidLimit | CoreError::Validation(_) | CoreError::Import(_) => 2,
                CoreError::Store(_) => 10,
            },
            Self::NotFound(_) => 4,
            Self::StrictModeViolation { .. } => 5,
            Self::Serialization(_) | Self::Io(_) => 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_strategy_maps_to_not_found() {
        let error = CliError::from(CoreError::UnknownStrategy {
            key: String::from("momentum"),
        });
        assert_eq!(error.exit_code(), 4);
        assert_eq!(error.to_string(), "strategy not found: 'momentum'");
    }

    #[test]
    fn input_problems_map_to_validation() {
        assert_eq!(CliError::from(CoreError::InvalidLimit).exit_code(), 2);
        assert_eq!(CliError::from(ValidationError::EmptySymbol).exit_code(), 2);
    }
}
