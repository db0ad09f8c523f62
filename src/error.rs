use thiserror::Error;

pub type Result<T> = std::result::Result<T, FilterError>;

#[derive(Error, Debug, PartialEq)]
pub enum FilterError {
    #[error("Expected items must be greater than 0, got {value}")]
    InvalidExpectedItems { value: i64 },

    #[error("False positive rate must be between 0 and 1, got {rate}")]
    InvalidFalsePositiveRate { rate: f64 },

    #[error("Filter size exceeds maximum: {size} > {max} bits")]
    FilterTooLarge { size: usize, max: usize },

    #[error("Filter has not been initialized")]
    NotInitialized,

    #[error("Filter construction task failed: {0}")]
    TaskFailed(String),

    #[error("Failed to parse environment variable {var_name}: value '{value}' - {error}")]
    EnvParseError {
        var_name: String,
        value: String,
        error: String,
    },
}

impl FilterError {
    /// True for errors caused by bad construction parameters.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            FilterError::InvalidExpectedItems { .. }
                | FilterError::InvalidFalsePositiveRate { .. }
                | FilterError::FilterTooLarge { .. }
        )
    }
}
