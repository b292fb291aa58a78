use thiserror::Error;

/// Unified error type for the model, command, and storage layers.
#[derive(Debug, Error)]
pub enum BudgetError {
    /// A structural invariant failed; the attempted change is discarded.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
    #[error("invalid reference: {0}")]
    InvalidReference(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("unknown currency: {0}")]
    UnknownCurrency(String),
    /// Contextual validation reported errors when a caller asked for a hard check.
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("storage error: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, BudgetError>;

impl From<std::io::Error> for BudgetError {
    fn from(err: std::io::Error) -> Self {
        BudgetError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for BudgetError {
    fn from(err: serde_json::Error) -> Self {
        BudgetError::Storage(err.to_string())
    }
}
