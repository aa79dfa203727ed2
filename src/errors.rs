use thiserror::Error;

/// Reasons a transaction input is rejected before the ledger is touched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{0} cannot be empty")]
    EmptyField(&'static str),
    #[error("date `{0}` must be a calendar date in format YYYY-MM-DD")]
    MalformedDate(String),
    #[error("amount must be a positive number (got {0})")]
    NonPositiveAmount(f64),
    #[error("`{0}` is not a valid amount")]
    InvalidAmount(String),
    #[error("unknown transaction kind `{0}` (expected Income or Expense)")]
    UnknownKind(String),
}

/// Error type that captures common ledger failures.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Invalid transaction: {0}")]
    Validation(#[from] ValidationError),
    #[error("No transaction at position {index} (ledger holds {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Nothing to undo")]
    EmptyUndo,
    #[error("Persistence error: {0}")]
    Storage(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, LedgerError>;

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        LedgerError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::Storage(err.to_string())
    }
}

impl From<csv::Error> for LedgerError {
    fn from(err: csv::Error) -> Self {
        LedgerError::Storage(err.to_string())
    }
}

impl LedgerError {
    /// Whether the failure came from user input rather than the environment.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            LedgerError::Validation(_)
                | LedgerError::IndexOutOfRange { .. }
                | LedgerError::EmptyUndo
        )
    }
}
