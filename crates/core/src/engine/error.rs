//! Engine error types.

use thiserror::Error;

use kivela_shared::AppError;
use kivela_store::StoreError;

/// Errors surfaced by ledger operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Malformed input, rejected before any store access.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A referenced account does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// The balance does not cover the operation. A business-rule failure,
    /// distinct from a system fault.
    #[error("insufficient funds: {0}")]
    InsufficientFunds(String),

    /// The treasury account is not configured or not provisioned. Not
    /// caller-correctable and not retryable.
    #[error("treasury account is not configured")]
    TreasuryMisconfigured,

    /// Amount arithmetic overflowed.
    #[error("amount arithmetic overflow")]
    Overflow,

    /// Commit conflicts exhausted the retry budget.
    #[error("operation conflicted {attempts} times, giving up")]
    Conflict {
        /// Number of commit attempts made.
        attempts: u32,
    },

    /// Store fault other than a commit conflict.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::InvalidArgument(msg) => Self::InvalidArgument(msg),
            EngineError::NotFound(what) => Self::NotFound(what),
            EngineError::InsufficientFunds(msg) => Self::InsufficientFunds(msg),
            EngineError::Conflict { .. } => {
                Self::Conflict("the operation kept conflicting, please retry".to_string())
            }
            EngineError::TreasuryMisconfigured | EngineError::Overflow | EngineError::Store(_) => {
                Self::Internal(err.to_string())
            }
        }
    }
}
