//! Application-wide error taxonomy.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error taxonomy.
///
/// Validation and business-rule failures carry enough detail for a
/// user-facing message; internal faults are collapsed to `Internal` at the
/// boundary so storage-layer detail never leaks to callers.
#[derive(Debug, Error)]
pub enum AppError {
    /// No verified caller identity.
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// Malformed or missing input, rejected before any store access.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Referenced account or request does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Business-rule precondition failure, distinct from a system fault.
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),

    /// Commit conflict retries exhausted.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Unexpected store or configuration fault.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Unauthenticated(_) => 401,
            Self::InvalidArgument(_) => 400,
            Self::NotFound(_) => 404,
            Self::InsufficientFunds(_) => 422,
            Self::Conflict(_) => 409,
            Self::Internal(_) => 500,
        }
    }

    /// Returns the stable error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthenticated(_) => "UNAUTHENTICATED",
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::NotFound(_) => "NOT_FOUND",
            Self::InsufficientFunds(_) => "INSUFFICIENT_FUNDS",
            Self::Conflict(_) => "CONFLICT",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
