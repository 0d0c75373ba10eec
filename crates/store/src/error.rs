//! Store error types.

use thiserror::Error;

use kivela_shared::types::AccountId;

/// Errors surfaced by a ledger store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An account in the commit's read set was written since the snapshot.
    #[error("commit conflict on account {0}")]
    Conflict(AccountId),

    /// Attempted to create an account that already exists.
    #[error("account {0} already exists")]
    AccountExists(AccountId),

    /// A balance update targeted an account the store does not hold.
    #[error("unknown account {0}")]
    UnknownAccount(AccountId),

    /// Backend fault (I/O, serialization, connectivity).
    #[error("storage backend error: {0}")]
    Backend(String),
}
