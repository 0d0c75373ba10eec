//! Account store abstraction and in-memory backend for Kivela.
//!
//! The engine requires a datastore offering atomic multi-account
//! read-modify-write with conflict detection; any such store is
//! interchangeable behind the [`LedgerStore`] trait. This crate provides:
//! - Document record types (accounts, ledger entries, notifications,
//!   withdrawal and credit requests)
//! - [`WriteBatch`]: the all-or-nothing unit a store commits
//! - [`MemoryStore`]: an in-memory backend with optimistic versioning

pub mod batch;
pub mod documents;
pub mod error;
pub mod memory;
pub mod traits;

pub use batch::{
    StagedCreditRequest, StagedEntry, StagedNotification, StagedWithdrawalRequest, WriteBatch,
};
pub use documents::{
    AccountRecord, CreditRequestRecord, CreditRequestStatus, EntryCategory, EntryDirection,
    EntryRef, EntryStatus, LedgerEntryRecord, NotificationCategory, NotificationRecord,
    WithdrawalRequestRecord, WithdrawalStatus,
};
pub use error::StoreError;
pub use memory::{MemoryStore, StoreState};
pub use traits::{AccountSnapshot, LedgerStore, NotificationCreated, VersionedAccount};
