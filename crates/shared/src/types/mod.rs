//! Common domain types shared across crates.

pub mod id;
pub mod money;

pub use id::{AccountId, CreditRequestId, LedgerEntryId, NotificationId, WithdrawalRequestId};
pub use money::Money;
