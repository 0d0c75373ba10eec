//! The store contract the ledger engine is written against.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::broadcast;

use kivela_shared::types::AccountId;

use crate::batch::WriteBatch;
use crate::documents::{AccountRecord, NotificationRecord};
use crate::error::StoreError;

/// An account together with its commit version.
///
/// The version moves on every committed write to the account; a commit
/// whose read set carries a stale version is rejected as a conflict.
#[derive(Debug, Clone, PartialEq)]
pub struct VersionedAccount {
    /// The account record as of the snapshot.
    pub record: AccountRecord,
    /// Commit version the record was read at.
    pub version: u64,
}

/// An atomic read of a set of accounts.
///
/// Accounts missing from the store are simply absent from the snapshot.
#[derive(Debug, Clone)]
pub struct AccountSnapshot {
    accounts: HashMap<AccountId, VersionedAccount>,
}

impl AccountSnapshot {
    /// Creates a snapshot from the accounts a store found.
    #[must_use]
    pub fn new(accounts: HashMap<AccountId, VersionedAccount>) -> Self {
        Self { accounts }
    }

    /// Returns the account record, if the account existed at read time.
    #[must_use]
    pub fn account(&self, id: AccountId) -> Option<&AccountRecord> {
        self.accounts.get(&id).map(|v| &v.record)
    }

    /// Returns true if the account existed at read time.
    #[must_use]
    pub fn contains(&self, id: AccountId) -> bool {
        self.accounts.contains_key(&id)
    }

    /// The versions observed by this snapshot, used as a commit read set.
    #[must_use]
    pub fn read_set(&self) -> Vec<(AccountId, u64)> {
        self.accounts
            .iter()
            .map(|(id, v)| (*id, v.version))
            .collect()
    }
}

/// Event published after a notification record is committed.
///
/// The push-delivery collaborator subscribes to this feed; delivery is
/// decoupled from persistence, so a failed delivery never unwinds a commit.
#[derive(Debug, Clone)]
pub struct NotificationCreated {
    /// The account the notification was created for.
    pub account_id: AccountId,
    /// The committed notification.
    pub notification: NotificationRecord,
}

/// Atomic multi-account document store.
///
/// Implementations must provide snapshot reads over an account set and
/// all-or-nothing commits with conflict detection: a commit fails if any
/// account in its read set was written since the snapshot was taken.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Atomically reads the given accounts with their commit versions.
    async fn snapshot(&self, ids: &[AccountId]) -> Result<AccountSnapshot, StoreError>;

    /// Atomically applies a write batch.
    ///
    /// Every staged record is stamped with the commit timestamp, which is
    /// returned on success. Nothing is persisted on failure.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if any read-set version is stale.
    async fn commit(&self, batch: WriteBatch) -> Result<DateTime<Utc>, StoreError>;

    /// Subscribes to committed-notification events.
    fn notification_feed(&self) -> broadcast::Receiver<NotificationCreated>;
}
