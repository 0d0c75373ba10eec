//! In-memory account store with optimistic versioning.
//!
//! Commits take one writer lock, verify the batch's read set against
//! current account versions, and apply every staged write or nothing.
//! Notification events are published only after the commit is durable.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tracing::trace;

use kivela_shared::types::AccountId;

use crate::batch::WriteBatch;
use crate::documents::{
    AccountRecord, CreditRequestRecord, CreditRequestStatus, LedgerEntryRecord,
    NotificationRecord, WithdrawalRequestRecord, WithdrawalStatus,
};
use crate::error::StoreError;
use crate::traits::{AccountSnapshot, LedgerStore, NotificationCreated, VersionedAccount};

/// Buffered notification events before slow subscribers start losing them.
const NOTIFICATION_FEED_CAPACITY: usize = 256;

/// Complete store contents.
///
/// Cloneable so tests can assert that a rejected operation left the whole
/// store byte-for-byte unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreState {
    /// Accounts with their commit versions.
    pub accounts: HashMap<AccountId, VersionedAccount>,
    /// Per-account ledger entry history, in commit order.
    pub entries: HashMap<AccountId, Vec<LedgerEntryRecord>>,
    /// Per-account notification inbox, in commit order.
    pub notifications: HashMap<AccountId, Vec<NotificationRecord>>,
    /// Withdrawal requests in creation order.
    pub withdrawal_requests: Vec<WithdrawalRequestRecord>,
    /// Credit requests in creation order.
    pub credit_requests: Vec<CreditRequestRecord>,
}

/// In-memory [`LedgerStore`] backend.
#[derive(Debug)]
pub struct MemoryStore {
    state: RwLock<StoreState>,
    notification_tx: broadcast::Sender<NotificationCreated>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        let (notification_tx, _) = broadcast::channel(NOTIFICATION_FEED_CAPACITY);
        Self {
            state: RwLock::new(StoreState::default()),
            notification_tx,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Creates an account. Account opening itself is a collaborator concern;
    /// this is the surface that collaborator (and tests) use.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::AccountExists` if the id is already taken.
    pub fn insert_account(&self, record: AccountRecord) -> Result<(), StoreError> {
        let mut state = self.write();
        if state.accounts.contains_key(&record.id) {
            return Err(StoreError::AccountExists(record.id));
        }
        state
            .accounts
            .insert(record.id, VersionedAccount { record, version: 0 });
        Ok(())
    }

    /// Returns the current account record, if present.
    #[must_use]
    pub fn get_account(&self, id: AccountId) -> Option<AccountRecord> {
        self.read().accounts.get(&id).map(|v| v.record.clone())
    }

    /// Returns the ledger entry history of an account, in commit order.
    #[must_use]
    pub fn ledger_entries(&self, id: AccountId) -> Vec<LedgerEntryRecord> {
        self.read().entries.get(&id).cloned().unwrap_or_default()
    }

    /// Returns the notification inbox of an account, in commit order.
    #[must_use]
    pub fn notifications(&self, id: AccountId) -> Vec<NotificationRecord> {
        self.read()
            .notifications
            .get(&id)
            .cloned()
            .unwrap_or_default()
    }

    /// Returns all withdrawal requests, in creation order.
    #[must_use]
    pub fn withdrawal_requests(&self) -> Vec<WithdrawalRequestRecord> {
        self.read().withdrawal_requests.clone()
    }

    /// Returns all credit requests, in creation order.
    #[must_use]
    pub fn credit_requests(&self) -> Vec<CreditRequestRecord> {
        self.read().credit_requests.clone()
    }

    /// Clones the complete store contents.
    #[must_use]
    pub fn export(&self) -> StoreState {
        self.read().clone()
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn snapshot(&self, ids: &[AccountId]) -> Result<AccountSnapshot, StoreError> {
        let state = self.read();
        let mut accounts = HashMap::with_capacity(ids.len());
        for id in ids {
            if let Some(versioned) = state.accounts.get(id) {
                accounts.insert(*id, versioned.clone());
            }
        }
        Ok(AccountSnapshot::new(accounts))
    }

    async fn commit(&self, batch: WriteBatch) -> Result<DateTime<Utc>, StoreError> {
        let events: Vec<NotificationCreated>;
        let committed_at;
        {
            let mut state = self.write();

            // Validate the read set: any account written since the snapshot
            // fails the whole batch.
            for (id, version) in &batch.read_set {
                match state.accounts.get(id) {
                    Some(stored) if stored.version == *version => {}
                    _ => {
                        trace!(account_id = %id, "commit rejected, stale read");
                        return Err(StoreError::Conflict(*id));
                    }
                }
            }
            for (id, _) in &batch.balance_updates {
                if !state.accounts.contains_key(id) {
                    return Err(StoreError::UnknownAccount(*id));
                }
            }

            committed_at = Utc::now();

            for (id, balance) in batch.balance_updates {
                debug_assert!(!balance.is_negative(), "negative balance committed");
                if let Some(stored) = state.accounts.get_mut(&id) {
                    stored.record.balance = balance;
                    stored.version += 1;
                }
            }

            for staged in batch.entries {
                let record = LedgerEntryRecord {
                    id: staged.id,
                    owner_id: staged.owner_id,
                    amount: staged.amount,
                    direction: staged.direction,
                    category: staged.category,
                    description: staged.description,
                    note: staged.note,
                    related: staged.related,
                    status: staged.status,
                    timestamp: committed_at,
                };
                state.entries.entry(record.owner_id).or_default().push(record);
            }

            events = batch
                .notifications
                .into_iter()
                .map(|staged| {
                    let record = NotificationRecord {
                        id: staged.id,
                        owner_id: staged.owner_id,
                        title: staged.title,
                        body: staged.body,
                        category: staged.category,
                        is_read: false,
                        timestamp: committed_at,
                    };
                    state
                        .notifications
                        .entry(record.owner_id)
                        .or_default()
                        .push(record.clone());
                    NotificationCreated {
                        account_id: record.owner_id,
                        notification: record,
                    }
                })
                .collect();

            for staged in batch.withdrawal_requests {
                state.withdrawal_requests.push(WithdrawalRequestRecord {
                    id: staged.id,
                    user_id: staged.user_id,
                    user_name: staged.user_name,
                    amount: staged.amount,
                    fee: staged.fee,
                    total_debited: staged.total_debited,
                    beneficiary_name: staged.beneficiary_name,
                    iban: staged.iban,
                    status: WithdrawalStatus::Pending,
                    requested_at: committed_at,
                });
            }

            for staged in batch.credit_requests {
                state.credit_requests.push(CreditRequestRecord {
                    id: staged.id,
                    user_id: staged.user_id,
                    user_name: staged.user_name,
                    requested_amount: staged.requested_amount,
                    reason: staged.reason,
                    status: CreditRequestStatus::Pending,
                    created_at: committed_at,
                });
            }
        }

        // Publish only after the lock is released; a feed with no
        // subscribers is not an error.
        for event in events {
            let _ = self.notification_tx.send(event);
        }

        Ok(committed_at)
    }

    fn notification_feed(&self) -> broadcast::Receiver<NotificationCreated> {
        self.notification_tx.subscribe()
    }
}
