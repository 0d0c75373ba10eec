//! The all-or-nothing write unit committed by a store.
//!
//! A batch captures the snapshot's read set at construction. Staged records
//! carry no timestamp; the store stamps them at commit so record times
//! reflect commit time, not staging time.

use kivela_shared::types::{
    AccountId, CreditRequestId, LedgerEntryId, Money, NotificationId, WithdrawalRequestId,
};

use crate::documents::{EntryCategory, EntryDirection, EntryRef, EntryStatus, NotificationCategory};
use crate::traits::AccountSnapshot;

/// A ledger entry staged for commit.
#[derive(Debug, Clone)]
pub struct StagedEntry {
    /// Entry id, assigned at staging.
    pub id: LedgerEntryId,
    /// Owning account.
    pub owner_id: AccountId,
    /// Absolute magnitude moved.
    pub amount: Money,
    /// Debit or credit.
    pub direction: EntryDirection,
    /// Business category.
    pub category: EntryCategory,
    /// Human-readable description.
    pub description: String,
    /// Optional caller-supplied note.
    pub note: Option<String>,
    /// Counterpart account or request.
    pub related: EntryRef,
    /// Settlement status.
    pub status: EntryStatus,
}

/// A notification staged for commit.
#[derive(Debug, Clone)]
pub struct StagedNotification {
    /// Notification id, assigned at staging.
    pub id: NotificationId,
    /// Owning account.
    pub owner_id: AccountId,
    /// Title line.
    pub title: String,
    /// Body text.
    pub body: String,
    /// Category.
    pub category: NotificationCategory,
}

/// A withdrawal request staged for commit. Committed with status `Pending`.
#[derive(Debug, Clone)]
pub struct StagedWithdrawalRequest {
    /// Request id, assigned at staging.
    pub id: WithdrawalRequestId,
    /// Requesting account.
    pub user_id: AccountId,
    /// Display name of the requesting account.
    pub user_name: String,
    /// Amount to pay out.
    pub amount: Money,
    /// Withdrawal fee.
    pub fee: Money,
    /// Total removed from the balance.
    pub total_debited: Money,
    /// Beneficiary full name.
    pub beneficiary_name: String,
    /// Beneficiary bank identifier.
    pub iban: String,
}

/// A credit request staged for commit. Committed with status `Pending`.
#[derive(Debug, Clone)]
pub struct StagedCreditRequest {
    /// Request id, assigned at staging.
    pub id: CreditRequestId,
    /// Applying account.
    pub user_id: AccountId,
    /// Display name of the applying account.
    pub user_name: String,
    /// Amount of credit applied for.
    pub requested_amount: Money,
    /// Stated reason.
    pub reason: String,
}

/// Staged writes spanning multiple accounts, committed as one unit.
#[derive(Debug, Clone)]
pub struct WriteBatch {
    /// Account versions observed by the snapshot this batch was built from.
    pub read_set: Vec<(AccountId, u64)>,
    /// New balances, one per updated account.
    pub balance_updates: Vec<(AccountId, Money)>,
    /// Ledger entries to append.
    pub entries: Vec<StagedEntry>,
    /// Notifications to append.
    pub notifications: Vec<StagedNotification>,
    /// Withdrawal requests to insert.
    pub withdrawal_requests: Vec<StagedWithdrawalRequest>,
    /// Credit requests to insert.
    pub credit_requests: Vec<StagedCreditRequest>,
}

impl WriteBatch {
    /// Creates an empty batch whose read set is the given snapshot.
    #[must_use]
    pub fn for_snapshot(snapshot: &AccountSnapshot) -> Self {
        Self {
            read_set: snapshot.read_set(),
            balance_updates: Vec::new(),
            entries: Vec::new(),
            notifications: Vec::new(),
            withdrawal_requests: Vec::new(),
            credit_requests: Vec::new(),
        }
    }

    /// Stages a new balance for an account.
    pub fn set_balance(&mut self, account_id: AccountId, balance: Money) {
        self.balance_updates.push((account_id, balance));
    }

    /// Stages a ledger entry append.
    pub fn push_entry(&mut self, entry: StagedEntry) {
        self.entries.push(entry);
    }

    /// Stages a notification append.
    pub fn push_notification(&mut self, notification: StagedNotification) {
        self.notifications.push(notification);
    }

    /// Stages a withdrawal request insert.
    pub fn push_withdrawal_request(&mut self, request: StagedWithdrawalRequest) {
        self.withdrawal_requests.push(request);
    }

    /// Stages a credit request insert.
    pub fn push_credit_request(&mut self, request: StagedCreditRequest) {
        self.credit_requests.push(request);
    }
}
