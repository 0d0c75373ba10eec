//! Document record types persisted by the account store.
//!
//! Ledger entries and notifications are immutable once written. Account
//! balances are mutated only through committed write batches.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use kivela_shared::types::{
    AccountId, CreditRequestId, LedgerEntryId, Money, NotificationId, WithdrawalRequestId,
};

/// A ledger account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountRecord {
    /// Account id.
    pub id: AccountId,
    /// Display name shown to counterparties.
    pub display_name: String,
    /// Current balance. Never negative after a committed operation.
    pub balance: Money,
    /// Delivery-addressable push targets. Owned and mutated only by the
    /// notification delivery collaborator, never by the engine.
    #[serde(default)]
    pub notification_targets: Vec<String>,
}

impl AccountRecord {
    /// Creates an account with the given balance and no push targets.
    #[must_use]
    pub fn new(id: AccountId, display_name: impl Into<String>, balance: Money) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            balance,
            notification_targets: Vec::new(),
        }
    }
}

/// Direction of a ledger entry relative to its owning account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryDirection {
    /// Money left the account.
    Debit,
    /// Money arrived on the account.
    Credit,
}

/// Business category of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryCategory {
    /// Peer-to-peer transfer.
    Transfer,
    /// Point-of-sale payment.
    Payment,
    /// Funds held for a pending withdrawal payout.
    WithdrawalPending,
    /// Credit application fee.
    CreditFee,
}

/// Settlement status of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Awaiting external settlement (withdrawal holds only).
    Pending,
    /// Settled at commit time.
    Settled,
}

/// Cross-reference from a ledger entry to its counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum EntryRef {
    /// The account on the other side of the movement.
    Account(AccountId),
    /// The withdrawal request that holds the funds.
    WithdrawalRequest(WithdrawalRequestId),
}

/// An immutable debit/credit record in an account's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntryRecord {
    /// Entry id.
    pub id: LedgerEntryId,
    /// The account whose history this entry belongs to.
    pub owner_id: AccountId,
    /// Absolute magnitude moved. Always positive.
    pub amount: Money,
    /// Debit or credit.
    pub direction: EntryDirection,
    /// Business category.
    pub category: EntryCategory,
    /// Human-readable description.
    pub description: String,
    /// Optional free text supplied by the caller.
    pub note: Option<String>,
    /// Counterpart account or request.
    pub related: EntryRef,
    /// Settlement status.
    pub status: EntryStatus,
    /// Commit time.
    pub timestamp: DateTime<Utc>,
}

/// Category of a user-visible notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationCategory {
    /// Outgoing transfer confirmation.
    TransferOut,
    /// Incoming transfer.
    TransferIn,
    /// Outgoing payment confirmation.
    PaymentOut,
    /// Incoming payment.
    PaymentIn,
    /// Withdrawal request received.
    WithdrawalRequest,
    /// Credit application received.
    CreditRequest,
}

/// A notification in an account's inbox.
///
/// The payload is immutable; `is_read` is the only field a later process
/// may flip, and that belongs to a read collaborator, not this core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationRecord {
    /// Notification id.
    pub id: NotificationId,
    /// The account whose inbox this notification belongs to.
    pub owner_id: AccountId,
    /// Title line.
    pub title: String,
    /// Body text.
    pub body: String,
    /// Category.
    pub category: NotificationCategory,
    /// Whether the user has read the notification.
    pub is_read: bool,
    /// Commit time.
    pub timestamp: DateTime<Utc>,
}

/// Lifecycle of a withdrawal request. The engine only ever sets `Pending`;
/// later states belong to the payout collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WithdrawalStatus {
    /// Funds held, awaiting payout processing.
    Pending,
    /// Approved for payout.
    Approved,
    /// Rejected; funds to be returned.
    Rejected,
    /// Paid out to the beneficiary.
    Paid,
}

/// A request to pay out funds to an external bank account.
///
/// Created atomically alongside the debit of `total_debited` from the
/// requesting account (funds-held policy).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithdrawalRequestRecord {
    /// Request id.
    pub id: WithdrawalRequestId,
    /// The requesting account.
    pub user_id: AccountId,
    /// Display name of the requesting account at request time.
    pub user_name: String,
    /// Amount to pay out.
    pub amount: Money,
    /// Fee charged for the withdrawal.
    pub fee: Money,
    /// Total removed from the balance: `amount + fee`.
    pub total_debited: Money,
    /// Beneficiary full name.
    pub beneficiary_name: String,
    /// Beneficiary bank identifier.
    pub iban: String,
    /// Lifecycle status.
    pub status: WithdrawalStatus,
    /// Commit time.
    pub requested_at: DateTime<Utc>,
}

/// Lifecycle of a credit request. The engine only ever sets `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreditRequestStatus {
    /// Awaiting review.
    Pending,
    /// Approved by the credit collaborator.
    Approved,
    /// Rejected by the credit collaborator.
    Rejected,
}

/// A credit application.
///
/// Records the requested amount; the application fee is debited separately
/// and does not represent approval of the requested amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditRequestRecord {
    /// Request id.
    pub id: CreditRequestId,
    /// The applying account.
    pub user_id: AccountId,
    /// Display name of the applying account at request time.
    pub user_name: String,
    /// Amount of credit applied for.
    pub requested_amount: Money,
    /// Stated reason for the application.
    pub reason: String,
    /// Lifecycle status.
    pub status: CreditRequestStatus,
    /// Commit time.
    pub created_at: DateTime<Utc>,
}
