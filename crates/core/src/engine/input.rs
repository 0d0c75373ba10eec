//! Operation inputs and receipts.
//!
//! The acting ("self") account id in every input comes from the verified
//! caller identity, never from a request payload.

use chrono::{DateTime, Utc};
use serde::Serialize;

use kivela_shared::types::{AccountId, CreditRequestId, Money, WithdrawalRequestId};

/// Input for a peer-to-peer transfer.
#[derive(Debug, Clone)]
pub struct TransferInput {
    /// The authenticated sender.
    pub sender_id: AccountId,
    /// The receiving account.
    pub recipient_id: AccountId,
    /// Amount to move.
    pub amount: Money,
    /// Optional free-text note, copied onto both ledger entries.
    pub note: Option<String>,
}

/// Input for a point-of-sale payment.
#[derive(Debug, Clone)]
pub struct PaymentInput {
    /// The authenticated payer.
    pub payer_id: AccountId,
    /// The merchant account being paid.
    pub merchant_id: AccountId,
    /// Amount to pay.
    pub amount: Money,
}

/// Input for a withdrawal request.
#[derive(Debug, Clone)]
pub struct WithdrawalInput {
    /// The authenticated account requesting the payout.
    pub user_id: AccountId,
    /// Amount to pay out (the fee comes on top).
    pub amount: Money,
    /// Beneficiary full name.
    pub beneficiary_name: String,
    /// Beneficiary bank identifier.
    pub iban: String,
}

/// Input for a credit application.
#[derive(Debug, Clone)]
pub struct CreditRequestInput {
    /// The authenticated applicant.
    pub user_id: AccountId,
    /// Amount of credit applied for.
    pub amount: Money,
    /// Stated reason for the application.
    pub reason: String,
}

/// Acknowledgment of a committed transfer.
#[derive(Debug, Clone, Serialize)]
pub struct TransferReceipt {
    /// The sending account.
    pub sender_id: AccountId,
    /// The receiving account.
    pub recipient_id: AccountId,
    /// Amount moved.
    pub amount: Money,
    /// Commit time.
    pub committed_at: DateTime<Utc>,
}

/// Acknowledgment of a committed payment.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentReceipt {
    /// The paying account.
    pub payer_id: AccountId,
    /// The merchant account.
    pub merchant_id: AccountId,
    /// Amount paid.
    pub amount: Money,
    /// Commit time.
    pub committed_at: DateTime<Utc>,
}

/// Acknowledgment of a committed withdrawal request.
#[derive(Debug, Clone, Serialize)]
pub struct WithdrawalReceipt {
    /// The created request.
    pub request_id: WithdrawalRequestId,
    /// Amount to be paid out.
    pub amount: Money,
    /// Fee charged.
    pub fee: Money,
    /// Total removed from the balance.
    pub total_debited: Money,
    /// Commit time.
    pub committed_at: DateTime<Utc>,
}

/// Acknowledgment of a committed credit application.
#[derive(Debug, Clone, Serialize)]
pub struct CreditRequestReceipt {
    /// The created request.
    pub request_id: CreditRequestId,
    /// Amount of credit applied for.
    pub requested_amount: Money,
    /// Application fee charged.
    pub fee: Money,
    /// Commit time.
    pub committed_at: DateTime<Utc>,
}
