//! Ledger entry writer.
//!
//! Stages exactly one immutable entry per call into the engine's write
//! batch. Never opens its own transaction: the engine commits the batch
//! as one unit, and the store assigns the commit timestamp.

use kivela_shared::types::{AccountId, LedgerEntryId, Money, WithdrawalRequestId};
use kivela_store::{EntryCategory, EntryDirection, EntryRef, EntryStatus, StagedEntry, WriteBatch};

/// Stages a settled debit entry on `owner_id`.
pub(crate) fn debit(
    batch: &mut WriteBatch,
    owner_id: AccountId,
    amount: Money,
    category: EntryCategory,
    description: String,
    note: Option<String>,
    related: EntryRef,
) -> LedgerEntryId {
    stage(
        batch,
        owner_id,
        amount,
        EntryDirection::Debit,
        category,
        description,
        note,
        related,
        EntryStatus::Settled,
    )
}

/// Stages a settled credit entry on `owner_id`.
pub(crate) fn credit(
    batch: &mut WriteBatch,
    owner_id: AccountId,
    amount: Money,
    category: EntryCategory,
    description: String,
    note: Option<String>,
    related: EntryRef,
) -> LedgerEntryId {
    stage(
        batch,
        owner_id,
        amount,
        EntryDirection::Credit,
        category,
        description,
        note,
        related,
        EntryStatus::Settled,
    )
}

/// Stages the pending hold entry for a withdrawal request.
///
/// The entry carries the payout amount; the fee is tracked on the request
/// row, not duplicated here.
pub(crate) fn withdrawal_hold(
    batch: &mut WriteBatch,
    owner_id: AccountId,
    amount: Money,
    request_id: WithdrawalRequestId,
) -> LedgerEntryId {
    stage(
        batch,
        owner_id,
        amount,
        EntryDirection::Debit,
        EntryCategory::WithdrawalPending,
        "Withdrawal request".to_string(),
        None,
        EntryRef::WithdrawalRequest(request_id),
        EntryStatus::Pending,
    )
}

#[allow(clippy::too_many_arguments)]
fn stage(
    batch: &mut WriteBatch,
    owner_id: AccountId,
    amount: Money,
    direction: EntryDirection,
    category: EntryCategory,
    description: String,
    note: Option<String>,
    related: EntryRef,
    status: EntryStatus,
) -> LedgerEntryId {
    let id = LedgerEntryId::new();
    batch.push_entry(StagedEntry {
        id,
        owner_id,
        amount,
        direction,
        category,
        description,
        note,
        related,
        status,
    });
    id
}
