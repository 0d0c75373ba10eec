//! The ledger transaction engine.
//!
//! Each operation follows one template: validate the request, snapshot the
//! involved accounts, check the business invariants, stage every write
//! (balances, ledger entries, notifications, request rows) into one batch,
//! and commit it atomically. A commit conflict restarts the operation from
//! the snapshot step, a bounded number of times. A failure before the
//! commit aborts with no persisted side effect.

pub mod error;
pub mod input;
pub mod validation;

mod entries;
mod notify;

#[cfg(test)]
mod validation_props;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use kivela_shared::LedgerConfig;
use kivela_shared::types::{AccountId, CreditRequestId, Money, WithdrawalRequestId};
use kivela_store::{
    AccountSnapshot, EntryCategory, EntryRef, LedgerStore, NotificationCategory,
    StagedCreditRequest, StagedWithdrawalRequest, StoreError, WriteBatch,
};

use self::error::EngineError;
use self::input::{
    CreditRequestInput, CreditRequestReceipt, PaymentInput, PaymentReceipt, TransferInput,
    TransferReceipt, WithdrawalInput, WithdrawalReceipt,
};

/// Orchestrates atomic ledger operations against an injected store.
pub struct LedgerEngine {
    store: Arc<dyn LedgerStore>,
    config: LedgerConfig,
}

impl LedgerEngine {
    /// Creates an engine over the given store and configuration.
    #[must_use]
    pub fn new(store: Arc<dyn LedgerStore>, config: LedgerConfig) -> Self {
        Self { store, config }
    }

    /// Runs one atomic operation: snapshot the account set, let the pure
    /// `plan` step turn the snapshot into a write batch, and commit.
    ///
    /// On a commit conflict the whole operation re-runs from the snapshot
    /// step, up to the configured retry budget.
    async fn run_atomic<T, F>(
        &self,
        accounts: &[AccountId],
        plan: F,
    ) -> Result<(T, DateTime<Utc>), EngineError>
    where
        F: Fn(&AccountSnapshot) -> Result<(WriteBatch, T), EngineError>,
    {
        let max_attempts = self.config.max_commit_retries.saturating_add(1);
        let mut attempt = 0;
        loop {
            attempt += 1;
            let snapshot = self.store.snapshot(accounts).await?;
            let (batch, outcome) = plan(&snapshot)?;
            match self.store.commit(batch).await {
                Ok(committed_at) => return Ok((outcome, committed_at)),
                Err(StoreError::Conflict(account_id)) => {
                    if attempt >= max_attempts {
                        warn!(%account_id, attempts = attempt, "commit retries exhausted");
                        return Err(EngineError::Conflict { attempts: attempt });
                    }
                    debug!(%account_id, attempt, "commit conflict, retrying");
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Moves `amount` from the authenticated sender to the recipient.
    pub async fn transfer(&self, input: TransferInput) -> Result<TransferReceipt, EngineError> {
        validation::validate_transfer(&input)?;
        let TransferInput {
            sender_id,
            recipient_id,
            amount,
            note,
        } = input;
        let symbol = self.config.currency_symbol.clone();

        let ((), committed_at) = self
            .run_atomic(&[sender_id, recipient_id], |snapshot| {
                let sender = snapshot
                    .account(sender_id)
                    .ok_or_else(|| EngineError::NotFound("sender account".to_string()))?;
                let recipient = snapshot
                    .account(recipient_id)
                    .ok_or_else(|| EngineError::NotFound("recipient account".to_string()))?;

                let sender_balance = debited(sender.balance, amount)?;
                let recipient_balance = recipient
                    .balance
                    .checked_add(amount)
                    .ok_or(EngineError::Overflow)?;

                let mut batch = WriteBatch::for_snapshot(snapshot);
                batch.set_balance(sender_id, sender_balance);
                batch.set_balance(recipient_id, recipient_balance);

                entries::debit(
                    &mut batch,
                    sender_id,
                    amount,
                    EntryCategory::Transfer,
                    format!("Transfer to {}", recipient.display_name),
                    note.clone(),
                    EntryRef::Account(recipient_id),
                );
                entries::credit(
                    &mut batch,
                    recipient_id,
                    amount,
                    EntryCategory::Transfer,
                    format!("Received from {}", sender.display_name),
                    note.clone(),
                    EntryRef::Account(sender_id),
                );

                notify::push(
                    &mut batch,
                    sender_id,
                    "Transfer sent",
                    format!("You sent {amount} {symbol} to {}.", recipient.display_name),
                    NotificationCategory::TransferOut,
                );
                notify::push(
                    &mut batch,
                    recipient_id,
                    "Money received",
                    format!("You received {amount} {symbol} from {}.", sender.display_name),
                    NotificationCategory::TransferIn,
                );

                Ok((batch, ()))
            })
            .await?;

        info!(%sender_id, %recipient_id, %amount, "transfer committed");
        Ok(TransferReceipt {
            sender_id,
            recipient_id,
            amount,
            committed_at,
        })
    }

    /// Pays `amount` from the authenticated payer to a merchant.
    pub async fn pay(&self, input: PaymentInput) -> Result<PaymentReceipt, EngineError> {
        validation::validate_payment(&input)?;
        let PaymentInput {
            payer_id,
            merchant_id,
            amount,
        } = input;
        let symbol = self.config.currency_symbol.clone();

        let ((), committed_at) = self
            .run_atomic(&[payer_id, merchant_id], |snapshot| {
                let payer = snapshot
                    .account(payer_id)
                    .ok_or_else(|| EngineError::NotFound("payer account".to_string()))?;
                let merchant = snapshot
                    .account(merchant_id)
                    .ok_or_else(|| EngineError::NotFound("merchant account".to_string()))?;

                let payer_balance = debited(payer.balance, amount)?;
                let merchant_balance = merchant
                    .balance
                    .checked_add(amount)
                    .ok_or(EngineError::Overflow)?;

                let mut batch = WriteBatch::for_snapshot(snapshot);
                batch.set_balance(payer_id, payer_balance);
                batch.set_balance(merchant_id, merchant_balance);

                entries::debit(
                    &mut batch,
                    payer_id,
                    amount,
                    EntryCategory::Payment,
                    format!("Payment to {}", merchant.display_name),
                    None,
                    EntryRef::Account(merchant_id),
                );
                entries::credit(
                    &mut batch,
                    merchant_id,
                    amount,
                    EntryCategory::Payment,
                    format!("Payment received from {}", payer.display_name),
                    None,
                    EntryRef::Account(payer_id),
                );

                notify::push(
                    &mut batch,
                    payer_id,
                    "Payment sent",
                    format!("You paid {amount} {symbol} to {}.", merchant.display_name),
                    NotificationCategory::PaymentOut,
                );
                notify::push(
                    &mut batch,
                    merchant_id,
                    "Payment received",
                    format!("You received {amount} {symbol} from {}.", payer.display_name),
                    NotificationCategory::PaymentIn,
                );

                Ok((batch, ()))
            })
            .await?;

        info!(%payer_id, %merchant_id, %amount, "payment committed");
        Ok(PaymentReceipt {
            payer_id,
            merchant_id,
            amount,
            committed_at,
        })
    }

    /// Creates a withdrawal request, debiting the amount plus fee at
    /// request time (funds-held policy: the payout itself happens later,
    /// on external rails).
    pub async fn request_withdrawal(
        &self,
        input: WithdrawalInput,
    ) -> Result<WithdrawalReceipt, EngineError> {
        validation::validate_withdrawal(&input)?;
        let WithdrawalInput {
            user_id,
            amount,
            beneficiary_name,
            iban,
        } = input;

        let fee = amount
            .checked_apply_rate(self.config.withdrawal_fee_rate)
            .ok_or(EngineError::Overflow)?;
        let total_debited = amount.checked_add(fee).ok_or(EngineError::Overflow)?;
        let symbol = self.config.currency_symbol.clone();

        let (request_id, committed_at) = self
            .run_atomic(&[user_id], |snapshot| {
                let user = snapshot
                    .account(user_id)
                    .ok_or_else(|| EngineError::NotFound("user account".to_string()))?;

                let new_balance = user.balance.checked_sub(total_debited).ok_or(EngineError::Overflow)?;
                if new_balance.is_negative() {
                    return Err(EngineError::InsufficientFunds(format!(
                        "balance {} does not cover the withdrawal and its fee ({total_debited} {symbol})",
                        user.balance,
                    )));
                }

                let mut batch = WriteBatch::for_snapshot(snapshot);
                batch.set_balance(user_id, new_balance);

                let request_id = WithdrawalRequestId::new();
                batch.push_withdrawal_request(StagedWithdrawalRequest {
                    id: request_id,
                    user_id,
                    user_name: user.display_name.clone(),
                    amount,
                    fee,
                    total_debited,
                    beneficiary_name: beneficiary_name.clone(),
                    iban: iban.clone(),
                });

                entries::withdrawal_hold(&mut batch, user_id, amount, request_id);

                notify::push(
                    &mut batch,
                    user_id,
                    "Withdrawal request submitted",
                    format!(
                        "Your request to withdraw {amount} {symbol} was received and is being processed."
                    ),
                    NotificationCategory::WithdrawalRequest,
                );

                Ok((batch, request_id))
            })
            .await?;

        info!(%user_id, %request_id, %amount, %fee, "withdrawal request committed");
        Ok(WithdrawalReceipt {
            request_id,
            amount,
            fee,
            total_debited,
            committed_at,
        })
    }

    /// Records a credit application, moving the flat application fee from
    /// the applicant to the treasury account. The fee is separate from and
    /// does not represent approval of the requested amount.
    pub async fn request_credit(
        &self,
        input: CreditRequestInput,
    ) -> Result<CreditRequestReceipt, EngineError> {
        validation::validate_credit_request(&input)?;
        let CreditRequestInput {
            user_id,
            amount,
            reason,
        } = input;

        let treasury_id = self
            .config
            .treasury_account_id
            .ok_or(EngineError::TreasuryMisconfigured)?;
        if treasury_id == user_id {
            return Err(EngineError::InvalidArgument(
                "the treasury account cannot apply for credit".to_string(),
            ));
        }
        let fee = self.config.credit_application_fee;
        let symbol = self.config.currency_symbol.clone();

        let (request_id, committed_at) = self
            .run_atomic(&[user_id, treasury_id], |snapshot| {
                let user = snapshot
                    .account(user_id)
                    .ok_or_else(|| EngineError::NotFound("user account".to_string()))?;
                // The treasury id is configuration; a missing record is an
                // operator fault, not a caller error.
                let treasury = snapshot
                    .account(treasury_id)
                    .ok_or(EngineError::TreasuryMisconfigured)?;

                let user_balance = user.balance.checked_sub(fee).ok_or(EngineError::Overflow)?;
                if user_balance.is_negative() {
                    return Err(EngineError::InsufficientFunds(format!(
                        "an application fee of {fee} {symbol} is required"
                    )));
                }
                let treasury_balance = treasury
                    .balance
                    .checked_add(fee)
                    .ok_or(EngineError::Overflow)?;

                let mut batch = WriteBatch::for_snapshot(snapshot);
                batch.set_balance(user_id, user_balance);
                batch.set_balance(treasury_id, treasury_balance);

                let request_id = CreditRequestId::new();
                batch.push_credit_request(StagedCreditRequest {
                    id: request_id,
                    user_id,
                    user_name: user.display_name.clone(),
                    requested_amount: amount,
                    reason: reason.clone(),
                });

                entries::debit(
                    &mut batch,
                    user_id,
                    fee,
                    EntryCategory::CreditFee,
                    "Credit application fee".to_string(),
                    None,
                    EntryRef::Account(treasury_id),
                );
                entries::credit(
                    &mut batch,
                    treasury_id,
                    fee,
                    EntryCategory::CreditFee,
                    format!("Credit application fee from {}", user.display_name),
                    None,
                    EntryRef::Account(user_id),
                );

                notify::push(
                    &mut batch,
                    user_id,
                    "Credit application received",
                    format!(
                        "Your credit application for {amount} {symbol} was submitted. \
                         A fee of {fee} {symbol} was charged."
                    ),
                    NotificationCategory::CreditRequest,
                );

                Ok((batch, request_id))
            })
            .await?;

        info!(%user_id, %request_id, %amount, %fee, "credit request committed");
        Ok(CreditRequestReceipt {
            request_id,
            requested_amount: amount,
            fee,
            committed_at,
        })
    }
}

/// Computes a balance after a debit, rejecting overdrafts.
fn debited(balance: Money, amount: Money) -> Result<Money, EngineError> {
    let remaining = balance.checked_sub(amount).ok_or(EngineError::Overflow)?;
    if remaining.is_negative() {
        return Err(EngineError::InsufficientFunds(format!(
            "balance {balance} does not cover {amount}"
        )));
    }
    Ok(remaining)
}
