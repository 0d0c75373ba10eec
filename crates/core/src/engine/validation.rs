//! Request validators: pure functions run before any store access.
//!
//! Any rejection short-circuits the operation: the engine never opens a
//! snapshot, so no read or write occurs and no retry applies.

use kivela_shared::types::{AccountId, Money};

use super::error::EngineError;
use super::input::{CreditRequestInput, PaymentInput, TransferInput, WithdrawalInput};

/// Fixed country + check code prefix of an accepted bank identifier.
const IBAN_PREFIX: &str = "AO06";
/// Digits following the prefix.
const IBAN_DIGITS: usize = 21;

fn require_account(id: AccountId, what: &str) -> Result<(), EngineError> {
    if id.is_nil() {
        return Err(EngineError::InvalidArgument(format!("{what} id is empty")));
    }
    Ok(())
}

fn require_positive(amount: Money, what: &str) -> Result<(), EngineError> {
    if !amount.is_positive() {
        return Err(EngineError::InvalidArgument(format!(
            "{what} must be positive"
        )));
    }
    Ok(())
}

fn require_text(value: &str, what: &str) -> Result<(), EngineError> {
    if value.trim().is_empty() {
        return Err(EngineError::InvalidArgument(format!("{what} is required")));
    }
    Ok(())
}

/// Returns true if the identifier matches the accepted fixed format:
/// the `AO06` prefix followed by exactly 21 ASCII digits.
#[must_use]
pub fn is_valid_iban(iban: &str) -> bool {
    iban.strip_prefix(IBAN_PREFIX)
        .is_some_and(|rest| rest.len() == IBAN_DIGITS && rest.bytes().all(|b| b.is_ascii_digit()))
}

/// Validates a transfer request.
pub fn validate_transfer(input: &TransferInput) -> Result<(), EngineError> {
    require_account(input.sender_id, "sender")?;
    require_account(input.recipient_id, "recipient")?;
    require_positive(input.amount, "transfer amount")?;
    if input.sender_id == input.recipient_id {
        return Err(EngineError::InvalidArgument(
            "cannot send money to yourself".to_string(),
        ));
    }
    Ok(())
}

/// Validates a payment request.
pub fn validate_payment(input: &PaymentInput) -> Result<(), EngineError> {
    require_account(input.payer_id, "payer")?;
    require_account(input.merchant_id, "merchant")?;
    require_positive(input.amount, "payment amount")?;
    if input.payer_id == input.merchant_id {
        return Err(EngineError::InvalidArgument(
            "cannot pay yourself".to_string(),
        ));
    }
    Ok(())
}

/// Validates a withdrawal request.
pub fn validate_withdrawal(input: &WithdrawalInput) -> Result<(), EngineError> {
    require_account(input.user_id, "user")?;
    require_positive(input.amount, "withdrawal amount")?;
    require_text(&input.beneficiary_name, "beneficiary name")?;
    if !is_valid_iban(&input.iban) {
        return Err(EngineError::InvalidArgument(format!(
            "IBAN must be {IBAN_PREFIX} followed by {IBAN_DIGITS} digits"
        )));
    }
    Ok(())
}

/// Validates a credit application.
pub fn validate_credit_request(input: &CreditRequestInput) -> Result<(), EngineError> {
    require_account(input.user_id, "user")?;
    require_positive(input.amount, "credit amount")?;
    require_text(&input.reason, "reason")?;
    Ok(())
}
