//! Core ledger transaction engine for Kivela.
//!
//! Every money-moving operation (peer-to-peer transfer, point-of-sale
//! payment, withdrawal request, credit-application fee) runs as one atomic
//! unit: read the involved accounts, check the business invariants, and
//! commit balance updates together with their ledger entries and
//! notifications, retrying on commit conflicts.

pub mod engine;

pub use engine::error::EngineError;
pub use engine::input::{
    CreditRequestInput, CreditRequestReceipt, PaymentInput, PaymentReceipt, TransferInput,
    TransferReceipt, WithdrawalInput, WithdrawalReceipt,
};
pub use engine::LedgerEngine;
