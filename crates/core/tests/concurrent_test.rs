//! Concurrent contention tests for ledger operations.
//!
//! These tests verify that:
//! - Overlapping operations on one account never over-spend it
//! - Losers observe a business-rule failure or exhausted retries, never a
//!   partial write
//! - Final balances equal exactly what the committed operations moved

use std::sync::Arc;

use futures::future::join_all;
use rust_decimal_macros::dec;
use tokio::sync::Barrier;

use kivela_core::{EngineError, LedgerEngine, TransferInput, WithdrawalInput};
use kivela_shared::LedgerConfig;
use kivela_shared::types::{AccountId, Money};
use kivela_store::{AccountRecord, MemoryStore};

fn add_account(store: &MemoryStore, name: &str, balance: Money) -> AccountId {
    let record = AccountRecord::new(AccountId::new(), name, balance);
    let id = record.id;
    store.insert_account(record).unwrap();
    id
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_contending_transfers_commit_exactly_one() {
    let store = Arc::new(MemoryStore::new());
    let sender = add_account(&store, "Sender", Money::new(dec!(100)));
    let recipient = add_account(&store, "Recipient", Money::ZERO);
    let engine = Arc::new(LedgerEngine::new(store.clone(), LedgerConfig::default()));

    // Combined 130 exceeds the balance of 100: both cannot commit.
    let amounts = [Money::new(dec!(70)), Money::new(dec!(60))];
    let barrier = Arc::new(Barrier::new(amounts.len()));

    let tasks: Vec<_> = amounts
        .into_iter()
        .map(|amount| {
            let engine = Arc::clone(&engine);
            let barrier = Arc::clone(&barrier);
            tokio::spawn(async move {
                barrier.wait().await;
                engine
                    .transfer(TransferInput {
                        sender_id: sender,
                        recipient_id: recipient,
                        amount,
                        note: None,
                    })
                    .await
                    .map(|receipt| receipt.amount)
            })
        })
        .collect();

    let outcomes: Vec<_> = join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    let committed: Vec<Money> = outcomes.iter().filter_map(|o| o.as_ref().ok().copied()).collect();
    assert_eq!(committed.len(), 1, "exactly one transfer must commit");
    let committed_amount = committed[0];

    // The loser saw a clean business failure or exhausted retries.
    let loser = outcomes
        .iter()
        .find_map(|o| o.as_ref().err())
        .expect("one transfer must lose");
    assert!(matches!(
        loser,
        EngineError::InsufficientFunds(_) | EngineError::Conflict { .. }
    ));

    // Final balances reflect exactly the one committed amount.
    let sender_balance = store.get_account(sender).unwrap().balance;
    let recipient_balance = store.get_account(recipient).unwrap().balance;
    assert_eq!(
        sender_balance,
        Money::new(dec!(100)).checked_sub(committed_amount).unwrap()
    );
    assert_eq!(recipient_balance, committed_amount);

    // One entry and one notification per side, for the winner only.
    assert_eq!(store.ledger_entries(sender).len(), 1);
    assert_eq!(store.ledger_entries(recipient).len(), 1);
    assert_eq!(store.notifications(sender).len(), 1);
    assert_eq!(store.notifications(recipient).len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_no_balance_drift_under_heavy_contention() {
    let store = Arc::new(MemoryStore::new());
    let sender = add_account(&store, "Sender", Money::new(dec!(150)));
    let recipient = add_account(&store, "Recipient", Money::ZERO);
    // A generous retry budget keeps most of the herd from giving up.
    let config = LedgerConfig {
        max_commit_retries: 50,
        ..LedgerConfig::default()
    };
    let engine = Arc::new(LedgerEngine::new(store.clone(), config));

    let writers = 20;
    let amount = Money::new(dec!(10));
    let barrier = Arc::new(Barrier::new(writers));

    let tasks: Vec<_> = (0..writers)
        .map(|_| {
            let engine = Arc::clone(&engine);
            let barrier = Arc::clone(&barrier);
            tokio::spawn(async move {
                barrier.wait().await;
                engine
                    .transfer(TransferInput {
                        sender_id: sender,
                        recipient_id: recipient,
                        amount,
                        note: None,
                    })
                    .await
            })
        })
        .collect();

    let outcomes: Vec<_> = join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    let successes = u32::try_from(outcomes.iter().filter(|o| o.is_ok()).count()).unwrap();
    assert!(successes >= 1, "at least the first commit must succeed");

    // Every failure was a clean rejection.
    for outcome in &outcomes {
        if let Err(err) = outcome {
            assert!(matches!(
                err,
                EngineError::InsufficientFunds(_) | EngineError::Conflict { .. }
            ));
        }
    }

    // No drift: moved = 10 * successes, conserved across both accounts.
    let moved = Money::from_minor_units(i64::from(successes) * 1000);
    let sender_balance = store.get_account(sender).unwrap().balance;
    let recipient_balance = store.get_account(recipient).unwrap().balance;
    assert_eq!(sender_balance, Money::new(dec!(150)).checked_sub(moved).unwrap());
    assert_eq!(recipient_balance, moved);
    assert!(!sender_balance.is_negative());

    // Audit trail matches the committed operations exactly.
    assert_eq!(store.ledger_entries(sender).len(), successes as usize);
    assert_eq!(store.ledger_entries(recipient).len(), successes as usize);
    assert_eq!(store.notifications(sender).len(), successes as usize);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_mixed_withdrawal_and_transfer_contention() {
    let store = Arc::new(MemoryStore::new());
    let user = add_account(&store, "User", Money::new(dec!(1000)));
    let friend = add_account(&store, "Friend", Money::ZERO);
    let engine = Arc::new(LedgerEngine::new(store.clone(), LedgerConfig::default()));

    let barrier = Arc::new(Barrier::new(2));

    // Withdrawal of 500 debits 550 with the 10% fee; together with the
    // 600 transfer it exceeds the balance, so only one can commit.
    let withdrawal = {
        let engine = Arc::clone(&engine);
        let barrier = Arc::clone(&barrier);
        tokio::spawn(async move {
            barrier.wait().await;
            engine
                .request_withdrawal(WithdrawalInput {
                    user_id: user,
                    amount: Money::new(dec!(500)),
                    beneficiary_name: "User Himself".to_string(),
                    iban: "AO06123456789012345678901".to_string(),
                })
                .await
                .map(|_| ())
        })
    };
    let transfer = {
        let engine = Arc::clone(&engine);
        let barrier = Arc::clone(&barrier);
        tokio::spawn(async move {
            barrier.wait().await;
            engine
                .transfer(TransferInput {
                    sender_id: user,
                    recipient_id: friend,
                    amount: Money::new(dec!(600)),
                    note: None,
                })
                .await
                .map(|_| ())
        })
    };

    let withdrawal_outcome = withdrawal.await.unwrap();
    let transfer_outcome = transfer.await.unwrap();

    assert_ne!(
        withdrawal_outcome.is_ok(),
        transfer_outcome.is_ok(),
        "exactly one of the contending operations must commit"
    );

    let balance = store.get_account(user).unwrap().balance;
    if withdrawal_outcome.is_ok() {
        assert_eq!(balance, Money::new(dec!(450)));
        assert_eq!(store.withdrawal_requests().len(), 1);
        assert!(store.ledger_entries(friend).is_empty());
    } else {
        assert_eq!(balance, Money::new(dec!(400)));
        assert!(store.withdrawal_requests().is_empty());
        assert_eq!(store.get_account(friend).unwrap().balance, Money::new(dec!(600)));
    }
}
