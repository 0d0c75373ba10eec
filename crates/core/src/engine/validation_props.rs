//! Property-based tests for the request validators.

use proptest::prelude::*;
use rust_decimal::Decimal;

use kivela_shared::types::{AccountId, Money};

use super::error::EngineError;
use super::input::TransferInput;
use super::validation::{is_valid_iban, validate_transfer};

/// Strategy for a positive amount between 0.01 and 1,000,000.00.
fn positive_amount() -> impl Strategy<Value = Money> {
    (1i64..100_000_000i64).prop_map(Money::from_minor_units)
}

/// Strategy for a zero or negative amount.
fn non_positive_amount() -> impl Strategy<Value = Money> {
    (0i64..100_000_000i64).prop_map(|cents| Money::from_minor_units(-cents))
}

/// Strategy for the 21-digit payload of a well-formed IBAN.
fn iban_digits() -> impl Strategy<Value = String> {
    proptest::collection::vec(0u8..10u8, 21).prop_map(|digits| {
        digits
            .into_iter()
            .map(|d| char::from(b'0' + d))
            .collect::<String>()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Any transfer with distinct accounts and a positive amount passes.
    #[test]
    fn prop_positive_transfer_accepted(amount in positive_amount()) {
        let input = TransferInput {
            sender_id: AccountId::new(),
            recipient_id: AccountId::new(),
            amount,
            note: None,
        };
        prop_assert!(validate_transfer(&input).is_ok());
    }

    /// Any transfer with a non-positive amount is rejected.
    #[test]
    fn prop_non_positive_transfer_rejected(amount in non_positive_amount()) {
        let input = TransferInput {
            sender_id: AccountId::new(),
            recipient_id: AccountId::new(),
            amount,
            note: None,
        };
        prop_assert!(matches!(
            validate_transfer(&input),
            Err(EngineError::InvalidArgument(_))
        ));
    }

    /// Self-transfers are rejected for any id and any amount.
    #[test]
    fn prop_self_transfer_always_rejected(
        amount in prop_oneof![positive_amount(), non_positive_amount()],
    ) {
        let id = AccountId::new();
        let input = TransferInput {
            sender_id: id,
            recipient_id: id,
            amount,
            note: None,
        };
        prop_assert!(validate_transfer(&input).is_err());
    }

    /// The prefix plus any 21 digits is accepted.
    #[test]
    fn prop_well_formed_iban_accepted(digits in iban_digits()) {
        let iban = format!("AO06{digits}");
        prop_assert!(is_valid_iban(&iban));
    }

    /// Changing the length by one in either direction is rejected.
    #[test]
    fn prop_iban_length_off_by_one_rejected(digits in iban_digits()) {
        let short = &digits[..20];
        let iban_short = format!("AO06{short}");
        let iban_long = format!("AO06{digits}0");
        prop_assert!(!is_valid_iban(&iban_short));
        prop_assert!(!is_valid_iban(&iban_long));
    }

    /// Arbitrary strings practically never pass the gate.
    #[test]
    fn prop_random_strings_rejected(s in "[ -~]{0,30}") {
        let well_formed = s.len() == 25
            && s.starts_with("AO06")
            && s.as_bytes()[4..].iter().all(u8::is_ascii_digit);
        prop_assert_eq!(is_valid_iban(&s), well_formed);
    }

    /// Fee application never produces a result with more than 2 decimals
    /// and never flips the sign for non-negative rates.
    #[test]
    fn prop_fee_is_scaled_and_non_negative(
        amount in positive_amount(),
        rate_bps in 0i64..10_000i64,
    ) {
        let rate = Decimal::new(rate_bps, 4);
        let fee = amount.checked_apply_rate(rate).unwrap();
        prop_assert!(!fee.is_negative());
        prop_assert!(fee.amount().scale() <= 2);
    }
}
