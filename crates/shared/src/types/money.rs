//! Money type with fixed-point precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! This type wraps `rust_decimal::Decimal` and keeps every amount at two
//! decimal places (minor currency units).

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Decimal places carried by all monetary amounts.
const DECIMAL_PLACES: u32 = 2;

/// A monetary amount with two decimal places of precision.
///
/// Derived amounts (fees) are rounded with banker's rounding
/// (round half to even) to minimize cumulative errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates a money value from a decimal, normalized to two decimal places.
    #[must_use]
    pub fn new(amount: Decimal) -> Self {
        Self(amount.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointNearestEven))
    }

    /// Creates a money value from minor units (e.g., `150` -> `1.50`).
    #[must_use]
    pub fn from_minor_units(units: i64) -> Self {
        Self(Decimal::new(units, DECIMAL_PLACES))
    }

    /// Returns the inner decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is strictly negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Returns true if the amount is strictly positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// Checked addition. Returns `None` on overflow.
    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Checked subtraction. Returns `None` on overflow.
    #[must_use]
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// Applies a rate (e.g., a fee percentage) to this amount.
    ///
    /// The result is rounded to two decimal places using banker's rounding.
    /// Returns `None` on overflow.
    #[must_use]
    pub fn checked_apply_rate(self, rate: Decimal) -> Option<Self> {
        self.0.checked_mul(rate).map(|raw| {
            Self(raw.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointNearestEven))
        })
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl std::str::FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s.parse::<Decimal>()?))
    }
}
