//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units (cents)                              │
//! │    Every money column has exactly 2 decimal places, so a price of       │
//! │    25.50 is stored and computed as 2550. Multiplication by a quantity   │
//! │    and summation are exact.                                             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Boundary Conversion
//! JSON clients send and receive exact decimals (`"25.50"`). The API layer
//! converts with [`Money::from_decimal`] / [`Money::to_decimal`]; nothing
//! inside the system ever sees a `Decimal` or a float.
//!
//! ## Usage
//! ```rust
//! use storefront_core::money::Money;
//!
//! let price = Money::from_cents(2550); // 25.50
//! let line = price.checked_mul_quantity(3).unwrap();
//! assert_eq!(line.cents(), 7650);
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;
use crate::MAX_AMOUNT_CENTS;

/// Number of decimal places for every money value in the system.
pub const MONEY_SCALE: u32 = 2;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in minor units (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: 18 digits of cents fit comfortably
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Checked arithmetic**: totals never silently wrap
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// let price = Money::from_cents(150_000); // 1500.00
    /// assert_eq!(price.cents(), 150_000);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Adds two amounts, returning `None` past the persisted precision.
    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0
            .checked_add(other.0)
            .filter(|cents| cents.abs() <= MAX_AMOUNT_CENTS)
            .map(Money)
    }

    /// Multiplies a unit price by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(5000); // 50.00
    /// let line_total = unit_price.checked_mul_quantity(3).unwrap();
    /// assert_eq!(line_total.cents(), 15_000); // 150.00
    /// ```
    ///
    /// Returns `None` when the product would exceed 18 total digits.
    pub fn checked_mul_quantity(self, qty: i64) -> Option<Money> {
        self.0
            .checked_mul(qty)
            .filter(|cents| cents.abs() <= MAX_AMOUNT_CENTS)
            .map(Money)
    }

    /// Converts an exact decimal (as received over the wire) into money.
    ///
    /// ## Rules
    /// - At most 2 significant decimal places (`25.5` and `25.50` are fine,
    ///   `25.505` is rejected rather than rounded)
    /// - Must fit in 18 total digits
    ///
    /// ## Example
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use storefront_core::money::Money;
    ///
    /// let price = Money::from_decimal("price", Decimal::new(2550, 2)).unwrap();
    /// assert_eq!(price.cents(), 2550);
    ///
    /// assert!(Money::from_decimal("price", Decimal::new(25505, 3)).is_err());
    /// ```
    pub fn from_decimal(field: &str, value: Decimal) -> Result<Money, ValidationError> {
        if value.normalize().scale() > MONEY_SCALE {
            return Err(ValidationError::InvalidFormat {
                field: field.to_string(),
                reason: format!("must have at most {} decimal places", MONEY_SCALE),
            });
        }

        value
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|cents| cents.to_i64())
            .filter(|cents| cents.abs() <= MAX_AMOUNT_CENTS)
            .map(Money)
            .ok_or_else(|| ValidationError::InvalidFormat {
                field: field.to_string(),
                reason: "exceeds 18 total digits".to_string(),
            })
    }

    /// Converts to an exact decimal with scale 2 (`1500` -> `15.00`).
    #[inline]
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, MONEY_SCALE)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain decimal rendering (`1500.00`, `-5.50`). There is no currency symbol:
/// the system is single-currency.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(150_000).to_string(), "1500.00");
        assert_eq!(Money::from_cents(2550).to_string(), "25.50");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
    }

    #[test]
    fn test_checked_mul_quantity() {
        let price = Money::from_cents(10_000);
        assert_eq!(price.checked_mul_quantity(2), Some(Money::from_cents(20_000)));
        assert_eq!(Money::from_cents(MAX_AMOUNT_CENTS).checked_mul_quantity(2), None);
        assert_eq!(Money::from_cents(i64::MAX).checked_mul_quantity(2), None);
    }

    #[test]
    fn test_checked_add_respects_precision() {
        let almost_max = Money::from_cents(MAX_AMOUNT_CENTS - 1);
        assert!(almost_max.checked_add(Money::from_cents(1)).is_some());
        assert!(almost_max.checked_add(Money::from_cents(2)).is_none());
    }

    #[test]
    fn test_from_decimal() {
        assert_eq!(
            Money::from_decimal("price", Decimal::new(150_000, 2)).unwrap(),
            Money::from_cents(150_000)
        );
        // Trailing zeros beyond the scale are harmless
        assert_eq!(
            Money::from_decimal("price", Decimal::new(255_000, 4)).unwrap(),
            Money::from_cents(2550)
        );
        // Whole numbers
        assert_eq!(
            Money::from_decimal("price", Decimal::new(50, 0)).unwrap(),
            Money::from_cents(5000)
        );
        assert!(Money::from_decimal("price", Decimal::new(1, 3)).is_err());
        assert!(Money::from_decimal("price", Decimal::MAX).is_err());
    }

    #[test]
    fn test_to_decimal() {
        let money = Money::from_cents(2550);
        assert_eq!(money.to_decimal(), Decimal::new(2550, 2));
        assert_eq!(money.to_decimal().to_string(), "25.50");
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(Money::from_cents(1).is_positive());
        assert!(Money::from_cents(-1).is_negative());
        assert_eq!(Money::default(), zero);
    }
}
