//! # Money Module
//!
//! Provides the `Money` type for handling rupee amounts safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Reverse GST in floating point:                                        │
//! │    118.00 / 1.18 = 99.99999999999999  ❌ WRONG!                         │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Paise                                            │
//! │    11800 paise × 10000 / 11800 = 10000 paise exactly                   │
//! │    Rounding happens once, in one documented place                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tripund_core::money::Money;
//!
//! // Create from paise (preferred)
//! let price = Money::from_paise(11800); // ₹118.00
//!
//! // Arithmetic operations
//! let doubled = price * 2;                    // ₹236.00
//! let total = price + Money::from_paise(500); // ₹123.00
//! assert_eq!(total.paise(), 12300);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::TaxRate;

/// Basis points in 100%.
const BPS_SCALE: i128 = 10_000;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in paise (1/100 rupee).
///
/// ## Design Decisions
/// - **i64 (signed)**: Refund rows and rounding adjustments can be negative
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support; serialized as a bare integer
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  ProductPrice ──► LineItem.price ──► cart total (GST inclusive)        │
/// │                                           │                            │
/// │                                           ▼                            │
/// │                            compute_breakdown() ──► TaxBreakdown        │
/// │                                           │                            │
/// │                                           ▼                            │
/// │                            InvoiceTaxRow / TaxSummary                  │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paise (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use tripund_core::money::Money;
    ///
    /// let price = Money::from_paise(1099); // Represents ₹10.99
    /// assert_eq!(price.paise(), 1099);
    /// ```
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    /// Creates a Money value from whole rupees.
    #[inline]
    pub const fn from_rupees(rupees: i64) -> Self {
        Money(rupees * 100)
    }

    /// Parses a rupee amount as typed by an operator: `"118"`, `"118.5"`,
    /// `"118.50"`. At most two decimal places.
    ///
    /// ## Example
    /// ```rust
    /// use tripund_core::money::Money;
    ///
    /// assert_eq!(Money::parse_rupees("118.50").unwrap().paise(), 11850);
    /// assert_eq!(Money::parse_rupees("59").unwrap().paise(), 5900);
    /// assert!(Money::parse_rupees("1.234").is_err());
    /// ```
    pub fn parse_rupees(input: &str) -> Result<Money, ValidationError> {
        let trimmed = input.trim().trim_start_matches('₹');
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: reason.to_string(),
        };

        if trimmed.is_empty() {
            return Err(ValidationError::Required {
                field: "amount".to_string(),
            });
        }

        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        let (whole, fraction) = match digits.split_once('.') {
            Some((w, f)) => (w, f),
            None => (digits, ""),
        };

        if fraction.len() > 2 {
            return Err(invalid("at most two decimal places"));
        }
        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid("no digits"));
        }
        if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
            return Err(invalid("expected digits and an optional decimal point"));
        }

        let rupees: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid("rupee part too large"))?
        };
        let paise: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| invalid("bad paise"))? * 10,
            _ => fraction.parse().map_err(|_| invalid("bad paise"))?,
        };

        let total = rupees
            .checked_mul(100)
            .and_then(|r| r.checked_add(paise))
            .ok_or_else(|| invalid("amount too large"))?;

        Ok(Money(if negative { -total } else { total }))
    }

    /// Returns the value in paise (smallest currency unit).
    #[inline]
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Returns the whole rupee portion.
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the paise portion (always 0-99).
    #[inline]
    pub const fn paise_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Checked addition. `None` on overflow.
    #[inline]
    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Checked multiplication by a quantity. `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use tripund_core::money::Money;
    ///
    /// let unit_price = Money::from_paise(50_000); // ₹500.00
    /// let line_total = unit_price.checked_mul_quantity(2).unwrap();
    /// assert_eq!(line_total.paise(), 100_000);
    /// ```
    #[inline]
    pub fn checked_mul_quantity(self, qty: i64) -> Option<Money> {
        self.0.checked_mul(qty).map(Money)
    }

    /// Calculates tax on a tax-EXCLUSIVE amount, rounding half up.
    ///
    /// ## Example
    /// ```rust
    /// use tripund_core::money::Money;
    /// use tripund_core::types::TaxRate;
    ///
    /// let price = Money::from_paise(1000); // ₹10.00
    /// let rate = TaxRate::from_bps(1800);  // 18%
    /// assert_eq!(price.calculate_tax(rate).paise(), 180);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        self.percentage_of_bps(rate.bps())
    }

    /// Returns `bps / 10000` of this amount, rounding half up.
    ///
    /// Used for prepaid discounts and exclusive tax. Intended for
    /// non-negative amounts.
    pub fn percentage_of_bps(&self, bps: u32) -> Money {
        // Use i128 to prevent overflow on large amounts
        let scaled = (self.0 as i128 * bps as i128 + BPS_SCALE / 2) / BPS_SCALE;
        Money(scaled as i64)
    }

    /// Removes tax from a tax-INCLUSIVE amount.
    ///
    /// `round_half_up(amount × 100 / (100 + rate%))`, done entirely in
    /// integers on basis points:
    ///
    /// ```text
    ///   base = (2 · amount · 10000 + d) / (2 · d)      d = 10000 + bps
    /// ```
    ///
    /// This is the ONLY place in the crate where a rounding policy is
    /// applied to GST. Callers derive tax as `amount - base`, never the
    /// other way around.
    ///
    /// ## Example
    /// ```rust
    /// use tripund_core::money::Money;
    /// use tripund_core::types::TaxRate;
    ///
    /// let rate = TaxRate::from_bps(1800);
    /// assert_eq!(Money::from_paise(11800).tax_exclusive_base(rate).paise(), 10000);
    /// // 1300 / 1.18 = 1101.69 → 1102
    /// assert_eq!(Money::from_paise(1300).tax_exclusive_base(rate).paise(), 1102);
    /// ```
    pub fn tax_exclusive_base(&self, rate: TaxRate) -> Money {
        let d = BPS_SCALE + rate.bps() as i128;
        let base = (2 * self.0 as i128 * BPS_SCALE + d) / (2 * d);
        // base <= amount whenever rate >= 0, so the cast cannot truncate
        Money(base as i64)
    }

    /// Rounds to the nearest whole rupee, halves rounding up. `None` on
    /// overflow.
    ///
    /// ## Example
    /// ```rust
    /// use tripund_core::money::Money;
    ///
    /// assert_eq!(Money::from_paise(11849).round_to_rupee(), Some(Money::from_paise(11800)));
    /// assert_eq!(Money::from_paise(11850).round_to_rupee(), Some(Money::from_paise(11900)));
    /// assert_eq!(Money::from_paise(i64::MAX).round_to_rupee(), None);
    /// ```
    pub fn round_to_rupee(&self) -> Option<Money> {
        self.0
            .checked_add(50)
            .map(|p| Money(p.div_euclid(100) * 100))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows money as plain rupees: `₹1234.50`.
///
/// ## Note
/// Indian digit grouping (`₹1,234.50`) is left to the frontend.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}₹{}.{:02}", sign, self.rupees().abs(), self.paise_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_paise() {
        let money = Money::from_paise(1099);
        assert_eq!(money.paise(), 1099);
        assert_eq!(money.rupees(), 10);
        assert_eq!(money.paise_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_paise(1099).to_string(), "₹10.99");
        assert_eq!(Money::from_paise(500).to_string(), "₹5.00");
        assert_eq!(Money::from_paise(-550).to_string(), "-₹5.50");
        assert_eq!(Money::zero().to_string(), "₹0.00");
    }

    #[test]
    fn test_parse_rupees() {
        assert_eq!(Money::parse_rupees("118").unwrap(), Money::from_paise(11800));
        assert_eq!(Money::parse_rupees("118.5").unwrap(), Money::from_paise(11850));
        assert_eq!(Money::parse_rupees(" ₹0.05 ").unwrap(), Money::from_paise(5));
        assert_eq!(Money::parse_rupees(".5").unwrap(), Money::from_paise(50));
        assert_eq!(Money::parse_rupees("-1").unwrap(), Money::from_paise(-100));

        assert!(matches!(
            Money::parse_rupees(""),
            Err(ValidationError::Required { .. })
        ));
        assert!(Money::parse_rupees("12.345").is_err());
        assert!(Money::parse_rupees("12a").is_err());
        assert!(Money::parse_rupees(".").is_err());
        assert!(Money::parse_rupees("99999999999999999999").is_err());
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_paise(1000);
        let b = Money::from_paise(500);

        assert_eq!((a + b).paise(), 1500);
        assert_eq!((a - b).paise(), 500);
        assert_eq!((a * 3).paise(), 3000);

        let total: Money = vec![a, b, b].into_iter().sum();
        assert_eq!(total.paise(), 2000);
    }

    #[test]
    fn test_checked_operations() {
        assert_eq!(
            Money::from_paise(300).checked_mul_quantity(3),
            Some(Money::from_paise(900))
        );
        assert_eq!(Money::from_paise(i64::MAX).checked_mul_quantity(2), None);
        assert_eq!(Money::from_paise(i64::MAX).checked_add(Money::from_paise(1)), None);
    }

    #[test]
    fn test_tax_exclusive_base_rounds_half_up() {
        let rate = TaxRate::from_bps(1800);
        // 59 / 1.18 = 50 exactly
        assert_eq!(Money::from_paise(59).tax_exclusive_base(rate).paise(), 50);
        // 1 / 1.18 = 0.847 → 1
        assert_eq!(Money::from_paise(1).tax_exclusive_base(rate).paise(), 1);
        // 5% on 21: 21 / 1.05 = 20 exactly; 1.05 → 1.0
        let five = TaxRate::from_bps(500);
        assert_eq!(Money::from_paise(21).tax_exclusive_base(five).paise(), 20);
        // Exact half: 10 / 1.25 = 8; 3 / 1.2 = 2.5 → 3
        assert_eq!(
            Money::from_paise(3).tax_exclusive_base(TaxRate::from_bps(2000)).paise(),
            3
        );
    }

    #[test]
    fn test_tax_exclusive_base_zero_rate_is_identity() {
        let amount = Money::from_paise(12345);
        assert_eq!(amount.tax_exclusive_base(TaxRate::zero()), amount);
    }

    #[test]
    fn test_percentage_of_bps() {
        let amount = Money::from_paise(10000); // ₹100.00
        assert_eq!(amount.percentage_of_bps(500).paise(), 500); // 5%
        // ₹10.10 at 5% = 50.5 paise → 51
        assert_eq!(Money::from_paise(1010).percentage_of_bps(500).paise(), 51);
    }

    #[test]
    fn test_round_to_rupee() {
        let rounded = |p: i64| Money::from_paise(p).round_to_rupee().map(|m| m.paise());
        assert_eq!(rounded(0), Some(0));
        assert_eq!(rounded(49), Some(0));
        assert_eq!(rounded(50), Some(100));
        assert_eq!(rounded(11800), Some(11800));
        assert_eq!(rounded(i64::MAX - 49), None);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_negative());

        let negative = Money::from_paise(-100);
        assert!(negative.is_negative());
    }
}
