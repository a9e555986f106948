//! # Validation Module
//!
//! Input validation for the pricing path.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend (TypeScript)                                        │
//! │  ├── Quantity steppers, state dropdown                                 │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Type construction (Rust)                                     │
//! │  ├── Money is integral, TaxRate is unsigned                            │
//! │  └── TaxRate::from_percentage rejects NaN / negatives                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: THIS MODULE                                                  │
//! │  ├── Amount must not be negative                                       │
//! │  └── Line items: price >= 0, 1 <= quantity <= MAX_ITEM_QUANTITY         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tripund_core::money::Money;
//! use tripund_core::validation::{validate_amount, validate_quantity};
//!
//! assert!(validate_amount(Money::from_paise(11800)).is_ok());
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::LineItem;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a GST-inclusive amount.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items, empty carts)
pub fn validate_amount(amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::Negative {
            field: "amount".to_string(),
        });
    }

    Ok(())
}

/// Validates a unit price.
///
/// ## Example
/// ```rust
/// use tripund_core::money::Money;
/// use tripund_core::validation::validate_price;
///
/// assert!(validate_price(Money::from_paise(59900)).is_ok());
/// assert!(validate_price(Money::zero()).is_ok());    // Free item
/// assert!(validate_price(Money::from_paise(-1)).is_err());
/// ```
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

// =============================================================================
// Composite Validators
// =============================================================================

/// Validates one line item: price and quantity.
pub fn validate_line_item(item: &LineItem) -> ValidationResult<()> {
    validate_price(item.price)?;
    validate_quantity(item.quantity)
}

/// Validates cart size (number of distinct lines).
///
/// ## Rules
/// - Must not exceed MAX_CART_ITEMS
pub fn validate_cart_size(lines: usize) -> ValidationResult<()> {
    if lines > MAX_CART_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "cart items".to_string(),
            min: 0,
            max: MAX_CART_ITEMS as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
