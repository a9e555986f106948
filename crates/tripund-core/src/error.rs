//! # Error Types
//!
//! Domain-specific error types for tripund-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tripund-core errors (this file)                                       │
//! │  ├── CoreError        - Pricing rule failures                          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  gst-quote errors (app)                                                │
//! │  └── QuoteError       - Config / argument failures                     │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → QuoteError → "unable to calculate"│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field, value, variant id)
//! 3. Errors are enum variants, never String
//! 4. A missing buyer state is NOT an error, see [`crate::gst::BuyerJurisdiction`]

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Pricing errors.
///
/// The calculator is total for well-formed input, so every variant here
/// means the caller handed us something malformed. Presentation layers map
/// all of them to a generic "unable to calculate tax" message.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// An intermediate sum or product left the `i64` range.
    ///
    /// ## When This Occurs
    /// - `price × quantity` on an absurd line item
    /// - Summing a cart whose total exceeds ~92 quadrillion paise
    #[error("Amount overflow while computing {context}")]
    AmountOverflow { context: String },

    /// A variant-priced product had no variants to choose from.
    #[error("Product has no priced variants")]
    NoVariants,

    /// The selected variant id does not belong to the product.
    #[error("Variant not found: {0}")]
    UnknownVariant(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when caller input doesn't meet requirements.
/// Used for early validation before any arithmetic runs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value is NaN or infinite.
    #[error("{field} must be a finite number")]
    NotFinite { field: String },

    /// Invalid format (e.g., "12.345" as a rupee amount).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
