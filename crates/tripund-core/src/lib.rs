//! # tripund-core: Pure Pricing Logic for the Tripund Storefront
//!
//! This crate owns every rupee the storefront shows: GST-inclusive price
//! breakdowns, cart totals, invoice tax rows and the public pricing
//! settings. All of it is pure computation with no I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Tripund Pricing Architecture                       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │        Product page ──► Cart ──► Checkout ──► Invoice          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ tripund-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌─────────────┐ ┌───────────┐  │   │
//! │  │   │   money   │  │    gst    │  │ jurisdiction│ │  invoice  │  │   │
//! │  │   │   Money   │  │ breakdown │  │  36 states  │ │ tax rows  │  │   │
//! │  │   │  TaxRate  │  │   quote   │  │  + UTs      │ │  summary  │  │   │
//! │  │   └───────────┘  └───────────┘  └─────────────┘ └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐                                  │   │
//! │  │   │ settings  │  │ validation│                                  │   │
//! │  │   │  cache    │  │   rules   │                                  │   │
//! │  │   └───────────┘  └───────────┘                                  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO WALL CLOCK • PURE FUNCTIONS          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │           gst-quote (CLI): config file, logging, output         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money in paise with integer arithmetic
//! - [`types`] - Tax rates, line items, product prices
//! - [`gst`] - Inclusive GST breakdowns and cart quotes
//! - [`jurisdiction`] - States and union territories
//! - [`invoice`] - Per-line invoice tax rows and totals
//! - [`settings`] - Public pricing settings and their cache
//! - [`validation`] - Input rules
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Integer Money**: all amounts are paise (i64); rates are basis points
//! 2. **One Rounding Point**: only the base price is rounded, everything else
//!    is derived by subtraction
//! 3. **Explicit Errors**: overflow and bad input are typed errors, never panics
//!
//! ## Example Usage
//!
//! ```rust
//! use tripund_core::gst::compute_breakdown;
//! use tripund_core::money::Money;
//! use tripund_core::types::TaxRate;
//!
//! // ₹118.00 sold from Karnataka to Karnataka
//! let b = compute_breakdown(Money::from_paise(11800), "KA", "KA", TaxRate::GST_STANDARD).unwrap();
//!
//! assert_eq!(b.base_price.paise(), 10000);
//! assert_eq!(b.cgst.paise(), 900);
//! assert_eq!(b.sgst.paise(), 900);
//! assert!(!b.is_interstate);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod gst;
pub mod invoice;
pub mod jurisdiction;
pub mod money;
pub mod settings;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use gst::{
    compute_breakdown, compute_cart_breakdown, quote, quote_cart, BuyerJurisdiction, GstQuote,
    PriceBreakdown, TaxBreakdown,
};
pub use invoice::{build_tax_rows, InvoiceLine, InvoiceTaxRow, TaxSummary};
pub use jurisdiction::{Jurisdiction, HOME_JURISDICTION};
pub use money::Money;
pub use settings::{PublicSettings, SettingsCache, SettingsService, SettingsSource, ShippingSpeed};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct lines in a single cart or invoice.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line.
///
/// Also keeps `price × quantity` far from overflow for any realistic price.
pub const MAX_ITEM_QUANTITY: i64 = 999;
