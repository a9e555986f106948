//! # GST Breakdown Calculator
//!
//! Converts a GST-inclusive amount into its taxable base and tax components.
//!
//! ## The Reverse Calculation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Buyer pays ₹118.00 (inclusive), rate 18%                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  base  = round(118.00 × 100 / 118)  = ₹100.00   ← only rounding step   │
//! │  tax   = 118.00 − base              = ₹18.00    ← never computed apart │
//! │       │                                                                 │
//! │       ├── buyer state == seller state (intrastate)                      │
//! │       │      CGST = ⌊tax / 2⌋ = ₹9.00                                   │
//! │       │      SGST = tax − CGST = ₹9.00  (odd paisa lands here)          │
//! │       │                                                                 │
//! │       └── buyer state != seller state (interstate)                      │
//! │              IGST = tax = ₹18.00                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - `base_price + total_tax == total_inclusive`, exactly
//! - intrastate: `cgst + sgst == total_tax` and `sgst - cgst ∈ {0, 1}`
//! - interstate: `igst == total_tax`, `cgst == sgst == 0`
//!
//! ## Example
//! ```rust
//! use tripund_core::gst::compute_breakdown;
//! use tripund_core::money::Money;
//! use tripund_core::types::TaxRate;
//!
//! let b = compute_breakdown(Money::from_paise(11800), "KA", "KA", TaxRate::GST_STANDARD).unwrap();
//! assert_eq!(b.base_price.paise(), 10000);
//! assert_eq!((b.cgst.paise(), b.sgst.paise(), b.igst.paise()), (900, 900, 0));
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{LineItem, TaxRate};
use crate::validation::{validate_amount, validate_cart_size, validate_line_item};

// =============================================================================
// Breakdown Types
// =============================================================================

/// Result of splitting a GST-inclusive amount.
///
/// Freshly constructed on every call; never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxBreakdown {
    /// The amount the buyer is charged, GST included.
    pub total_inclusive: Money,
    /// Taxable value, derived from `total_inclusive`.
    pub base_price: Money,
    pub cgst: Money,
    pub sgst: Money,
    pub igst: Money,
    /// Always `total_inclusive - base_price`.
    pub total_tax: Money,
    pub tax_rate: TaxRate,
    pub is_interstate: bool,
}

impl TaxBreakdown {
    /// `"IGST"` or `"CGST + SGST"`, for the summary line.
    pub fn label(&self) -> &'static str {
        gst_label(self.is_interstate)
    }
}

/// A breakdown with no jurisdiction split: base and a single GST figure.
///
/// Shown on product pages and in the cart before the buyer has picked a
/// shipping state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PriceBreakdown {
    pub total_inclusive: Money,
    pub base_price: Money,
    pub gst_amount: Money,
    pub tax_rate: TaxRate,
}

/// The buyer's state, as far as the caller knows it.
///
/// An empty code is NOT silently treated as "another state". Callers that
/// might not know the state yet go through [`quote`], which refuses to
/// guess between CGST+SGST and IGST.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "code", rename_all = "snake_case")]
pub enum BuyerJurisdiction {
    /// The buyer picked (or their address carries) this state code.
    Confirmed(String),
    /// No state chosen yet.
    Unconfirmed,
}

impl BuyerJurisdiction {
    /// Builds from a raw form value; blank means unconfirmed.
    ///
    /// ```rust
    /// use tripund_core::gst::BuyerJurisdiction;
    ///
    /// assert_eq!(BuyerJurisdiction::from_code("  "), BuyerJurisdiction::Unconfirmed);
    /// assert_eq!(
    ///     BuyerJurisdiction::from_code(" MH "),
    ///     BuyerJurisdiction::Confirmed("MH".to_string())
    /// );
    /// ```
    pub fn from_code(code: &str) -> Self {
        let code = code.trim();
        if code.is_empty() {
            BuyerJurisdiction::Unconfirmed
        } else {
            BuyerJurisdiction::Confirmed(code.to_string())
        }
    }

    /// The confirmed code, if any.
    pub fn code(&self) -> Option<&str> {
        match self {
            BuyerJurisdiction::Confirmed(code) => Some(code),
            BuyerJurisdiction::Unconfirmed => None,
        }
    }
}

impl From<Option<&str>> for BuyerJurisdiction {
    fn from(code: Option<&str>) -> Self {
        code.map_or(BuyerJurisdiction::Unconfirmed, BuyerJurisdiction::from_code)
    }
}

/// What a checkout or cart view should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GstQuote {
    /// Buyer state known: full CGST/SGST or IGST split.
    Split(TaxBreakdown),
    /// Buyer state unknown: one "GST (18%)" line.
    Aggregate(PriceBreakdown),
}

impl GstQuote {
    pub fn base_price(&self) -> Money {
        match self {
            GstQuote::Split(b) => b.base_price,
            GstQuote::Aggregate(p) => p.base_price,
        }
    }

    pub fn total_tax(&self) -> Money {
        match self {
            GstQuote::Split(b) => b.total_tax,
            GstQuote::Aggregate(p) => p.gst_amount,
        }
    }

    /// Summary label, e.g. `"IGST"` or `"GST (18%)"`.
    pub fn label(&self) -> String {
        match self {
            GstQuote::Split(b) => b.label().to_string(),
            GstQuote::Aggregate(p) => format!("GST ({})", p.tax_rate),
        }
    }
}

// =============================================================================
// Operations
// =============================================================================

/// Splits a GST-inclusive amount for a buyer in `jurisdiction_code` buying
/// from a seller registered in `home_jurisdiction_code`.
///
/// ## Behavior
/// - The codes are compared exactly; an empty `jurisdiction_code` is not
///   equal to the home code and therefore takes the IGST path. Use
///   [`quote`] when the buyer's state may be unknown.
/// - `inclusive_amount == 0` yields an all-zero breakdown.
/// - `rate == 0` yields `base_price == inclusive_amount`.
///
/// Any rate is accepted, including rates above 100%.
///
/// ## Errors
/// - Negative amount
pub fn compute_breakdown(
    inclusive_amount: Money,
    jurisdiction_code: &str,
    home_jurisdiction_code: &str,
    rate: TaxRate,
) -> CoreResult<TaxBreakdown> {
    validate_amount(inclusive_amount)?;

    let base_price = inclusive_amount.tax_exclusive_base(rate);
    let total_tax = inclusive_amount - base_price;
    let is_interstate = jurisdiction_code != home_jurisdiction_code;

    if jurisdiction_code.is_empty() {
        debug!("Buyer jurisdiction empty, applying IGST");
    }

    let (cgst, sgst, igst) = if is_interstate {
        (Money::zero(), Money::zero(), total_tax)
    } else {
        let cgst = Money::from_paise(total_tax.paise() / 2);
        (cgst, total_tax - cgst, Money::zero())
    };

    debug!(
        amount = inclusive_amount.paise(),
        base = base_price.paise(),
        tax = total_tax.paise(),
        rate_bps = rate.bps(),
        is_interstate,
        "Computed GST breakdown"
    );

    Ok(TaxBreakdown {
        total_inclusive: inclusive_amount,
        base_price,
        cgst,
        sgst,
        igst,
        total_tax,
        tax_rate: rate,
        is_interstate,
    })
}

/// Sums `price × quantity` over the items (the sum is itself GST-inclusive).
///
/// Every item is validated first; an empty slice sums to zero.
pub fn cart_total(items: &[LineItem]) -> CoreResult<Money> {
    validate_cart_size(items.len())?;
    items.iter().try_fold(Money::zero(), |acc, item| {
        validate_line_item(item)?;
        acc.checked_add(item.line_total()?)
            .ok_or_else(|| CoreError::AmountOverflow {
                context: "cart total".to_string(),
            })
    })
}

/// Splits the aggregate of a cart.
///
/// One breakdown for the whole cart at one rate; there is no per-item
/// split here (see [`crate::invoice`] for per-line rows).
///
/// ## Example
/// ```rust
/// use tripund_core::gst::compute_cart_breakdown;
/// use tripund_core::money::Money;
/// use tripund_core::types::{LineItem, TaxRate};
///
/// let items = [
///     LineItem::new(Money::from_paise(500), 2),
///     LineItem::new(Money::from_paise(300), 1),
/// ];
/// let b = compute_cart_breakdown(&items, "KA", "KA", TaxRate::GST_STANDARD).unwrap();
/// assert_eq!(b.base_price.paise(), 1102);
/// assert_eq!(b.total_tax.paise(), 198);
/// ```
pub fn compute_cart_breakdown(
    items: &[LineItem],
    jurisdiction_code: &str,
    home_jurisdiction_code: &str,
    rate: TaxRate,
) -> CoreResult<TaxBreakdown> {
    let total = cart_total(items)?;
    debug!(items = items.len(), total = total.paise(), "Cart total");
    compute_breakdown(total, jurisdiction_code, home_jurisdiction_code, rate)
}

/// Base and GST of an inclusive amount, without a jurisdiction split.
pub fn price_breakdown(inclusive_amount: Money, rate: TaxRate) -> CoreResult<PriceBreakdown> {
    validate_amount(inclusive_amount)?;

    let base_price = inclusive_amount.tax_exclusive_base(rate);
    Ok(PriceBreakdown {
        total_inclusive: inclusive_amount,
        base_price,
        gst_amount: inclusive_amount - base_price,
        tax_rate: rate,
    })
}

/// Quotes an amount for a buyer whose state may not be known yet.
///
/// ## Behavior
/// - `Confirmed(code)`: [`GstQuote::Split`] via [`compute_breakdown`]
/// - `Unconfirmed`: [`GstQuote::Aggregate`]; no IGST is shown before the
///   buyer has picked a state
pub fn quote(
    inclusive_amount: Money,
    buyer: &BuyerJurisdiction,
    home_jurisdiction_code: &str,
    rate: TaxRate,
) -> CoreResult<GstQuote> {
    match buyer {
        BuyerJurisdiction::Confirmed(code) => {
            compute_breakdown(inclusive_amount, code, home_jurisdiction_code, rate)
                .map(GstQuote::Split)
        }
        BuyerJurisdiction::Unconfirmed => {
            debug!("Buyer jurisdiction unconfirmed, quoting aggregate GST");
            price_breakdown(inclusive_amount, rate).map(GstQuote::Aggregate)
        }
    }
}

/// [`quote`] for a cart aggregate.
pub fn quote_cart(
    items: &[LineItem],
    buyer: &BuyerJurisdiction,
    home_jurisdiction_code: &str,
    rate: TaxRate,
) -> CoreResult<GstQuote> {
    quote(cart_total(items)?, buyer, home_jurisdiction_code, rate)
}

/// Label for the tax line of a split breakdown.
pub fn gst_label(is_interstate: bool) -> &'static str {
    if is_interstate {
        "IGST"
    } else {
        "CGST + SGST"
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    const RATE: TaxRate = TaxRate::GST_STANDARD;

    fn paise(n: i64) -> Money {
        Money::from_paise(n)
    }

    #[test]
    fn test_intrastate_even_split() {
        let b = compute_breakdown(paise(11800), "KA", "KA", RATE).unwrap();
        assert_eq!(b.base_price, paise(10000));
        assert_eq!(b.total_tax, paise(1800));
        assert_eq!(b.cgst, paise(900));
        assert_eq!(b.sgst, paise(900));
        assert_eq!(b.igst, Money::zero());
        assert!(!b.is_interstate);
        assert_eq!(b.tax_rate, RATE);
    }

    #[test]
    fn test_interstate_igst() {
        let b = compute_breakdown(paise(11800), "MH", "KA", RATE).unwrap();
        assert_eq!(b.base_price, paise(10000));
        assert_eq!(b.total_tax, paise(1800));
        assert_eq!(b.cgst, Money::zero());
        assert_eq!(b.sgst, Money::zero());
        assert_eq!(b.igst, paise(1800));
        assert!(b.is_interstate);
        assert_eq!(b.label(), "IGST");
    }

    #[test]
    fn test_zero_amount() {
        let b = compute_breakdown(Money::zero(), "KA", "KA", RATE).unwrap();
        assert_eq!(b.base_price, Money::zero());
        assert_eq!(b.total_tax, Money::zero());
        assert_eq!(b.cgst, Money::zero());
        assert_eq!(b.sgst, Money::zero());
        assert_eq!(b.igst, Money::zero());
        assert!(!b.is_interstate);
    }

    #[test]
    fn test_cart_aggregate() {
        let items = [LineItem::new(paise(500), 2), LineItem::new(paise(300), 1)];
        let b = compute_cart_breakdown(&items, "KA", "KA", RATE).unwrap();
        assert_eq!(b.total_inclusive, paise(1300));
        assert_eq!(b.base_price, paise(1102));
        assert_eq!(b.total_tax, paise(198));
        assert_eq!(b.cgst, paise(99));
        assert_eq!(b.sgst, paise(99));
    }

    #[test]
    fn test_odd_tax_remainder_goes_to_sgst() {
        let b = compute_breakdown(paise(59), "KA", "KA", RATE).unwrap();
        assert_eq!(b.base_price, paise(50));
        assert_eq!(b.total_tax, paise(9));
        assert_eq!(b.cgst, paise(4));
        assert_eq!(b.sgst, paise(5));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let err = compute_breakdown(paise(-100), "KA", "KA", RATE).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::Negative { .. })
        ));
    }

    #[test]
    fn test_rate_above_hundred_percent() {
        // 25000 / 2.5 = 10000
        let b = compute_breakdown(paise(25000), "KA", "KA", TaxRate::from_bps(15_000)).unwrap();
        assert_eq!(b.base_price, paise(10000));
        assert_eq!(b.total_tax, paise(15000));
        assert_eq!(b.base_price + b.total_tax, b.total_inclusive);
        assert_eq!((b.cgst, b.sgst), (paise(7500), paise(7500)));

        let huge = compute_breakdown(paise(i64::MAX), "MH", "KA", TaxRate::from_bps(u32::MAX)).unwrap();
        assert_eq!(huge.base_price + huge.total_tax, huge.total_inclusive);
    }

    #[test]
    fn test_zero_rate() {
        let b = compute_breakdown(paise(12345), "KA", "KA", TaxRate::zero()).unwrap();
        assert_eq!(b.base_price, paise(12345));
        assert_eq!(b.total_tax, Money::zero());
    }

    #[test]
    fn test_empty_jurisdiction_takes_igst_path() {
        let b = compute_breakdown(paise(11800), "", "KA", RATE).unwrap();
        assert!(b.is_interstate);
        assert_eq!(b.igst, paise(1800));
    }

    #[test]
    fn test_empty_cart() {
        let b = compute_cart_breakdown(&[], "KA", "KA", RATE).unwrap();
        assert_eq!(b.total_inclusive, Money::zero());
        assert_eq!(b.total_tax, Money::zero());
    }

    #[test]
    fn test_cart_rejects_malformed_items() {
        let bad_qty = [LineItem::new(paise(500), 0)];
        assert!(compute_cart_breakdown(&bad_qty, "KA", "KA", RATE).is_err());

        let bad_price = [LineItem::new(paise(-1), 1)];
        assert!(compute_cart_breakdown(&bad_price, "KA", "KA", RATE).is_err());
    }

    #[test]
    fn test_cart_total_overflow() {
        let items = [
            LineItem::new(paise(i64::MAX / 4), 3),
            LineItem::new(paise(i64::MAX / 4), 3),
        ];
        assert!(matches!(
            cart_total(&items),
            Err(CoreError::AmountOverflow { .. })
        ));
    }

    #[test]
    fn test_quote_unconfirmed_is_aggregate() {
        let q = quote(paise(11800), &BuyerJurisdiction::Unconfirmed, "KA", RATE).unwrap();
        assert_eq!(
            q,
            GstQuote::Aggregate(PriceBreakdown {
                total_inclusive: paise(11800),
                base_price: paise(10000),
                gst_amount: paise(1800),
                tax_rate: RATE,
            })
        );
        assert_eq!(q.label(), "GST (18%)");
    }

    #[test]
    fn test_quote_confirmed_is_split() {
        let buyer = BuyerJurisdiction::from_code("KA");
        let q = quote(paise(11800), &buyer, "KA", RATE).unwrap();
        assert!(matches!(q, GstQuote::Split(b) if b.cgst == paise(900)));
        assert_eq!(q.label(), "CGST + SGST");
        assert_eq!(q.total_tax(), paise(1800));
    }

    #[test]
    fn test_quote_cart_matches_compute() {
        let items = [LineItem::new(paise(500), 2), LineItem::new(paise(300), 1)];
        let buyer = BuyerJurisdiction::from(Some("MH"));
        let q = quote_cart(&items, &buyer, "KA", RATE).unwrap();
        let b = compute_cart_breakdown(&items, "MH", "KA", RATE).unwrap();
        assert_eq!(q, GstQuote::Split(b));
        assert_eq!(q.base_price(), paise(1102));
    }

    #[test]
    fn test_gst_label() {
        assert_eq!(gst_label(true), "IGST");
        assert_eq!(gst_label(false), "CGST + SGST");
    }

    #[test]
    fn test_breakdown_json_field_names() {
        let b = compute_breakdown(paise(59), "KA", "KA", RATE).unwrap();
        let json = serde_json::to_value(b).unwrap();
        assert_eq!(json["base_price"], 50);
        assert_eq!(json["sgst"], 5);
        assert_eq!(json["tax_rate"], 1800);
        assert_eq!(json["is_interstate"], false);
    }

    #[test]
    fn test_buyer_jurisdiction_serde() {
        let json = serde_json::to_string(&BuyerJurisdiction::Confirmed("KA".into())).unwrap();
        assert_eq!(json, r#"{"status":"confirmed","code":"KA"}"#);
        let back: BuyerJurisdiction = serde_json::from_str(r#"{"status":"unconfirmed"}"#).unwrap();
        assert_eq!(back, BuyerJurisdiction::Unconfirmed);
    }
}
