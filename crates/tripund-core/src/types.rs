//! # Domain Types
//!
//! Value types shared by the calculator, invoices and settings.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────────┐   │
//! │  │    TaxRate      │   │    LineItem     │   │   ProductPrice      │   │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────────  │   │
//! │  │  bps (u32)      │   │  price (incl.)  │   │  Simple { .. }      │   │
//! │  │  1800 = 18%     │   │  quantity       │   │  Variants { .. }    │   │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────────┘   │
//! │                                                                         │
//! │  ProductPrice ──resolve()──► Money ──► LineItem ──► gst::compute_*     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every price stored by the storefront already includes GST.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1800 bps = 18% (the standard GST slab for the catalogue)
///
/// Keeping the rate integral means the reverse calculation in
/// [`Money::tax_exclusive_base`] never touches floating point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// The standard 18% GST slab, used when no rate is configured.
    pub const GST_STANDARD: TaxRate = TaxRate(1800);

    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage, rejecting nonsense.
    ///
    /// ## Rules
    /// - Must be finite (no NaN, no infinity)
    /// - Must not be negative
    /// - Must fit in `u32` basis points; rates above 100% are accepted
    ///
    /// ## Example
    /// ```rust
    /// use tripund_core::types::TaxRate;
    ///
    /// assert_eq!(TaxRate::from_percentage(18.0).unwrap().bps(), 1800);
    /// assert_eq!(TaxRate::from_percentage(0.25).unwrap().bps(), 25);
    /// assert!(TaxRate::from_percentage(f64::NAN).is_err());
    /// assert!(TaxRate::from_percentage(-5.0).is_err());
    /// ```
    pub fn from_percentage(pct: f64) -> Result<Self, ValidationError> {
        if !pct.is_finite() {
            return Err(ValidationError::NotFinite {
                field: "tax_rate".to_string(),
            });
        }
        if pct < 0.0 {
            return Err(ValidationError::Negative {
                field: "tax_rate".to_string(),
            });
        }

        let bps = (pct * 100.0).round();
        if bps > u32::MAX as f64 {
            return Err(ValidationError::OutOfRange {
                field: "tax_rate".to_string(),
                min: 0,
                max: (u32::MAX / 100) as i64,
            });
        }

        Ok(TaxRate(bps as u32))
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Splits the rate into its central and state halves.
    ///
    /// An odd basis point goes to the state half, the same rule the
    /// calculator uses for amounts.
    ///
    /// ```rust
    /// use tripund_core::types::TaxRate;
    ///
    /// let (central, state) = TaxRate::GST_STANDARD.split_halves();
    /// assert_eq!((central.bps(), state.bps()), (900, 900));
    /// ```
    pub const fn split_halves(&self) -> (TaxRate, TaxRate) {
        let central = self.0 / 2;
        (TaxRate(central), TaxRate(self.0 - central))
    }
}

/// The storefront default is the standard 18% slab, not zero.
impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::GST_STANDARD
    }
}

impl std::fmt::Display for TaxRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0 % 100 == 0 {
            write!(f, "{}%", self.0 / 100)
        } else {
            write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
        }
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One cart or order line as the calculator sees it.
///
/// `price` is the GST-inclusive unit price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    pub price: Money,
    pub quantity: i64,
}

impl LineItem {
    pub const fn new(price: Money, quantity: i64) -> Self {
        LineItem { price, quantity }
    }

    /// `price × quantity`, checked.
    pub fn line_total(&self) -> CoreResult<Money> {
        self.price
            .checked_mul_quantity(self.quantity)
            .ok_or_else(|| CoreError::AmountOverflow {
                context: "line total".to_string(),
            })
    }
}

// =============================================================================
// Product Prices
// =============================================================================

/// A regular price with an optional sale price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PricePoint {
    pub price: Money,
    #[serde(default)]
    pub sale_price: Option<Money>,
}

impl PricePoint {
    /// The price the buyer pays: the sale price when set and non-zero,
    /// otherwise the regular price.
    ///
    /// ```rust
    /// use tripund_core::money::Money;
    /// use tripund_core::types::PricePoint;
    ///
    /// let p = PricePoint { price: Money::from_rupees(1200), sale_price: Some(Money::from_rupees(999)) };
    /// assert_eq!(p.effective(), Money::from_rupees(999));
    /// ```
    pub fn effective(&self) -> Money {
        match self.sale_price {
            Some(sale) if !sale.is_zero() => sale,
            _ => self.price,
        }
    }

    /// True when a sale price undercuts the regular price.
    pub fn is_discounted(&self) -> bool {
        self.effective() < self.price
    }
}

/// One purchasable variant (size, finish, set) of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantPrice {
    pub id: String,
    #[serde(flatten)]
    pub pricing: PricePoint,
}

/// How a product is priced.
///
/// Catalogue documents carry either a flat price or per-variant prices.
/// Resolve to a single [`Money`] at the boundary; the calculator only ever
/// sees plain amounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProductPrice {
    Simple {
        #[serde(flatten)]
        pricing: PricePoint,
    },
    Variants {
        variants: Vec<VariantPrice>,
    },
}

impl ProductPrice {
    /// Resolves the GST-inclusive unit price.
    ///
    /// ## Behavior
    /// - `Simple`: the effective price; `selected` is ignored
    /// - `Variants` with a selection: that variant's effective price
    /// - `Variants` without a selection: the cheapest effective price
    ///   (the "from ₹X" listing price)
    pub fn resolve(&self, selected: Option<&str>) -> CoreResult<Money> {
        match self {
            ProductPrice::Simple { pricing } => Ok(pricing.effective()),
            ProductPrice::Variants { variants } => {
                if variants.is_empty() {
                    return Err(CoreError::NoVariants);
                }
                match selected {
                    Some(id) => variants
                        .iter()
                        .find(|v| v.id == id)
                        .map(|v| v.pricing.effective())
                        .ok_or_else(|| CoreError::UnknownVariant(id.to_string())),
                    None => variants
                        .iter()
                        .map(|v| v.pricing.effective())
                        .min()
                        .ok_or(CoreError::NoVariants),
                }
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn variant(id: &str, price: i64, sale: Option<i64>) -> VariantPrice {
        VariantPrice {
            id: id.to_string(),
            pricing: PricePoint {
                price: Money::from_rupees(price),
                sale_price: sale.map(Money::from_rupees),
            },
        }
    }

    #[test]
    fn test_tax_rate_from_bps() {
        let rate = TaxRate::from_bps(1800);
        assert_eq!(rate.bps(), 1800);
        assert!(!rate.is_zero());
    }

    #[test]
    fn test_tax_rate_from_percentage_validation() {
        assert_eq!(TaxRate::from_percentage(0.0).unwrap(), TaxRate::zero());
        assert_eq!(TaxRate::from_percentage(100.0).unwrap().bps(), 10_000);
        assert!(matches!(
            TaxRate::from_percentage(f64::INFINITY),
            Err(ValidationError::NotFinite { .. })
        ));
        assert!(matches!(
            TaxRate::from_percentage(-0.5),
            Err(ValidationError::Negative { .. })
        ));
        assert_eq!(TaxRate::from_percentage(150.0).unwrap().bps(), 15_000);
        assert!(matches!(
            TaxRate::from_percentage(1e9),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_tax_rate_default_and_display() {
        assert_eq!(TaxRate::default(), TaxRate::GST_STANDARD);
        assert_eq!(TaxRate::from_bps(1800).to_string(), "18%");
        assert_eq!(TaxRate::from_bps(250).to_string(), "2.50%");
    }

    #[test]
    fn test_split_halves_odd_bps() {
        let (central, state) = TaxRate::from_bps(25).split_halves();
        assert_eq!(central.bps(), 12);
        assert_eq!(state.bps(), 13);
    }

    #[test]
    fn test_line_total_overflow() {
        let item = LineItem::new(Money::from_paise(i64::MAX / 2 + 1), 2);
        assert!(matches!(
            item.line_total(),
            Err(CoreError::AmountOverflow { .. })
        ));
    }

    #[test]
    fn test_effective_price_ignores_zero_sale() {
        let p = PricePoint {
            price: Money::from_rupees(500),
            sale_price: Some(Money::zero()),
        };
        assert_eq!(p.effective(), Money::from_rupees(500));
        assert!(!p.is_discounted());
    }

    #[test]
    fn test_resolve_variants() {
        let price = ProductPrice::Variants {
            variants: vec![
                variant("small", 800, None),
                variant("large", 1500, Some(700)),
            ],
        };

        assert_eq!(price.resolve(Some("small")).unwrap(), Money::from_rupees(800));
        // No selection: cheapest effective price
        assert_eq!(price.resolve(None).unwrap(), Money::from_rupees(700));
        assert_eq!(
            price.resolve(Some("medium")),
            Err(CoreError::UnknownVariant("medium".to_string()))
        );
    }

    #[test]
    fn test_resolve_empty_variants() {
        let price = ProductPrice::Variants { variants: vec![] };
        assert_eq!(price.resolve(None), Err(CoreError::NoVariants));
    }

    #[test]
    fn test_product_price_json_shape() {
        let json = r#"{"kind":"simple","price":59900,"sale_price":null}"#;
        let parsed: ProductPrice = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.resolve(None).unwrap(), Money::from_paise(59900));

        let json = r#"{"kind":"variants","variants":[{"id":"a","price":1000}]}"#;
        let parsed: ProductPrice = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.resolve(Some("a")).unwrap(), Money::from_paise(1000));
    }
}
