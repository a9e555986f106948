//! # Invoice Tax Rows
//!
//! Per-line GST rows and the invoice tax summary.
//!
//! ## Per-Line vs Aggregate
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Cart view:   Σ(price × qty) ──► compute_breakdown ──► one split       │
//! │                                                                         │
//! │  Invoice:     line 1 ──► compute_breakdown ──► row 1  ─┐                │
//! │               line 2 ──► compute_breakdown ──► row 2  ─┼─► TaxSummary  │
//! │               line n ──► compute_breakdown ──► row n  ─┘                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each row is split independently, so every row satisfies
//! `taxable_value + tax == total_amount` on its own. The summary's taxable
//! value may differ from the cart view's aggregate base by a few paise of
//! per-line rounding; the grand total never does.

use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::gst::compute_breakdown;
use crate::money::Money;
use crate::types::{LineItem, TaxRate};
use crate::validation::{validate_cart_size, validate_line_item};

/// HSN code printed when a product carries none (handicrafts chapter).
pub const DEFAULT_HSN_CODE: &str = "9403";

/// An order line to be invoiced. `unit_price` is GST-inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InvoiceLine {
    pub product_id: String,
    pub product_name: String,
    #[serde(default = "default_hsn_code")]
    pub hsn_code: String,
    pub quantity: i64,
    pub unit_price: Money,
}

fn default_hsn_code() -> String {
    DEFAULT_HSN_CODE.to_string()
}

impl InvoiceLine {
    /// Creates a line with the default HSN code.
    pub fn new(
        product_id: impl Into<String>,
        product_name: impl Into<String>,
        quantity: i64,
        unit_price: Money,
    ) -> Self {
        InvoiceLine {
            product_id: product_id.into(),
            product_name: product_name.into(),
            hsn_code: default_hsn_code(),
            quantity,
            unit_price,
        }
    }

    fn as_line_item(&self) -> LineItem {
        LineItem::new(self.unit_price, self.quantity)
    }
}

/// One invoice row with its GST columns.
///
/// Rates are in basis points. On an intrastate invoice `cgst_rate` and
/// `sgst_rate` are half the GST rate each and `igst_rate` is zero; on an
/// interstate invoice it is the other way round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InvoiceTaxRow {
    pub id: String,
    pub product_id: String,
    pub product_name: String,
    pub hsn_code: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub taxable_value: Money,
    pub cgst_rate: TaxRate,
    pub cgst_amount: Money,
    pub sgst_rate: TaxRate,
    pub sgst_amount: Money,
    pub igst_rate: TaxRate,
    pub igst_amount: Money,
    /// GST-inclusive line total.
    pub total_amount: Money,
}

impl InvoiceTaxRow {
    pub fn total_tax(&self) -> Money {
        self.cgst_amount + self.sgst_amount + self.igst_amount
    }
}

/// Builds one GST row per line.
///
/// Row ids are `item_1`, `item_2`, … in line order.
///
/// ## Example
/// ```rust
/// use tripund_core::invoice::{build_tax_rows, InvoiceLine};
/// use tripund_core::money::Money;
/// use tripund_core::types::TaxRate;
///
/// let lines = [InvoiceLine::new("p1", "Brass Diya", 2, Money::from_rupees(590))];
/// let rows = build_tax_rows(&lines, "MH", "KA", TaxRate::GST_STANDARD).unwrap();
/// assert_eq!(rows[0].taxable_value, Money::from_rupees(1000));
/// assert_eq!(rows[0].igst_amount, Money::from_rupees(180));
/// assert_eq!(rows[0].igst_rate, TaxRate::GST_STANDARD);
/// ```
pub fn build_tax_rows(
    lines: &[InvoiceLine],
    buyer_jurisdiction: &str,
    home_jurisdiction: &str,
    rate: TaxRate,
) -> CoreResult<Vec<InvoiceTaxRow>> {
    validate_cart_size(lines.len())?;
    let (half_central, half_state) = rate.split_halves();

    let rows = lines
        .iter()
        .enumerate()
        .map(|(index, line)| {
            let item = line.as_line_item();
            validate_line_item(&item)?;
            let breakdown =
                compute_breakdown(item.line_total()?, buyer_jurisdiction, home_jurisdiction, rate)?;

            let (cgst_rate, sgst_rate, igst_rate) = if breakdown.is_interstate {
                (TaxRate::zero(), TaxRate::zero(), rate)
            } else {
                (half_central, half_state, TaxRate::zero())
            };

            Ok(InvoiceTaxRow {
                id: format!("item_{}", index + 1),
                product_id: line.product_id.clone(),
                product_name: line.product_name.clone(),
                hsn_code: line.hsn_code.clone(),
                quantity: line.quantity,
                unit_price: line.unit_price,
                taxable_value: breakdown.base_price,
                cgst_rate,
                cgst_amount: breakdown.cgst,
                sgst_rate,
                sgst_amount: breakdown.sgst,
                igst_rate,
                igst_amount: breakdown.igst,
                total_amount: breakdown.total_inclusive,
            })
        })
        .collect::<CoreResult<Vec<_>>>()?;

    debug!(rows = rows.len(), buyer = buyer_jurisdiction, "Built invoice tax rows");
    Ok(rows)
}

/// Invoice footer totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxSummary {
    pub total_taxable_value: Money,
    pub total_cgst: Money,
    pub total_sgst: Money,
    pub total_igst: Money,
    pub total_tax: Money,
    pub grand_total: Money,
    /// `final_amount - grand_total`; in (-₹0.50, ₹0.50].
    pub rounding_amount: Money,
    /// Grand total rounded to the nearest rupee, halves up.
    pub final_amount: Money,
}

impl TaxSummary {
    /// Sums the rows and rounds the payable amount to whole rupees.
    ///
    /// ## Errors
    /// - `AmountOverflow` if the rows together leave the `i64` range; each
    ///   row fitting on its own does not guarantee the sum does
    pub fn from_rows(rows: &[InvoiceTaxRow]) -> CoreResult<Self> {
        let overflow = || CoreError::AmountOverflow {
            context: "invoice summary".to_string(),
        };
        let add = |acc: Money, value: Money| acc.checked_add(value).ok_or_else(overflow);

        let mut summary = TaxSummary::default();
        for row in rows {
            summary.total_taxable_value = add(summary.total_taxable_value, row.taxable_value)?;
            summary.total_cgst = add(summary.total_cgst, row.cgst_amount)?;
            summary.total_sgst = add(summary.total_sgst, row.sgst_amount)?;
            summary.total_igst = add(summary.total_igst, row.igst_amount)?;
        }

        summary.total_tax = add(add(summary.total_cgst, summary.total_sgst)?, summary.total_igst)?;
        summary.grand_total = add(summary.total_taxable_value, summary.total_tax)?;
        summary.final_amount = summary.grand_total.round_to_rupee().ok_or_else(overflow)?;
        summary.rounding_amount = summary.final_amount - summary.grand_total;
        Ok(summary)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
