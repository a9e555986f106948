//! Plain-text rendering of quotes, invoices and settings.

use std::fmt::Write;

use tripund_core::invoice::{InvoiceTaxRow, TaxSummary};
use tripund_core::jurisdiction::{self, JurisdictionKind};
use tripund_core::{GstQuote, Money, PublicSettings, TaxBreakdown};

const LABEL_WIDTH: usize = 22;

fn line(out: &mut String, label: &str, value: impl std::fmt::Display) {
    let _ = writeln!(out, "{:<width$}{:>14}", label, value.to_string(), width = LABEL_WIDTH);
}

fn split_lines(out: &mut String, b: &TaxBreakdown) {
    if b.is_interstate {
        line(out, &format!("IGST ({})", b.tax_rate), b.igst);
    } else {
        let (central, state) = b.tax_rate.split_halves();
        line(out, &format!("CGST ({})", central), b.cgst);
        line(out, &format!("SGST ({})", state), b.sgst);
    }
}

/// Price summary as shown at checkout.
pub fn render_quote(quote: &GstQuote) -> String {
    let mut out = String::new();
    match quote {
        GstQuote::Split(b) => {
            line(&mut out, "Taxable value", b.base_price);
            split_lines(&mut out, b);
            line(&mut out, "Total (incl. GST)", b.total_inclusive);
        }
        GstQuote::Aggregate(p) => {
            line(&mut out, "Taxable value", p.base_price);
            line(&mut out, &quote.label(), p.gst_amount);
            line(&mut out, "Total (incl. GST)", p.total_inclusive);
            out.push_str("(select a delivery state for the CGST/SGST or IGST split)\n");
        }
    }
    out
}

/// Invoice rows followed by the tax summary.
pub fn render_invoice(rows: &[InvoiceTaxRow], summary: &TaxSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<8} {:<6} {:>4} {:>12} {:>10} {:>10} {:>10} {:>12}",
        "Row", "HSN", "Qty", "Taxable", "CGST", "SGST", "IGST", "Total"
    );
    for row in rows {
        let _ = writeln!(
            out,
            "{:<8} {:<6} {:>4} {:>12} {:>10} {:>10} {:>10} {:>12}",
            row.id,
            row.hsn_code,
            row.quantity,
            row.taxable_value.to_string(),
            row.cgst_amount.to_string(),
            row.sgst_amount.to_string(),
            row.igst_amount.to_string(),
            row.total_amount.to_string(),
        );
    }
    out.push('\n');

    line(&mut out, "Taxable value", summary.total_taxable_value);
    if summary.total_igst.is_zero() {
        line(&mut out, "CGST", summary.total_cgst);
        line(&mut out, "SGST", summary.total_sgst);
    } else {
        line(&mut out, "IGST", summary.total_igst);
    }
    line(&mut out, "Grand total", summary.grand_total);
    if !summary.rounding_amount.is_zero() {
        line(&mut out, "Rounding", summary.rounding_amount);
    }
    line(&mut out, "Amount payable", summary.final_amount);
    out
}

/// The jurisdiction table, states then union territories.
pub fn render_states() -> String {
    let mut out = String::new();
    for j in jurisdiction::ALL {
        let kind = match j.kind {
            JurisdictionKind::State => "",
            JurisdictionKind::UnionTerritory => " (UT)",
        };
        let _ = writeln!(out, "{:<4} {}  {}{}", j.code, j.gst_code, j.name, kind);
    }
    out
}

/// Effective settings, plus checkout charges when a subtotal is given.
pub fn render_settings(settings: &PublicSettings, checkout: Option<&CheckoutCharges>) -> String {
    let mut out = String::new();
    line(&mut out, "GST rate", settings.payment.tax_rate);
    line(&mut out, "Free shipping from", settings.shipping.free_shipping_threshold);
    line(&mut out, "Standard shipping", settings.shipping.standard_shipping_rate);
    line(&mut out, "Express shipping", settings.shipping.express_shipping_rate);
    line(
        &mut out,
        "Prepaid discount",
        format!("{:.2}%", settings.payment.prepaid_discount_bps as f64 / 100.0),
    );
    if settings.payment.cod_enabled {
        line(&mut out, "COD limit", settings.payment.cod_limit);
    } else {
        line(&mut out, "COD", "disabled");
    }

    if let Some(c) = checkout {
        out.push('\n');
        line(&mut out, "Subtotal", c.subtotal);
        line(&mut out, "Shipping", c.shipping_fee);
        line(&mut out, "Prepaid discount", c.prepaid_discount);
        line(&mut out, "COD available", if c.cod_available { "yes" } else { "no" });
    }
    out
}

/// Charges derived from the settings for one subtotal.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CheckoutCharges {
    pub subtotal: Money,
    pub shipping_fee: Money,
    pub prepaid_discount: Money,
    pub cod_available: bool,
}
