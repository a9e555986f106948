//! Property-based tests for the GST calculator and invoice rows.
//!
//! Run with: `cargo test -p tripund-core --test gst_properties`

use proptest::prelude::*;
use tripund_core::gst::{compute_breakdown, compute_cart_breakdown, quote, BuyerJurisdiction, GstQuote};
use tripund_core::invoice::{build_tax_rows, InvoiceLine, TaxSummary};
use tripund_core::jurisdiction::{self, HOME_JURISDICTION};
use tripund_core::money::Money;
use tripund_core::types::{LineItem, TaxRate};
use tripund_core::MAX_ITEM_QUANTITY;

/// Up to ₹10 crore.
fn arb_amount() -> impl Strategy<Value = Money> {
    (0i64..=1_000_000_000).prop_map(Money::from_paise)
}

/// Real slabs, arbitrary rates up to 1000%, and the largest representable rate.
fn arb_rate() -> impl Strategy<Value = TaxRate> {
    prop_oneof![
        Just(TaxRate::zero()),
        Just(TaxRate::from_bps(500)),
        Just(TaxRate::from_bps(1200)),
        Just(TaxRate::GST_STANDARD),
        Just(TaxRate::from_bps(2800)),
        Just(TaxRate::from_bps(u32::MAX)),
        (0u32..=100_000).prop_map(TaxRate::from_bps),
    ]
}

fn arb_code() -> impl Strategy<Value = &'static str> {
    prop::sample::select(jurisdiction::ALL.iter().map(|j| j.code).collect::<Vec<_>>())
}

fn arb_items() -> impl Strategy<Value = Vec<LineItem>> {
    prop::collection::vec(
        (0i64..=5_000_000, 1i64..=MAX_ITEM_QUANTITY)
            .prop_map(|(price, qty)| LineItem::new(Money::from_paise(price), qty)),
        0..20,
    )
}

proptest! {
    /// base + tax reconstructs the inclusive amount exactly.
    #[test]
    fn breakdown_sums_to_inclusive(amount in arb_amount(), rate in arb_rate(), code in arb_code()) {
        let b = compute_breakdown(amount, code, HOME_JURISDICTION, rate).unwrap();
        prop_assert_eq!(b.base_price + b.total_tax, b.total_inclusive);
        prop_assert_eq!(b.cgst + b.sgst + b.igst, b.total_tax);
        prop_assert!(!b.base_price.is_negative());
        prop_assert!(!b.total_tax.is_negative());
    }

    /// The base is the inclusive amount divided by (1 + rate), to the nearest paisa.
    #[test]
    fn base_is_nearest_paisa(amount in arb_amount(), rate in arb_rate()) {
        let b = compute_breakdown(amount, "KA", "KA", rate).unwrap();
        let d = 10_000i128 + rate.bps() as i128;
        let error = (b.base_price.paise() as i128 * d - amount.paise() as i128 * 10_000).abs();
        prop_assert!(2 * error <= d, "base {} off by more than half a paisa", b.base_price);
    }

    #[test]
    fn intrastate_splits_evenly(amount in arb_amount(), rate in arb_rate()) {
        let b = compute_breakdown(amount, HOME_JURISDICTION, HOME_JURISDICTION, rate).unwrap();
        prop_assert!(!b.is_interstate);
        prop_assert_eq!(b.igst, Money::zero());
        let diff = (b.sgst - b.cgst).paise();
        prop_assert!(diff == 0 || diff == 1);
    }

    #[test]
    fn interstate_is_all_igst(amount in arb_amount(), rate in arb_rate(), code in arb_code()) {
        prop_assume!(code != HOME_JURISDICTION);
        let b = compute_breakdown(amount, code, HOME_JURISDICTION, rate).unwrap();
        prop_assert!(b.is_interstate);
        prop_assert_eq!(b.cgst, Money::zero());
        prop_assert_eq!(b.sgst, Money::zero());
        prop_assert_eq!(b.igst, b.total_tax);
    }

    /// Same inputs, same output.
    #[test]
    fn breakdown_is_deterministic(amount in arb_amount(), rate in arb_rate(), code in arb_code()) {
        let first = compute_breakdown(amount, code, HOME_JURISDICTION, rate).unwrap();
        let second = compute_breakdown(amount, code, HOME_JURISDICTION, rate).unwrap();
        prop_assert_eq!(first, second);
    }

    /// An unconfirmed buyer never sees an IGST line.
    #[test]
    fn unconfirmed_quote_is_aggregate(amount in arb_amount(), rate in arb_rate()) {
        let q = quote(amount, &BuyerJurisdiction::Unconfirmed, HOME_JURISDICTION, rate).unwrap();
        let split = compute_breakdown(amount, HOME_JURISDICTION, HOME_JURISDICTION, rate).unwrap();
        prop_assert!(matches!(q, GstQuote::Aggregate(_)));
        prop_assert_eq!(q.base_price(), split.base_price);
        prop_assert_eq!(q.total_tax(), split.total_tax);
    }

    #[test]
    fn cart_breakdown_matches_total(items in arb_items(), rate in arb_rate(), code in arb_code()) {
        let expected: Money = items.iter().map(|i| i.price * i.quantity).sum();
        let b = compute_cart_breakdown(&items, code, HOME_JURISDICTION, rate).unwrap();
        prop_assert_eq!(b.total_inclusive, expected);
        prop_assert_eq!(b.base_price + b.total_tax, expected);
    }

    /// Every invoice row balances, and the rows together charge exactly the cart total.
    #[test]
    fn invoice_rows_balance(items in arb_items(), rate in arb_rate(), code in arb_code()) {
        let lines: Vec<InvoiceLine> = items
            .iter()
            .enumerate()
            .map(|(i, item)| InvoiceLine::new(format!("p{i}"), "Item", item.quantity, item.price))
            .collect();
        let rows = build_tax_rows(&lines, code, HOME_JURISDICTION, rate).unwrap();
        prop_assert_eq!(rows.len(), lines.len());

        for row in &rows {
            prop_assert_eq!(row.taxable_value + row.total_tax(), row.total_amount);
        }

        let summary = TaxSummary::from_rows(&rows).unwrap();
        let cart = compute_cart_breakdown(&items, code, HOME_JURISDICTION, rate).unwrap();
        prop_assert_eq!(summary.grand_total, cart.total_inclusive);
        prop_assert_eq!(summary.final_amount - summary.grand_total, summary.rounding_amount);
        prop_assert!(summary.rounding_amount.paise() > -50 && summary.rounding_amount.paise() <= 50);
        prop_assert_eq!(summary.final_amount.paise_part(), 0);
    }
}

#[test]
fn empty_cart_is_all_zero() {
    let b = compute_cart_breakdown(&[], "KA", "KA", TaxRate::GST_STANDARD).unwrap();
    assert_eq!(b.total_inclusive, Money::zero());
    assert_eq!(b.base_price, Money::zero());
    assert_eq!(b.total_tax, Money::zero());
}
