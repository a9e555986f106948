//! Argument parsing for amounts, cart items, rates and states.
//!
//! Amounts on the command line are rupees with optional paise (`118.50`).

use tripund_core::jurisdiction;
use tripund_core::{BuyerJurisdiction, LineItem, Money, TaxRate, ValidationError};

use crate::error::{QuoteError, QuoteResult};

/// Parses `PRICE:QTY` (or just `PRICE`, quantity 1).
///
/// Only the format is checked here; quantity and price limits are enforced
/// by the calculator.
pub fn parse_line_item(input: &str) -> Result<LineItem, ValidationError> {
    let (price, qty) = match input.split_once(':') {
        Some((price, qty)) => (price, qty.trim()),
        None => (input, "1"),
    };

    let price = Money::parse_rupees(price)?;
    let quantity = qty.parse::<i64>().map_err(|_| ValidationError::InvalidFormat {
        field: "quantity".to_string(),
        reason: format!("'{}' is not a whole number", qty),
    })?;

    Ok(LineItem::new(price, quantity))
}

/// Parses a GST rate given in percent (`18`, `12.5`, `5%`).
pub fn parse_rate(input: &str) -> Result<TaxRate, ValidationError> {
    let trimmed = input.trim().trim_end_matches('%');
    let pct = trimmed
        .parse::<f64>()
        .map_err(|_| ValidationError::InvalidFormat {
            field: "tax_rate".to_string(),
            reason: format!("'{}' is not a number", input),
        })?;
    TaxRate::from_percentage(pct)
}

/// Canonical code for a state given on the command line.
pub fn resolve_state(code: &str) -> QuoteResult<&'static str> {
    jurisdiction::find(code)
        .map(|j| j.code)
        .ok_or_else(|| QuoteError::UnknownState(code.to_string()))
}

/// Buyer state for a quote: absent means the buyer has not picked one yet.
pub fn resolve_buyer(code: Option<&str>) -> QuoteResult<BuyerJurisdiction> {
    match code {
        None => Ok(BuyerJurisdiction::Unconfirmed),
        Some(code) => Ok(BuyerJurisdiction::Confirmed(resolve_state(code)?.to_string())),
    }
}
