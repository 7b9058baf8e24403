//! Tenge amounts for display.
//!
//! Prices are stored as `NUMERIC(12, 2)` and shown rounded to whole tenge
//! with comma thousands separators, e.g. `15,000 ₸`.

use rust_decimal::{Decimal, RoundingStrategy};

/// Currency sign appended to formatted amounts.
pub const TENGE_SIGN: &str = "₸";

/// Text shown when an order has no price yet.
pub const PRICE_NOT_SET: &str = "Не указана";

/// Format an optional price as `15,000 ₸`, or [`PRICE_NOT_SET`] when absent.
#[must_use]
pub fn format_tenge(amount: Option<Decimal>) -> String {
    amount.map_or_else(
        || PRICE_NOT_SET.to_owned(),
        |value| format!("{} {TENGE_SIGN}", format_tenge_plain(value)),
    )
}

/// Format an amount as whole tenge with thousands separators, without the sign.
///
/// Halves round to the nearest even number.
#[must_use]
pub fn format_tenge_plain(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven);
    let digits = rounded.abs().trunc().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
