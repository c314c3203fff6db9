//! Price and percentage formatting for `Decimal` values.
//!
//! Rounding is half away from zero on the exact decimal value. A browser's
//! `toFixed` rounds the nearest binary float instead, so exact midpoints can
//! come out one step lower there: `42.55` shows as `42.5` in JS, `42.6` here.

use rust_decimal::prelude::*;
use std::sync::OnceLock;

static THOUSAND: OnceLock<Decimal> = OnceLock::new();
static HUNDRED_THOUSAND: OnceLock<Decimal> = OnceLock::new();

fn get_thousand() -> &'static Decimal {
    THOUSAND.get_or_init(|| Decimal::from(1_000))
}

fn get_hundred_thousand() -> &'static Decimal {
    HUNDRED_THOUSAND.get_or_init(|| Decimal::from(100_000))
}

/// Round half away from zero and render with exactly `dp` decimal places.
pub fn fixed(value: &Decimal, dp: u32) -> String {
    let rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}", dp as usize, rounded)
}

/// Currency display with two decimals and thousands separators: `$67,123.45`.
pub fn format_price(price: &Decimal) -> String {
    let body = super::num::group_thousands(&fixed(&price.abs(), 2));
    if price.is_sign_negative() && !price.is_zero() {
        format!("-${}", body)
    } else {
        format!("${}", body)
    }
}

/// Signed percentage with two decimals: `+10.00%`, `-3.25%`. Zero is `+0.00%`.
pub fn format_change_percent(change: &Decimal) -> String {
    let sign = if *change >= Decimal::ZERO { "+" } else { "" };
    format!("{}{}%", sign, fixed(change, 2))
}

/// Compact label for year-grid cells.
///
/// `>= 100000` → thousands with no decimal (`150K`); `[1000, 100000)` →
/// thousands with one decimal (`42.5K`); otherwise a whole number (`800`).
pub fn format_compact_price(price: &Decimal) -> String {
    if price >= get_hundred_thousand() {
        format!("{}K", fixed(&(price / get_thousand()), 0))
    } else if price >= get_thousand() {
        format!("{}K", fixed(&(price / get_thousand()), 1))
    } else {
        fixed(price, 0)
    }
}
