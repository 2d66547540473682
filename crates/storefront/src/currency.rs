//! Fixed-rate USD→GHS conversion and price formatting.
//!
//! The exchange rate is a compiled-in constant. [`update_exchange_rate`]
//! exists for callers that expect a setter but never changes the rate;
//! [`current_exchange_rate`] and [`fix_exchange_rate`] are the accessors to
//! rely on.

use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::{info, warn};

use elite_cards_core::{Price, round_cents};

/// GHS per USD: $1 = GHS 12.03.
pub const EXCHANGE_RATE: Decimal = Decimal::from_parts(1203, 0, 0, false, 2);

/// Convert a dollar amount to cedis, rounded to exactly two decimal places.
///
/// Callers supply a non-negative amount; negative input converts as-is.
/// A product beyond the `Decimal` range saturates to `Decimal::MAX` (or
/// `Decimal::MIN` for negative input); use [`checked_usd_to_ghs`] to detect it.
#[must_use]
pub fn usd_to_ghs(usd_amount: Decimal) -> Decimal {
    checked_usd_to_ghs(usd_amount).unwrap_or_else(|| {
        warn!(usd = %usd_amount, "USD amount too large to convert, saturating");
        if usd_amount.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        }
    })
}

/// Like [`usd_to_ghs`], but `None` when the converted amount overflows.
#[must_use]
pub fn checked_usd_to_ghs(usd_amount: Decimal) -> Option<Decimal> {
    usd_amount.checked_mul(EXCHANGE_RATE).map(round_cents)
}

/// The rate in effect.
#[must_use]
pub const fn current_exchange_rate() -> Decimal {
    EXCHANGE_RATE
}

/// The fixed rate. Identical to [`current_exchange_rate`].
#[must_use]
pub const fn fix_exchange_rate() -> Decimal {
    EXCHANGE_RATE
}

/// Log a requested rate change and echo it back.
///
/// The rate is not persisted or applied; [`EXCHANGE_RATE`] stays authoritative.
pub fn update_exchange_rate(new_rate: Decimal) -> Decimal {
    info!(requested = %new_rate, effective = %EXCHANGE_RATE, "Exchange rate update requested (not applied)");
    new_rate
}

/// Render an amount as `$` followed by two decimal places.
///
/// The input's text form is parsed leniently: leading whitespace is skipped
/// and the longest numeric prefix is used, so `"12.5abc"` renders `$12.50`.
/// Input with no numeric prefix renders `$NaN`.
pub fn format_price(amount: impl std::fmt::Display) -> String {
    let text = amount.to_string();
    parse_numeric_prefix(&text).map_or_else(
        || "$NaN".to_string(),
        |value| Price::usd(value).to_string(),
    )
}

/// Render a cedi amount as `GHS 120.30`.
#[must_use]
pub fn format_ghs(amount: Decimal) -> String {
    Price::ghs(amount).to_string()
}

/// Parse the longest leading decimal number of `text`.
fn parse_numeric_prefix(text: &str) -> Option<Decimal> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    let mantissa_end = end;
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    let mantissa = text.get(..mantissa_end)?.trim_end_matches('.');
    let mantissa = mantissa.strip_prefix('+').unwrap_or(mantissa);
    let mantissa = match mantissa.strip_prefix('-') {
        Some(rest) if rest.starts_with('.') => format!("-0{rest}"),
        Some(_) => mantissa.to_string(),
        None if mantissa.starts_with('.') => format!("0{mantissa}"),
        None => mantissa.to_string(),
    };
    if end > mantissa_end {
        // Skip the `e`/`E` marker and any explicit `+`.
        let exponent = text.get(mantissa_end + 1..end)?;
        let exponent = exponent.strip_prefix('+').unwrap_or(exponent);
        Decimal::from_scientific(&format!("{mantissa}e{exponent}")).ok()
    } else {
        Decimal::from_str(&mantissa).ok()
    }
}
