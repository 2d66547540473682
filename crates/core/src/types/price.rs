//! Type-safe price representation using decimal arithmetic.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a US dollar price.
    #[must_use]
    pub const fn usd(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::USD)
    }

    /// Create a Ghanaian cedi price.
    #[must_use]
    pub const fn ghs(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::GHS)
    }

    /// The amount rounded half away from zero to exactly two decimal places.
    #[must_use]
    pub fn rounded(&self) -> Decimal {
        round_cents(self.amount)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.currency_code.prefix(), self.rounded())
    }
}

/// Round an amount to cents, always keeping a scale of two.
#[must_use]
pub fn round_cents(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    GHS,
}

impl CurrencyCode {
    /// The three-letter code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::GHS => "GHS",
        }
    }

    /// Text placed in front of a formatted amount.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::USD => "$",
            Self::GHS => "GHS ",
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usd_display_pads_cents() {
        assert_eq!(Price::usd(Decimal::new(499, 1)).to_string(), "$49.90");
        assert_eq!(Price::usd(Decimal::from(35)).to_string(), "$35.00");
    }

    #[test]
    fn test_ghs_display() {
        assert_eq!(Price::ghs(Decimal::new(12030, 2)).to_string(), "GHS 120.30");
    }

    #[test]
    fn test_round_cents_half_away_from_zero() {
        assert_eq!(round_cents(Decimal::new(1005, 3)).to_string(), "1.01");
        assert_eq!(round_cents(Decimal::new(1004, 3)).to_string(), "1.00");
    }

    #[test]
    fn test_currency_code_default_is_usd() {
        assert_eq!(CurrencyCode::default(), CurrencyCode::USD);
        assert_eq!(CurrencyCode::GHS.to_string(), "GHS");
    }
}
