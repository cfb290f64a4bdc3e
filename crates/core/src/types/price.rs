//! Type-safe price representation using decimal arithmetic.
//!
//! All catalog and cart math runs on `rust_decimal::Decimal` - never on
//! floats - so totals are exact and the conversion to the payment
//! provider's minor units (cents) is a single explicit rounding step.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// A price with currency information.
///
/// Amounts are in the currency's standard unit (e.g., dollars, not cents).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit.
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

    /// A zero price in the given currency.
    #[must_use]
    pub const fn zero(currency_code: CurrencyCode) -> Self {
        Self::new(Decimal::ZERO, currency_code)
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}{:.2}", self.currency_code.symbol(), self.amount)
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "\u{20ac}",
            Self::GBP => "\u{a3}",
        }
    }

    /// Lowercase code as the payment provider expects it (e.g., "usd").
    #[must_use]
    pub const fn provider_code(self) -> &'static str {
        match self {
            Self::USD => "usd",
            Self::EUR => "eur",
            Self::GBP => "gbp",
            Self::CAD => "cad",
            Self::AUD => "aud",
        }
    }
}

/// Convert a major-unit decimal amount into integer minor units (cents).
///
/// Rounds to the nearest cent (ties away from zero), matching standard
/// currency display. Returns `None` if the amount does not fit in `i64`,
/// which no realistic order total will.
#[must_use]
pub fn minor_units(amount: Decimal) -> Option<i64> {
    (amount * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_display() {
        let price = Price::new(Decimal::new(1999, 2), CurrencyCode::USD);
        assert_eq!(price.display(), "$19.99");
    }

    #[test]
    fn test_zero_price() {
        let price = Price::zero(CurrencyCode::USD);
        assert_eq!(price.amount, Decimal::ZERO);
        assert_eq!(price.display(), "$0.00");
    }

    #[test]
    fn test_minor_units_whole_amount() {
        assert_eq!(minor_units(Decimal::from(213)), Some(21300));
    }

    #[test]
    fn test_minor_units_rounds_sub_cent() {
        // 19.995 rounds away from zero to 2000 cents
        assert_eq!(minor_units(Decimal::new(19995, 3)), Some(2000));
        // 19.994 rounds down
        assert_eq!(minor_units(Decimal::new(19994, 3)), Some(1999));
    }

    #[test]
    fn test_provider_code_is_lowercase() {
        assert_eq!(CurrencyCode::USD.provider_code(), "usd");
        assert_eq!(CurrencyCode::GBP.provider_code(), "gbp");
    }
}
