//! Money type for representing monetary values.
//!
//! Amounts are fixed-point decimals. Sums keep full precision; rounding to
//! the currency's minor unit happens only in [`Money::rounded`] and the
//! display helpers.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul};

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    USD,
    EUR,
    GBP,
    JPY,
    CAD,
    AUD,
    CHF,
}

impl Currency {
    /// Get the currency code (e.g., "USD").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
            Currency::CAD => "CAD",
            Currency::AUD => "AUD",
            Currency::CHF => "CHF",
        }
    }

    /// Get the currency symbol (e.g., "$").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
            Currency::GBP => "\u{00a3}",
            Currency::JPY => "\u{00a5}",
            Currency::CAD => "CA$",
            Currency::AUD => "A$",
            Currency::CHF => "CHF",
        }
    }

    /// Get the number of decimal places for this currency.
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            "GBP" => Some(Currency::GBP),
            "JPY" => Some(Currency::JPY),
            "CAD" => Some(Currency::CAD),
            "AUD" => Some(Currency::AUD),
            "CHF" => Some(Currency::CHF),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A monetary value with currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Unrounded amount in major units (e.g., dollars).
    pub amount: Decimal,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value.
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Create a Money value from an integer count of minor units.
    ///
    /// ```
    /// use turbo_bom::money::{Currency, Money};
    /// let price = Money::from_minor(4999, Currency::USD);
    /// assert_eq!(price.display(), "$49.99");
    /// ```
    pub fn from_minor(minor: i64, currency: Currency) -> Self {
        Self::new(Decimal::new(minor, currency.decimal_places()), currency)
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(Decimal::ZERO, currency)
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Check if this is negative.
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// Round half away from zero to the currency's minor unit.
    pub fn rounded(&self) -> Money {
        Money::new(
            self.amount.round_dp_with_strategy(
                self.currency.decimal_places(),
                RoundingStrategy::MidpointAwayFromZero,
            ),
            self.currency,
        )
    }

    /// Format as a display string (e.g., "$49.99").
    pub fn display(&self) -> String {
        format!("{}{}", self.currency.symbol(), self.display_amount())
    }

    /// Format as a display string without symbol (e.g., "49.99").
    pub fn display_amount(&self) -> String {
        let places = self.currency.decimal_places() as usize;
        format!("{:.places$}", self.rounded().amount)
    }

    /// Try to add another Money value, returning None if currencies don't match.
    pub fn try_add(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        self.checked_add_amount(other.amount)
    }

    /// Add an amount in this value's currency, returning None on overflow.
    pub fn checked_add_amount(&self, amount: Decimal) -> Option<Money> {
        self.amount
            .checked_add(amount)
            .map(|total| Money::new(total, self.currency))
    }

    /// Add an amount expressed in this value's currency.
    pub fn add_amount(&self, amount: Decimal) -> Money {
        Money::new(self.amount + amount, self.currency)
    }

    /// Multiply by a decimal factor.
    pub fn multiply(&self, factor: Decimal) -> Money {
        Money::new(self.amount * factor, self.currency)
    }
}

impl Add<Decimal> for Money {
    type Output = Money;

    fn add(self, amount: Decimal) -> Money {
        self.add_amount(amount)
    }
}

impl Mul<Decimal> for Money {
    type Output = Money;

    fn mul(self, factor: Decimal) -> Money {
        self.multiply(factor)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_from_minor() {
        let m = Money::from_minor(4999, Currency::USD);
        assert_eq!(m.amount, dec!(49.99));

        let m = Money::from_minor(100, Currency::JPY);
        assert_eq!(m.amount, dec!(100));
    }

    #[test]
    fn test_money_display() {
        let m = Money::new(dec!(49.99), Currency::USD);
        assert_eq!(m.display(), "$49.99");

        let m = Money::new(dec!(100), Currency::JPY);
        assert_eq!(m.display(), "\u{00a5}100");
    }

    #[test]
    fn test_rounding_is_half_up_at_presentation_only() {
        let m = Money::new(dec!(10.005), Currency::USD);
        assert_eq!(m.rounded().amount, dec!(10.01));
        assert_eq!(m.amount, dec!(10.005));

        let negative = Money::new(dec!(-0.125), Currency::USD);
        assert_eq!(negative.rounded().amount, dec!(-0.13));
    }

    #[test]
    fn test_sums_keep_full_precision() {
        let total = Money::zero(Currency::USD) + dec!(0.004) + dec!(0.004);
        assert_eq!(total.amount, dec!(0.008));
        assert_eq!(total.display(), "$0.01");
    }

    #[test]
    fn test_try_add_currency_mismatch() {
        let usd = Money::new(dec!(10), Currency::USD);
        let eur = Money::new(dec!(10), Currency::EUR);
        assert!(usd.try_add(&eur).is_none());
        assert_eq!(usd.try_add(&usd).unwrap().amount, dec!(20));
    }

    #[test]
    fn test_checked_add_amount_overflow() {
        let max = Money::new(Decimal::MAX, Currency::USD);
        assert!(max.checked_add_amount(dec!(1)).is_none());
        assert_eq!(max.checked_add_amount(dec!(-1)).unwrap().amount, Decimal::MAX - dec!(1));
    }

    #[test]
    fn test_currency_from_code() {
        assert_eq!(Currency::from_code("USD"), Some(Currency::USD));
        assert_eq!(Currency::from_code("eur"), Some(Currency::EUR));
        assert_eq!(Currency::from_code("INVALID"), None);
    }
}
