//! Monetary types for FxView.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CommonError, CommonResult};

/// A monetary amount with currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// The amount value.
    pub value: Decimal,
    /// ISO 4217 currency code.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money instance.
    pub fn new(value: Decimal, currency: Currency) -> Self {
        Self { value, currency }
    }

    /// Multiply by a factor and re-denominate, `None` on overflow.
    pub fn checked_convert(&self, factor: Decimal, target: Currency) -> Option<Money> {
        self.value
            .checked_mul(factor)
            .map(|value| Money::new(value, target))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.currency)
    }
}

/// ISO 4217 currency code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Currency(String);

impl Currency {
    /// Create a new currency from code. The code is upper-cased but not validated.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().to_uppercase())
    }

    /// Parse a currency code, rejecting anything but three ASCII letters.
    pub fn parse(code: &str) -> CommonResult<Self> {
        let trimmed = code.trim();
        if trimmed.len() != 3 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CommonError::InvalidCurrencyCode(code.to_string()));
        }
        Ok(Self::new(trimmed))
    }

    /// Get the currency code.
    pub fn code(&self) -> &str {
        &self.0
    }

    /// Get the standard decimal places for this currency.
    pub fn decimal_places(&self) -> u32 {
        match self.0.as_str() {
            "JPY" | "KRW" | "VND" => 0,
            "BHD" | "KWD" | "OMR" => 3,
            _ => 2,
        }
    }

    /// Common currencies
    pub fn brl() -> Self {
        Self::new("BRL")
    }

    pub fn usd() -> Self {
        Self::new("USD")
    }

    pub fn eur() -> Self {
        Self::new("EUR")
    }

    pub fn gbp() -> Self {
        Self::new("GBP")
    }

    pub fn jpy() -> Self {
        Self::new("JPY")
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Currency {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_currency_is_uppercased() {
        assert_eq!(Currency::new("brl"), Currency::brl());
        assert_eq!(Currency::from("usd").code(), "USD");
    }

    #[test]
    fn test_currency_parse_rejects_bad_codes() {
        assert_eq!(Currency::parse(" eur ").unwrap(), Currency::eur());
        assert!(Currency::parse("EURO").is_err());
        assert!(Currency::parse("U$D").is_err());
        assert!(Currency::parse("").is_err());
    }

    #[test]
    fn test_currency_decimal_places() {
        assert_eq!(Currency::usd().decimal_places(), 2);
        assert_eq!(Currency::brl().decimal_places(), 2);
        assert_eq!(Currency::jpy().decimal_places(), 0);
        assert_eq!(Currency::new("KWD").decimal_places(), 3);
    }

    #[test]
    fn test_checked_convert_overflow() {
        let huge = Money::new(Decimal::MAX, Currency::brl());
        assert!(huge.checked_convert(dec!(2), Currency::usd()).is_none());

        let ok = Money::new(dec!(1000), Currency::brl())
            .checked_convert(dec!(0.20), Currency::usd())
            .unwrap();
        assert_eq!(ok.value, dec!(200.00));
        assert_eq!(ok.currency, Currency::usd());
    }
}
