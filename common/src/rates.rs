//! Rate tables expressed relative to a single base currency.

use std::collections::BTreeMap;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::monetary::Currency;

/// Conversion factors from one unit of `base` into other currencies.
///
/// The table always quotes its own base at exactly 1, and only holds
/// strictly positive factors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateTable {
    base: Currency,
    rates: BTreeMap<Currency, Decimal>,
}

impl RateTable {
    /// Build a table, dropping non-positive factors and pinning the base to 1.
    pub fn new<I>(base: Currency, rates: I) -> Self
    where
        I: IntoIterator<Item = (Currency, Decimal)>,
    {
        let mut rates: BTreeMap<Currency, Decimal> = rates
            .into_iter()
            .filter(|(_, rate)| *rate > Decimal::ZERO)
            .collect();
        rates.insert(base.clone(), Decimal::ONE);
        Self { base, rates }
    }

    /// Build a table from provider floats. Non-finite values are dropped.
    pub fn from_f64<I, K>(base: Currency, rates: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        let converted = rates.into_iter().filter_map(|(code, rate)| {
            if !rate.is_finite() {
                return None;
            }
            Decimal::from_f64(rate).map(|d| (Currency::new(code), d))
        });
        Self::new(base, converted)
    }

    /// Table holding only the base currency.
    pub fn identity(base: Currency) -> Self {
        Self::new(base, std::iter::empty())
    }

    /// The base currency.
    pub fn base(&self) -> &Currency {
        &self.base
    }

    /// Factor from one unit of base into `target`, if quoted.
    pub fn rate_to(&self, target: &Currency) -> Option<Decimal> {
        self.rates.get(target).copied()
    }

    /// Re-express the table relative to another currency it quotes.
    pub fn rebased(&self, new_base: &Currency) -> Option<RateTable> {
        let pivot = self.rate_to(new_base)?;
        let rates = self
            .rates
            .iter()
            .filter_map(|(code, rate)| rate.checked_div(pivot).map(|r| (code.clone(), r)));
        Some(RateTable::new(new_base.clone(), rates))
    }

    /// Number of quoted currencies, base included.
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// A table is never empty; it always quotes its base.
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}
