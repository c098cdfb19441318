//! Currency conversion against a looked-up rate table.

use fxview_common::{Currency, Money};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::cache::{RateLookup, RateOrigin};

/// Why a conversion fell back to identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IdentityReason {
    /// The table does not quote the target currency.
    MissingRate,
    /// Multiplication overflowed.
    Overflow,
}

/// Represents a completed display conversion.
#[derive(Debug, Clone, Serialize)]
pub struct Conversion {
    /// Input amount.
    pub input: Money,
    /// Output amount. Same value as the input when no rate was applied.
    pub output: Money,
    /// Factor actually applied.
    pub factor: Decimal,
    /// Set when identity was used instead of a quoted rate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<IdentityReason>,
    /// Where the table came from.
    #[serde(skip)]
    pub origin: RateOrigin,
}

impl Conversion {
    /// Convert `input` into `target` using `lookup`. Never fails: a missing
    /// rate or an overflow yields the input value re-labelled in `target`.
    pub fn apply(input: Money, target: &Currency, lookup: &RateLookup) -> Self {
        let (factor, identity) = match lookup.table.rate_to(target) {
            Some(rate) => (rate, None),
            None => (Decimal::ONE, Some(IdentityReason::MissingRate)),
        };

        match input.checked_convert(factor, target.clone()) {
            Some(output) => Self {
                input,
                output,
                factor,
                identity,
                origin: lookup.origin,
            },
            None => Self {
                output: Money::new(input.value, target.clone()),
                input,
                factor: Decimal::ONE,
                identity: Some(IdentityReason::Overflow),
                origin: lookup.origin,
            },
        }
    }

    /// Whether a quoted rate was applied.
    pub fn rate_applied(&self) -> bool {
        self.identity.is_none()
    }
}
