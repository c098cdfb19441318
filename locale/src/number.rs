//! Locale number rules.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// Where the currency symbol goes relative to the number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SymbolPlacement {
    /// `$200.00`
    Prefix,
    /// `R$ 100,00`
    PrefixSpaced,
    /// `100,00 €`
    SuffixSpaced,
}

/// Separators and grouping for one locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NumberFormat {
    pub decimal_separator: char,
    pub group_separator: char,
    /// Smallest integer-part length, beyond the first group of three, before
    /// grouping kicks in. 1 groups `1,000`; 2 leaves `1000` and groups `10.000`.
    pub min_grouping_digits: usize,
    pub symbol_placement: SymbolPlacement,
}

impl NumberFormat {
    /// `1,234.56`
    pub const fn point_comma(symbol_placement: SymbolPlacement) -> Self {
        Self {
            decimal_separator: '.',
            group_separator: ',',
            min_grouping_digits: 1,
            symbol_placement,
        }
    }

    /// `1.234,56`
    pub const fn comma_point(symbol_placement: SymbolPlacement) -> Self {
        Self {
            decimal_separator: ',',
            group_separator: '.',
            min_grouping_digits: 1,
            symbol_placement,
        }
    }

    /// Only group integer parts of `3 + digits` or more.
    pub const fn with_min_grouping(self, digits: usize) -> Self {
        Self {
            min_grouping_digits: digits,
            ..self
        }
    }

    /// Render `value` with exactly `fraction_digits` decimals, half away from zero.
    pub fn format(&self, value: Decimal, fraction_digits: u32) -> String {
        let (negative, digits) = self.format_unsigned(value, fraction_digits);
        if negative {
            format!("-{digits}")
        } else {
            digits
        }
    }

    /// Render a currency amount with `symbol` placed per this locale.
    pub fn format_currency(&self, value: Decimal, fraction_digits: u32, symbol: &str) -> String {
        let (negative, digits) = self.format_unsigned(value, fraction_digits);
        let sign = if negative { "-" } else { "" };

        match self.symbol_placement {
            SymbolPlacement::Prefix => format!("{sign}{symbol}{digits}"),
            SymbolPlacement::PrefixSpaced => format!("{sign}{symbol} {digits}"),
            SymbolPlacement::SuffixSpaced => format!("{sign}{digits} {symbol}"),
        }
    }

    /// Sign flag plus the grouped magnitude. Values that round to zero are
    /// never negative.
    fn format_unsigned(&self, value: Decimal, fraction_digits: u32) -> (bool, String) {
        let mut rounded =
            value.round_dp_with_strategy(fraction_digits, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(fraction_digits);

        let negative = rounded.is_sign_negative() && !rounded.is_zero();
        let plain = rounded.abs().to_string();

        let (integer, fraction) = match plain.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (plain.as_str(), None),
        };

        let mut out = self.group(integer);
        if let Some(fraction) = fraction {
            out.push(self.decimal_separator);
            out.push_str(fraction);
        }

        (negative, out)
    }

    fn group(&self, integer: &str) -> String {
        let len = integer.len();
        if len < 3 + self.min_grouping_digits.max(1) {
            return integer.to_string();
        }

        let mut out = String::with_capacity(len + len / 3);
        for (i, ch) in integer.chars().enumerate() {
            if i > 0 && (len - i) % 3 == 0 {
                out.push(self.group_separator);
            }
            out.push(ch);
        }
        out
    }
}
