//! Built-in approximate rate tables used when the provider is unavailable.

use std::collections::HashMap;

use fxview_common::{Currency, RateTable};
use rust_decimal::Decimal;

/// Static tables keyed by base currency.
///
/// Values are approximations and drift from the market over time.
#[derive(Debug, Clone)]
pub struct FallbackTables {
    tables: HashMap<Currency, RateTable>,
    default_base: Currency,
}

fn table(base: &str, rates: &[(&str, i64, u32)]) -> RateTable {
    RateTable::new(
        Currency::new(base),
        rates
            .iter()
            .map(|(code, mantissa, scale)| (Currency::new(*code), Decimal::new(*mantissa, *scale))),
    )
}

impl FallbackTables {
    /// The built-in set: BRL (default), USD and EUR.
    pub fn builtin() -> Self {
        let brl = table(
            "BRL",
            &[("USD", 20, 2), ("EUR", 18, 2), ("GBP", 16, 2), ("JPY", 2950, 2)],
        );
        let usd = table(
            "USD",
            &[("BRL", 500, 2), ("EUR", 92, 2), ("GBP", 79, 2), ("JPY", 14750, 2)],
        );
        let eur = table(
            "EUR",
            &[("BRL", 545, 2), ("USD", 109, 2), ("GBP", 86, 2), ("JPY", 16100, 2)],
        );

        Self::new(Currency::brl(), vec![brl, usd, eur])
    }

    /// Custom set. `default_base` should be one of the tables' bases.
    pub fn new(default_base: Currency, tables: Vec<RateTable>) -> Self {
        Self {
            tables: tables.into_iter().map(|t| (t.base().clone(), t)).collect(),
            default_base,
        }
    }

    /// Table for `base`. Unknown bases are derived from the default table by
    /// cross rate, or get the identity table when even that is impossible.
    pub fn table_for(&self, base: &Currency) -> RateTable {
        if let Some(table) = self.tables.get(base) {
            return table.clone();
        }

        self.tables
            .get(&self.default_base)
            .and_then(|default| default.rebased(base))
            .unwrap_or_else(|| RateTable::identity(base.clone()))
    }
}

impl Default for FallbackTables {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_builtin_tables_quote_their_base() {
        let tables = FallbackTables::builtin();
        for base in [Currency::brl(), Currency::usd(), Currency::eur()] {
            let table = tables.table_for(&base);
            assert_eq!(table.base(), &base);
            assert_eq!(table.rate_to(&base), Some(Decimal::ONE));
            assert!(table.len() > 1);
        }
        assert_eq!(
            tables.table_for(&Currency::brl()).rate_to(&Currency::usd()),
            Some(dec!(0.20))
        );
    }

    #[test]
    fn test_unknown_base_rebased_from_default() {
        let tables = FallbackTables::builtin();

        let gbp = tables.table_for(&Currency::gbp());

        assert_eq!(gbp.base(), &Currency::gbp());
        assert_eq!(gbp.rate_to(&Currency::gbp()), Some(Decimal::ONE));
        assert_eq!(gbp.rate_to(&Currency::usd()), Some(dec!(1.25)));
    }

    #[test]
    fn test_unquoted_base_gets_identity() {
        let tables = FallbackTables::builtin();
        let xyz = tables.table_for(&Currency::new("XYZ"));

        assert_eq!(xyz.len(), 1);
        assert!(xyz.rate_to(&Currency::usd()).is_none());
    }
}
