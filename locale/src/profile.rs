//! Locale profiles.

use std::fmt;

use chrono::{DateTime, TimeZone};
use fxview_common::{Currency, Money};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::number::{NumberFormat, SymbolPlacement};

/// Currency and formatting conventions bound to one UI language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LocaleProfile {
    /// Primary language subtag, lower case (`pt`).
    pub language_code: &'static str,
    /// BCP 47 tag (`pt-BR`).
    pub locale_tag: &'static str,
    /// ISO 4217 code amounts are displayed in.
    pub currency_code: &'static str,
    pub currency_symbol: &'static str,
    /// chrono strftime pattern.
    pub date_format: &'static str,
    /// chrono strftime pattern.
    pub time_format: &'static str,
    pub number_format: NumberFormat,
}

/// `en`: US dollars, `$1,234.56`, `03/15/2024`, `3:45 PM`.
pub const ENGLISH: LocaleProfile = LocaleProfile {
    language_code: "en",
    locale_tag: "en-US",
    currency_code: "USD",
    currency_symbol: "$",
    date_format: "%m/%d/%Y",
    time_format: "%-I:%M %p",
    number_format: NumberFormat::point_comma(SymbolPlacement::Prefix),
};

/// `pt`: Brazilian reais, `R$ 1.234,56`, `15/03/2024`, `15:45`.
pub const PORTUGUESE: LocaleProfile = LocaleProfile {
    language_code: "pt",
    locale_tag: "pt-BR",
    currency_code: "BRL",
    currency_symbol: "R$",
    date_format: "%d/%m/%Y",
    time_format: "%H:%M",
    number_format: NumberFormat::comma_point(SymbolPlacement::PrefixSpaced),
};

/// `es`: euros, `1234,56 €`, `15/03/2024`, `15:45`.
pub const SPANISH: LocaleProfile = LocaleProfile {
    language_code: "es",
    locale_tag: "es-ES",
    currency_code: "EUR",
    currency_symbol: "€",
    date_format: "%d/%m/%Y",
    time_format: "%H:%M",
    number_format: NumberFormat::comma_point(SymbolPlacement::SuffixSpaced).with_min_grouping(2),
};

impl LocaleProfile {
    /// Display currency.
    pub fn currency(&self) -> Currency {
        Currency::new(self.currency_code)
    }

    /// Plain number with this locale's separators.
    pub fn format_number(&self, value: Decimal, fraction_digits: u32) -> String {
        self.number_format.format(value, fraction_digits)
    }

    /// Amount in this locale's currency, e.g. `R$ 100,00`.
    pub fn format_currency(&self, value: Decimal) -> String {
        self.number_format.format_currency(
            value,
            self.currency().decimal_places(),
            self.currency_symbol,
        )
    }

    /// Amount in its own currency, using this locale's separators. The
    /// profile symbol is used when the currency matches, the ISO code otherwise.
    pub fn format_money(&self, money: &Money) -> String {
        if money.currency.code() == self.currency_code {
            return self.format_currency(money.value);
        }
        self.number_format.format_currency(
            money.value,
            money.currency.decimal_places(),
            money.currency.code(),
        )
    }

    pub fn format_date<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> String
    where
        Tz::Offset: fmt::Display,
    {
        at.format(self.date_format).to_string()
    }

    pub fn format_time<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> String
    where
        Tz::Offset: fmt::Display,
    {
        at.format(self.time_format).to_string()
    }

    pub fn format_datetime<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> String
    where
        Tz::Offset: fmt::Display,
    {
        format!("{} {}", self.format_date(at), self.format_time(at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn sample_instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 15, 45, 0).unwrap()
    }

    #[test]
    fn test_currency_formatting_per_profile() {
        assert_eq!(ENGLISH.format_currency(dec!(200)), "$200.00");
        assert_eq!(PORTUGUESE.format_currency(dec!(100)), "R$ 100,00");
        assert_eq!(SPANISH.format_currency(dec!(12345.678)), "12.345,68 €");
    }

    #[test]
    fn test_format_money_foreign_currency_uses_code() {
        let yen = Money::new(dec!(1500), Currency::jpy());
        assert_eq!(ENGLISH.format_money(&yen), "JPY1,500");

        let dollars = Money::new(dec!(1500), Currency::usd());
        assert_eq!(ENGLISH.format_money(&dollars), "$1,500.00");
    }

    #[test]
    fn test_dates_and_times() {
        let at = sample_instant();

        assert_eq!(ENGLISH.format_date(&at), "03/15/2024");
        assert_eq!(ENGLISH.format_time(&at), "3:45 PM");
        assert_eq!(PORTUGUESE.format_date(&at), "15/03/2024");
        assert_eq!(PORTUGUESE.format_datetime(&at), "15/03/2024 15:45");
        assert_eq!(SPANISH.format_time(&at), "15:45");
    }

    #[test]
    fn test_number_formatting() {
        assert_eq!(ENGLISH.format_number(dec!(1234.5), 1), "1,234.5");
        assert_eq!(PORTUGUESE.format_number(dec!(1234.5), 1), "1.234,5");
    }
}
