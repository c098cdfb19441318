//! Currency formatter: the display layer's entry point.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{DateTime, TimeZone};
use fxview_common::{system_clock, Currency, Money, SharedClock, Timestamp};
use fxview_fx::{
    Conversion, HttpQuoteProvider, RateCache, RateLookup, RateOrigin, RateSource, ReqwestTransport,
    SharedRateCache,
};
use fxview_locale::{LocaleProfile, LocaleRegistry};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::config::FormatterConfig;

/// Read-only snapshot for a status display.
#[derive(Debug, Clone, Serialize)]
pub struct FormatterStatus {
    /// A fetch is in flight.
    pub loading: bool,
    /// When the last fetch completed.
    pub last_update: Option<Timestamp>,
    /// A usable table exists for the base currency.
    pub has_rates: bool,
    /// Origin of the last fetched table; `Fallback` means degraded.
    #[serde(skip)]
    pub last_origin: Option<RateOrigin>,
}

#[derive(Debug, Default)]
struct RefreshState {
    last_update: Option<Timestamp>,
    last_origin: Option<RateOrigin>,
}

/// Marks a fetch as in flight for as long as it lives.
struct LoadingGuard<'a>(&'a AtomicUsize);

impl<'a> LoadingGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Converts and renders amounts for the active UI language.
pub struct CurrencyFormatter {
    cache: SharedRateCache,
    registry: LocaleRegistry,
    clock: SharedClock,
    base_currency: Currency,
    language: RwLock<String>,
    state: RwLock<RefreshState>,
    in_flight: AtomicUsize,
}

impl CurrencyFormatter {
    /// Create a formatter over an existing cache.
    pub fn new(
        cache: SharedRateCache,
        registry: LocaleRegistry,
        clock: SharedClock,
        config: &FormatterConfig,
    ) -> Self {
        Self {
            cache,
            registry,
            clock,
            base_currency: config.base_currency.clone(),
            language: RwLock::new(config.default_language.clone()),
            state: RwLock::new(RefreshState::default()),
            in_flight: AtomicUsize::new(0),
        }
    }

    /// Wire the production stack: reqwest transport, HTTP provider, built-in
    /// fallback tables, wall clock.
    pub fn from_config(config: &FormatterConfig) -> Self {
        let mut transport = ReqwestTransport::new();
        if let Some(timeout) = config.request_timeout {
            transport = transport.with_timeout(timeout);
        }

        let provider = Arc::new(HttpQuoteProvider::with_transport(
            config.quote_url.clone(),
            Arc::new(transport),
        ));
        let clock = system_clock();
        let cache = Arc::new(RateCache::with_config(
            RateSource::new(provider),
            clock.clone(),
            config.cache.clone(),
        ));

        Self::new(cache, LocaleRegistry::builtin(), clock, config)
    }

    /// Switch the active UI language. Returns the profile it resolved to.
    pub fn set_language(&self, language: &str) -> LocaleProfile {
        let profile = self.registry.resolve(language);
        let previous = std::mem::replace(&mut *self.language.write(), language.to_string());

        if self.registry.resolve(&previous) != profile {
            info!(
                language,
                locale = profile.locale_tag,
                currency = profile.currency_code,
                "Active locale changed"
            );
        }

        profile
    }

    /// The language code last reported by the display layer.
    pub fn active_language(&self) -> String {
        self.language.read().clone()
    }

    /// Profile for the active language.
    pub fn active_profile(&self) -> LocaleProfile {
        self.registry.resolve(&self.language.read())
    }

    /// Convert into the active locale's currency.
    pub async fn convert(&self, amount: Decimal, source: &Currency) -> Conversion {
        let profile = self.active_profile();
        self.convert_for(&profile, amount, source).await
    }

    /// Convert and render in the active locale. Never fails; a missing rate
    /// shows the unconverted value in the locale's currency.
    #[instrument(skip(self, source), fields(source = %source))]
    pub async fn format_amount(&self, amount: Decimal, source: &Currency) -> String {
        let profile = self.active_profile();
        let conversion = self.convert_for(&profile, amount, source).await;

        if !conversion.rate_applied() {
            debug!(
                target_currency = profile.currency_code,
                reason = ?conversion.identity,
                "Rendering without conversion"
            );
        }

        profile.format_currency(conversion.output.value)
    }

    /// Force a fetch for the base currency and stamp the update time.
    #[instrument(skip(self), fields(base = %self.base_currency))]
    pub async fn refresh(&self) -> RateOrigin {
        let lookup = self.lookup(&self.base_currency, true).await;
        info!(origin = ?lookup.origin, quoted = lookup.table.len(), "Rates refreshed");
        lookup.origin
    }

    /// Loading flag, last update and rate availability.
    pub fn status(&self) -> FormatterStatus {
        let state = self.state.read();
        FormatterStatus {
            loading: self.in_flight.load(Ordering::SeqCst) > 0,
            last_update: state.last_update,
            has_rates: self.cache.is_usable(&self.base_currency),
            last_origin: state.last_origin,
        }
    }

    /// Plain number in the active locale.
    pub fn format_number(&self, value: Decimal, fraction_digits: u32) -> String {
        self.active_profile().format_number(value, fraction_digits)
    }

    /// Amount in its own currency, with the active locale's separators.
    pub fn format_money(&self, money: &Money) -> String {
        self.active_profile().format_money(money)
    }

    pub fn format_date<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> String
    where
        Tz::Offset: fmt::Display,
    {
        self.active_profile().format_date(at)
    }

    pub fn format_time<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> String
    where
        Tz::Offset: fmt::Display,
    {
        self.active_profile().format_time(at)
    }

    /// Currency refreshes are keyed by.
    pub fn base_currency(&self) -> &Currency {
        &self.base_currency
    }

    /// Languages with a dedicated profile.
    pub fn supported_languages(&self) -> Vec<&'static str> {
        self.registry.supported_languages()
    }

    /// The cache behind this formatter.
    pub fn cache(&self) -> &SharedRateCache {
        &self.cache
    }

    async fn convert_for(&self, profile: &LocaleProfile, amount: Decimal, source: &Currency) -> Conversion {
        let lookup = self.lookup(source, false).await;
        Conversion::apply(Money::new(amount, source.clone()), &profile.currency(), &lookup)
    }

    /// Cache hit without side effects, otherwise a fetch under the loading flag.
    async fn lookup(&self, base: &Currency, force_refresh: bool) -> RateLookup {
        if !force_refresh {
            if let Some(hit) = self.cache.peek(base) {
                return hit;
            }
        }

        let lookup = {
            let _loading = LoadingGuard::enter(&self.in_flight);
            self.cache.get(base, true).await
        };

        let mut state = self.state.write();
        state.last_update = Some(self.clock.now());
        state.last_origin = Some(lookup.origin);
        drop(state);

        lookup
    }
}
