//! Rate table caching with freshness windows.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Duration;
use dashmap::DashMap;
use fxview_common::{Currency, RateTable, SharedClock, Timestamp};
use tracing::{debug, instrument};

use crate::source::RateSource;

/// How a lookup was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateOrigin {
    /// Provider answered; table is live.
    Fetched,
    /// Provider failed; built-in table substituted.
    Fallback,
    /// Served from cache without touching the source.
    CacheHit { fallback: bool },
}

impl RateOrigin {
    /// Whether the table behind this origin came from the built-in set.
    pub fn is_fallback(&self) -> bool {
        matches!(self, RateOrigin::Fallback | RateOrigin::CacheHit { fallback: true })
    }
}

/// Result of `RateCache::get`.
#[derive(Debug, Clone)]
pub struct RateLookup {
    pub table: Arc<RateTable>,
    pub origin: RateOrigin,
    pub fetched_at: Timestamp,
}

/// Cached table entry.
#[derive(Debug, Clone)]
struct CacheEntry {
    table: Arc<RateTable>,
    fetched_at: Timestamp,
    fallback: bool,
}

impl CacheEntry {
    fn is_usable(&self, now: Timestamp, config: &RateCacheConfig) -> bool {
        let window = if self.fallback {
            config.fallback_window
        } else {
            config.freshness_window
        };
        now.signed_duration_since(self.fetched_at) < window
    }

    fn lookup(&self) -> RateLookup {
        RateLookup {
            table: Arc::clone(&self.table),
            origin: RateOrigin::CacheHit {
                fallback: self.fallback,
            },
            fetched_at: self.fetched_at,
        }
    }
}

/// Configuration for rate cache.
#[derive(Debug, Clone)]
pub struct RateCacheConfig {
    /// Lifetime of a live table.
    pub freshness_window: Duration,
    /// Lifetime of a fallback-sourced table.
    pub fallback_window: Duration,
}

impl Default for RateCacheConfig {
    fn default() -> Self {
        Self {
            freshness_window: Duration::hours(1),
            fallback_window: Duration::minutes(15),
        }
    }
}

/// Per-base cache in front of a `RateSource`.
///
/// Entries are replaced whole; concurrent misses each hit the source and the
/// last write wins.
pub struct RateCache {
    source: RateSource,
    entries: DashMap<Currency, CacheEntry>,
    clock: SharedClock,
    config: RateCacheConfig,
    fetches: AtomicU64,
}

impl RateCache {
    /// Create a new rate cache with default windows.
    pub fn new(source: RateSource, clock: SharedClock) -> Self {
        Self::with_config(source, clock, RateCacheConfig::default())
    }

    /// Create a new rate cache with custom configuration.
    pub fn with_config(source: RateSource, clock: SharedClock, config: RateCacheConfig) -> Self {
        Self {
            source,
            entries: DashMap::new(),
            clock,
            config,
            fetches: AtomicU64::new(0),
        }
    }

    /// Table for `base`, from cache when usable unless `force_refresh`.
    #[instrument(skip(self, base), fields(base = %base))]
    pub async fn get(&self, base: &Currency, force_refresh: bool) -> RateLookup {
        if !force_refresh {
            if let Some(hit) = self.peek(base) {
                debug!(fallback = hit.origin.is_fallback(), "Cache hit");
                return hit;
            }
            debug!("Cache miss");
        }

        let sourced = self.source.fetch_rates(base).await;
        self.fetches.fetch_add(1, Ordering::Relaxed);

        let entry = CacheEntry {
            table: Arc::new(sourced.table),
            fetched_at: self.clock.now(),
            fallback: sourced.fallback,
        };
        self.entries.insert(base.clone(), entry.clone());

        RateLookup {
            table: entry.table,
            origin: if entry.fallback {
                RateOrigin::Fallback
            } else {
                RateOrigin::Fetched
            },
            fetched_at: entry.fetched_at,
        }
    }

    /// Usable cached table for `base`, without fetching. Drops it if expired.
    pub fn peek(&self, base: &Currency) -> Option<RateLookup> {
        let now = self.clock.now();

        if let Some(entry) = self.entries.get(base) {
            if entry.is_usable(now, &self.config) {
                return Some(entry.lookup());
            }
        }

        // Re-checked under the shard lock so a concurrent refresh survives.
        if self
            .entries
            .remove_if(base, |_, entry| !entry.is_usable(now, &self.config))
            .is_some()
        {
            debug!(base = %base, "Cache entry expired");
        }

        None
    }

    /// Whether `get(base, false)` would be answered without a fetch.
    pub fn is_usable(&self, base: &Currency) -> bool {
        let now = self.clock.now();
        self.entries
            .get(base)
            .map(|e| e.is_usable(now, &self.config))
            .unwrap_or(false)
    }

    /// Remove a table, forcing the next `get` to fetch.
    pub fn invalidate(&self, base: &Currency) {
        self.entries.remove(base);
    }

    /// Clear all cached tables.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Get the number of entries in cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Evict expired entries.
    pub fn evict_expired(&self) {
        let now = self.clock.now();
        self.entries.retain(|_, entry| entry.is_usable(now, &self.config));
    }

    /// Get cache statistics.
    pub fn stats(&self) -> CacheStats {
        let now = self.clock.now();
        let mut stats = CacheStats {
            total_entries: self.entries.len(),
            fetches: self.fetches.load(Ordering::Relaxed),
            ..Default::default()
        };

        for entry in self.entries.iter() {
            match (entry.is_usable(now, &self.config), entry.fallback) {
                (true, false) => stats.fresh_entries += 1,
                (true, true) => stats.fallback_entries += 1,
                (false, _) => stats.expired_entries += 1,
            }
        }

        stats
    }

}

/// Cache statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub total_entries: usize,
    pub fresh_entries: usize,
    pub fallback_entries: usize,
    pub expired_entries: usize,
    /// Source round trips since creation.
    pub fetches: u64,
}

/// Shared rate cache.
pub type SharedRateCache = Arc<RateCache>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FxError;
    use crate::provider::MockQuoteProvider;
    use fxview_common::ManualClock;
    use rust_decimal_macros::dec;

    fn setup() -> (Arc<MockQuoteProvider>, Arc<ManualClock>, RateCache) {
        let provider = Arc::new(MockQuoteProvider::new("test"));
        provider.set_table(RateTable::new(
            Currency::brl(),
            vec![(Currency::usd(), dec!(0.20)), (Currency::eur(), dec!(0.18))],
        ));
        let clock = Arc::new(ManualClock::starting_now());
        let cache = RateCache::new(RateSource::new(provider.clone()), clock.clone());
        (provider, clock, cache)
    }

    #[tokio::test]
    async fn test_second_get_within_window_is_cache_hit() {
        let (provider, clock, cache) = setup();

        let first = cache.get(&Currency::brl(), false).await;
        clock.advance(Duration::minutes(59));
        let second = cache.get(&Currency::brl(), false).await;

        assert_eq!(first.origin, RateOrigin::Fetched);
        assert_eq!(second.origin, RateOrigin::CacheHit { fallback: false });
        assert!(Arc::ptr_eq(&first.table, &second.table));
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_force_refresh_always_fetches() {
        let (provider, _clock, cache) = setup();

        cache.get(&Currency::brl(), false).await;
        let forced = cache.get(&Currency::brl(), true).await;

        assert_eq!(forced.origin, RateOrigin::Fetched);
        assert_eq!(provider.calls(), 2);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_entry_expires_after_freshness_window() {
        let (provider, clock, cache) = setup();

        cache.get(&Currency::brl(), false).await;
        clock.advance(Duration::hours(1));

        assert!(!cache.is_usable(&Currency::brl()));
        let again = cache.get(&Currency::brl(), false).await;

        assert_eq!(again.origin, RateOrigin::Fetched);
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_provider_failure_returns_fallback_table() {
        let (provider, _clock, cache) = setup();
        provider.fail_with(FxError::Transport("unreachable".into()));

        let lookup = cache.get(&Currency::brl(), false).await;

        assert_eq!(lookup.origin, RateOrigin::Fallback);
        assert!(lookup.table.len() > 1);
        assert_eq!(lookup.table.rate_to(&Currency::brl()), Some(dec!(1)));
    }

    #[tokio::test]
    async fn test_fallback_entry_uses_shorter_window() {
        let (provider, clock, cache) = setup();
        provider.fail_with(FxError::HttpStatus(503));

        cache.get(&Currency::brl(), false).await;
        clock.advance(Duration::minutes(14));
        let hit = cache.get(&Currency::brl(), false).await;
        assert_eq!(hit.origin, RateOrigin::CacheHit { fallback: true });
        assert_eq!(provider.calls(), 1);

        provider.recover();
        clock.advance(Duration::minutes(1));
        let refetched = cache.get(&Currency::brl(), false).await;

        assert_eq!(refetched.origin, RateOrigin::Fetched);
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_invalidate_forces_fetch() {
        let (provider, _clock, cache) = setup();

        cache.get(&Currency::brl(), false).await;
        cache.invalidate(&Currency::brl());
        assert!(cache.peek(&Currency::brl()).is_none());

        cache.get(&Currency::brl(), false).await;
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_refresh_replaces_whole_table() {
        let (provider, _clock, cache) = setup();

        cache.get(&Currency::brl(), false).await;
        provider.set_table(RateTable::new(Currency::brl(), vec![(Currency::usd(), dec!(0.21))]));
        let replaced = cache.get(&Currency::brl(), true).await;

        assert_eq!(replaced.table.rate_to(&Currency::usd()), Some(dec!(0.21)));
        assert!(replaced.table.rate_to(&Currency::eur()).is_none());
    }

    #[tokio::test]
    async fn test_concurrent_misses_each_fetch() {
        let (provider, _clock, cache) = setup();
        provider.set_delay(std::time::Duration::from_millis(20));

        let brl = Currency::brl();
        let (a, b) = tokio::join!(cache.get(&brl, false), cache.get(&brl, false));

        assert_eq!(a.origin, RateOrigin::Fetched);
        assert_eq!(b.origin, RateOrigin::Fetched);
        assert_eq!(provider.calls(), 2);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_peek_drops_only_expired_entries() {
        let (_provider, clock, cache) = setup();

        cache.get(&Currency::brl(), false).await;
        clock.advance(Duration::minutes(61));
        assert!(cache.peek(&Currency::brl()).is_none());
        assert!(cache.is_empty());

        cache.get(&Currency::brl(), false).await;
        assert!(cache.peek(&Currency::brl()).is_some());
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_stats_and_eviction() {
        let (provider, clock, cache) = setup();

        cache.get(&Currency::brl(), false).await;
        provider.fail_with(FxError::Malformed("eof".into()));
        cache.get(&Currency::usd(), false).await;

        let stats = cache.stats();
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.fresh_entries, 1);
        assert_eq!(stats.fallback_entries, 1);
        assert_eq!(stats.fetches, 2);

        clock.advance(Duration::minutes(30));
        assert_eq!(cache.stats().expired_entries, 1);

        cache.evict_expired();
        assert_eq!(cache.len(), 1);
        assert!(cache.is_usable(&Currency::brl()));
    }
}
