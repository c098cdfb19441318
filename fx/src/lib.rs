//! FxView rate engine
//!
//! Fetches exchange rate tables, caches them per base currency, and falls
//! back to built-in tables whenever the quote provider cannot be used.
//!
//! # Features
//!
//! - Pluggable quote providers behind [`QuoteProvider`]
//! - One attempt per fetch, static fallback on any provider error
//! - Per-base cache with separate live and fallback freshness windows
//! - Injectable clock for deterministic freshness tests
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use fxview_common::{system_clock, Currency};
//! use fxview_fx::{HttpQuoteProvider, RateCache, RateSource};
//!
//! let provider = Arc::new(HttpQuoteProvider::new("https://quotes.example/latest"));
//! let cache = RateCache::new(RateSource::new(provider), system_clock());
//!
//! let lookup = cache.get(&Currency::brl(), false).await;
//! println!("{:?} {:?}", lookup.origin, lookup.table.rate_to(&Currency::usd()));
//! ```

pub mod provider;
pub mod transport;
pub mod fallback;
pub mod source;
pub mod cache;
pub mod conversion;
pub mod error;

pub use provider::{HttpQuoteProvider, QuoteProvider};
#[cfg(any(test, feature = "test-utils"))]
pub use provider::MockQuoteProvider;
pub use transport::{HttpResponse, ReqwestTransport, Transport};
pub use fallback::FallbackTables;
pub use source::{RateSource, SourcedTable};
pub use cache::{CacheStats, RateCache, RateCacheConfig, RateLookup, RateOrigin, SharedRateCache};
pub use conversion::{Conversion, IdentityReason};
pub use error::{FxError, FxResult};
