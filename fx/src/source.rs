//! Rate source: one provider attempt, static tables on failure.

use std::sync::Arc;

use fxview_common::{Currency, RateTable};
use tracing::{debug, instrument, warn};

use crate::fallback::FallbackTables;
use crate::provider::QuoteProvider;

/// A table plus where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcedTable {
    pub table: RateTable,
    /// True when the built-in tables stood in for the provider.
    pub fallback: bool,
}

/// Produces a rate table for any base currency and never fails.
pub struct RateSource {
    provider: Arc<dyn QuoteProvider>,
    fallback: FallbackTables,
}

impl RateSource {
    /// Source backed by `provider` and the built-in fallback tables.
    pub fn new(provider: Arc<dyn QuoteProvider>) -> Self {
        Self::with_fallback(provider, FallbackTables::builtin())
    }

    /// Source with custom fallback tables.
    pub fn with_fallback(provider: Arc<dyn QuoteProvider>, fallback: FallbackTables) -> Self {
        Self { provider, fallback }
    }

    /// Fetch `base`, substituting the static table on any provider error.
    #[instrument(skip_all, fields(base = %base, provider = self.provider.name()))]
    pub async fn fetch_rates(&self, base: &Currency) -> SourcedTable {
        match self.provider.fetch_table(base).await {
            Ok(table) => {
                debug!(quoted = table.len(), "Fetched live rates");
                SourcedTable {
                    table,
                    fallback: false,
                }
            }
            Err(e) => {
                warn!(error = %e, "Rate provider failed, using fallback table");
                SourcedTable {
                    table: self.fallback.table_for(base),
                    fallback: true,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FxError;
    use crate::provider::MockQuoteProvider;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_live_table_passed_through() {
        let provider = Arc::new(MockQuoteProvider::new("test"));
        provider.set_table(RateTable::new(Currency::brl(), vec![(Currency::usd(), dec!(0.19))]));
        let source = RateSource::new(provider.clone());

        let sourced = source.fetch_rates(&Currency::brl()).await;

        assert!(!sourced.fallback);
        assert_eq!(sourced.table.rate_to(&Currency::usd()), Some(dec!(0.19)));
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_every_error_class_falls_back() {
        let errors = [
            FxError::Transport("unreachable".into()),
            FxError::HttpStatus(502),
            FxError::Malformed("eof".into()),
            FxError::Rejected("success=false".into()),
            FxError::MissingBase(Currency::brl()),
        ];

        for error in errors {
            let provider = Arc::new(MockQuoteProvider::new("test"));
            provider.fail_with(error.clone());
            let source = RateSource::new(provider.clone());

            let sourced = source.fetch_rates(&Currency::brl()).await;

            assert!(sourced.fallback, "{error}");
            assert_eq!(sourced.table, FallbackTables::builtin().table_for(&Currency::brl()));
            assert_eq!(provider.calls(), 1, "exactly one attempt for {error}");
        }
    }
}
