//! Quote provider trait and implementations.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use fxview_common::{Currency, RateTable};
use serde::Deserialize;
use tracing::debug;

use crate::error::{FxError, FxResult};
use crate::transport::{ReqwestTransport, Transport};

/// Trait for remote sources of rate tables.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Get the provider name.
    fn name(&self) -> &str;

    /// Fetch the table quoted relative to `base`. One attempt, no retries.
    async fn fetch_table(&self, base: &Currency) -> FxResult<RateTable>;
}

/// Wire shape: `{"success": true, "rates": {"BRL": {"USD": 0.2}}}`.
#[derive(Debug, Deserialize)]
struct QuoteResponse {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    rates: HashMap<String, HashMap<String, f64>>,
}

/// Provider that reads `GET {endpoint}/{BASE}` JSON documents.
pub struct HttpQuoteProvider {
    endpoint: String,
    transport: Arc<dyn Transport>,
}

impl HttpQuoteProvider {
    /// Provider over the default reqwest transport.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_transport(endpoint, Arc::new(ReqwestTransport::new()))
    }

    /// Provider over a caller-supplied transport.
    pub fn with_transport(endpoint: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            transport,
        }
    }

    /// URL requested for `base`.
    pub fn url_for(&self, base: &Currency) -> String {
        format!("{}/{}", self.endpoint, base.code())
    }

    fn parse(base: &Currency, body: &str) -> FxResult<RateTable> {
        let parsed: QuoteResponse =
            serde_json::from_str(body).map_err(|e| FxError::Malformed(e.to_string()))?;

        if parsed.success != Some(true) {
            return Err(FxError::Rejected(
                parsed
                    .error
                    .unwrap_or_else(|| "success flag missing or false".to_string()),
            ));
        }

        let table = parsed
            .rates
            .into_iter()
            .find(|(code, _)| code.eq_ignore_ascii_case(base.code()))
            .map(|(_, table)| table)
            .ok_or_else(|| FxError::MissingBase(base.clone()))?;

        Ok(RateTable::from_f64(base.clone(), table))
    }
}

#[async_trait]
impl QuoteProvider for HttpQuoteProvider {
    fn name(&self) -> &str {
        "HTTP"
    }

    async fn fetch_table(&self, base: &Currency) -> FxResult<RateTable> {
        let url = self.url_for(base);
        let response = self.transport.get(&url).await?;

        if !response.is_success() {
            return Err(FxError::HttpStatus(response.status));
        }

        let table = Self::parse(base, &response.body)?;
        debug!(base = %base, quoted = table.len(), "Parsed provider table");
        Ok(table)
    }
}

/// Mock quote provider for testing.
#[cfg(any(test, feature = "test-utils"))]
pub struct MockQuoteProvider {
    name: String,
    tables: dashmap::DashMap<Currency, RateTable>,
    failure: parking_lot::Mutex<Option<FxError>>,
    calls: std::sync::atomic::AtomicUsize,
    delay: parking_lot::Mutex<Option<std::time::Duration>>,
}

#[cfg(any(test, feature = "test-utils"))]
impl MockQuoteProvider {
    /// Create a new mock provider.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tables: dashmap::DashMap::new(),
            failure: parking_lot::Mutex::new(None),
            calls: std::sync::atomic::AtomicUsize::new(0),
            delay: parking_lot::Mutex::new(None),
        }
    }

    /// Set the table served for its base.
    pub fn set_table(&self, table: RateTable) {
        self.tables.insert(table.base().clone(), table);
    }

    /// Make every call fail with `error` until cleared.
    pub fn fail_with(&self, error: FxError) {
        *self.failure.lock() = Some(error);
    }

    /// Stop failing.
    pub fn recover(&self) {
        *self.failure.lock() = None;
    }

    /// Sleep before answering.
    pub fn set_delay(&self, delay: std::time::Duration) {
        *self.delay.lock() = Some(delay);
    }

    /// Number of fetches seen so far.
    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl QuoteProvider for MockQuoteProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_table(&self, base: &Currency) -> FxResult<RateTable> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);

        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(error) = self.failure.lock().clone() {
            return Err(error);
        }

        self.tables
            .get(base)
            .map(|t| t.clone())
            .ok_or_else(|| FxError::MissingBase(base.clone()))
    }
}
