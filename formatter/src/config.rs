//! Formatter configuration.

use std::time::Duration;

use fxview_common::Currency;
use fxview_fx::RateCacheConfig;

/// Main formatter configuration.
#[derive(Debug, Clone)]
pub struct FormatterConfig {
    /// Currency refreshes are keyed by.
    pub base_currency: Currency,
    /// UI language before the display layer reports one.
    pub default_language: String,
    /// Quote endpoint; the base code is appended as a path segment.
    pub quote_url: String,
    /// Per-request timeout. `None` leaves it to the transport.
    pub request_timeout: Option<Duration>,
    /// Cache windows.
    pub cache: RateCacheConfig,
    /// Log level.
    pub log_level: String,
    /// Emit JSON log lines.
    pub log_json: bool,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            base_currency: Currency::brl(),
            default_language: "pt".to_string(),
            quote_url: "http://localhost:8000/api/exchange-rates".to_string(),
            request_timeout: None,
            cache: RateCacheConfig::default(),
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

impl FormatterConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(code) = std::env::var("FXVIEW_BASE_CURRENCY") {
            config.base_currency = Currency::new(code.trim());
        }

        if let Ok(language) = std::env::var("FXVIEW_LANGUAGE") {
            config.default_language = language;
        }

        if let Ok(url) = std::env::var("FXVIEW_QUOTE_URL") {
            config.quote_url = url;
        }

        if let Ok(ms) = std::env::var("FXVIEW_REQUEST_TIMEOUT_MS") {
            if let Ok(ms) = ms.parse() {
                config.request_timeout = Some(Duration::from_millis(ms));
            }
        }

        if let Ok(secs) = std::env::var("FXVIEW_FRESHNESS_SECS") {
            if let Ok(secs) = secs.parse() {
                config.cache.freshness_window = chrono::Duration::seconds(secs);
            }
        }

        if let Ok(secs) = std::env::var("FXVIEW_FALLBACK_SECS") {
            if let Ok(secs) = secs.parse() {
                config.cache.fallback_window = chrono::Duration::seconds(secs);
            }
        }

        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.log_level = level;
        }

        if let Ok(json) = std::env::var("FXVIEW_LOG_JSON") {
            config.log_json = matches!(json.as_str(), "1" | "true" | "yes");
        }

        config
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        Currency::parse(self.base_currency.code()).map_err(|e| e.to_string())?;

        if self.quote_url.is_empty() {
            return Err("Quote URL cannot be empty".to_string());
        }

        if !self.quote_url.starts_with("http://") && !self.quote_url.starts_with("https://") {
            return Err(format!("Quote URL must be http(s): {}", self.quote_url));
        }

        if self.cache.freshness_window <= chrono::Duration::zero()
            || self.cache.fallback_window <= chrono::Duration::zero()
        {
            return Err("Cache windows must be positive".to_string());
        }

        if self.cache.fallback_window > self.cache.freshness_window {
            return Err("Fallback window cannot exceed freshness window".to_string());
        }

        if self.request_timeout == Some(Duration::ZERO) {
            return Err("Request timeout cannot be 0".to_string());
        }

        Ok(())
    }
}
