//! HTTP transport used by the quote provider.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::{FxError, FxResult};

/// Raw HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Something that can perform a GET.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> FxResult<HttpResponse>;
}

/// reqwest-backed transport.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    timeout: Option<Duration>,
}

impl ReqwestTransport {
    /// Transport with reqwest's defaults and no per-request timeout.
    pub fn new() -> Self {
        Self::with_client(
            reqwest::Client::builder()
                .user_agent(concat!("fxview/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        )
    }

    /// Wrap an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            timeout: None,
        }
    }

    /// Apply a per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &str) -> FxResult<HttpResponse> {
        let mut builder = self.client.get(url);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                FxError::Transport(format!("request timeout: {}", e))
            } else if e.is_connect() {
                FxError::Transport(format!("connection failed: {}", e))
            } else {
                FxError::Transport(format!("request failed: {}", e))
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| FxError::Transport(format!("failed to read response body: {}", e)))?;

        Ok(HttpResponse { status, body })
    }
}
