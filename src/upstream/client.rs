//! Outbound HTTP client for the Sentry ingestion API.
//!
//! One pooled `reqwest::Client` is built at startup and cloned into every
//! request handler. Each inbound envelope produces exactly one outbound
//! attempt; there are no retries.

use std::time::Duration;

use axum::body::Bytes;

use crate::config::UpstreamConfig;
use crate::tunnel::error::TunnelError;

/// Shared handle to the upstream connection pool.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    inner: reqwest::Client,
}

impl UpstreamClient {
    /// Build the client with the configured timeouts.
    pub fn from_config(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs));
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        Ok(Self {
            inner: builder.build()?,
        })
    }

    /// POST a raw envelope to `url`.
    ///
    /// Build failures (bad URL, unsupported scheme) map to
    /// [`TunnelError::UpstreamRequest`]; anything that goes wrong once the
    /// request is in flight maps to [`TunnelError::Upstream`].
    pub async fn send_envelope(
        &self,
        url: &str,
        body: Bytes,
    ) -> Result<reqwest::Response, TunnelError> {
        let request = self
            .inner
            .post(url)
            .body(body)
            .build()
            .map_err(TunnelError::UpstreamRequest)?;

        self.inner
            .execute(request)
            .await
            .map_err(TunnelError::Upstream)
    }
}
