//! Startup orchestration.
//!
//! # Responsibilities
//! - Summarize the effective configuration in the log
//! - Bind the listener
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Open allow-lists are logged as warnings, not refused

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::TunnelConfig;

/// Error type for startup operations.
#[derive(Debug, Error)]
pub enum StartupError {
    /// Failed to bind to address.
    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// Log what the tunnel will accept and where it listens.
pub fn log_config_summary(config: &TunnelConfig) {
    match &config.policy.sentry_host {
        Some(host) => tracing::info!(sentry_host = %host, "Required Sentry host"),
        None => tracing::warn!(
            "Allow all Sentry hosts (not recommended, please use 'SENTRY_HOST'-env)"
        ),
    }

    if config.policy.project_ids.is_empty() {
        tracing::warn!("Allow all project ids (not recommended, please use 'SENTRY_PROJECT_IDS'-env)");
    } else {
        tracing::info!(
            project_ids = %config.policy.project_ids.join(","),
            "Allowed Sentry projects"
        );
    }

    tracing::info!(
        bind_address = %config.listener.bind_address(),
        path = %config.listener.path,
        health_path = %config.listener.health_path,
        max_body_bytes = config.limits.max_body_bytes,
        upstream_timeout_secs = config.upstream.timeout_secs,
        "Configuration loaded"
    );
}

/// Bind the configured TCP address.
pub async fn bind_listener(config: &TunnelConfig) -> Result<TcpListener, StartupError> {
    let address = config.listener.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.clone(),
            source,
        })?;

    if let Ok(local_addr) = listener.local_addr() {
        tracing::info!(address = %local_addr, "Listening for connections");
    }
    Ok(listener)
}
