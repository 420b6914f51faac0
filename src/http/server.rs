//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the tunnel and health handlers
//! - Wire up middleware (tracing, request ID)
//! - Bind server to listener
//! - Graceful shutdown on broadcast signal

use std::sync::Arc;

use axum::{
    routing::{any, get},
    Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::TunnelConfig;
use crate::http::request::RequestIdLayers;
use crate::tunnel::handler::{health_handler, tunnel_handler};
use crate::tunnel::policy::TunnelPolicy;
use crate::upstream::UpstreamClient;

/// Error type for server construction and serving.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to build upstream client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub policy: Arc<TunnelPolicy>,
    pub upstream: UpstreamClient,
    pub max_body_bytes: usize,
}

impl AppState {
    pub fn from_config(config: &TunnelConfig) -> Result<Self, ServerError> {
        Ok(Self {
            policy: Arc::new(TunnelPolicy::from_config(&config.policy)),
            upstream: UpstreamClient::from_config(&config.upstream)?,
            max_body_bytes: config.limits.max_body_bytes,
        })
    }
}

/// HTTP server for the tunnel.
pub struct HttpServer {
    router: Router,
    config: TunnelConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: TunnelConfig) -> Result<Self, ServerError> {
        let state = AppState::from_config(&config)?;
        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &TunnelConfig, state: AppState) -> Router {
        let request_ids = RequestIdLayers::new();
        Router::new()
            .route(&config.listener.path, any(tunnel_handler))
            .route(&config.listener.health_path, get(health_handler))
            .with_state(state)
            .layer(request_ids.propagate)
            .layer(TraceLayer::new_for_http())
            .layer(request_ids.set)
    }

    /// The fully layered router, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            path = %self.config.listener.path,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
