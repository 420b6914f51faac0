//! Sentry envelope tunnel.
//!
//! ```text
//!     Browser / app                    sentry-tunnel                         Sentry
//!   ─────────────────┐       ┌───────────────────────────────────┐
//!   POST /tunnel     │──────▶│ method / body checks               │
//!   {"dsn":...}\n... │       │ envelope header → DSN → policy     │
//!                    │       │ POST {scheme}://{host}/api/{id}/   │────▶ envelope/
//!                    │◀──────│ status + streamed body             │◀──── response
//!   ─────────────────┘       └───────────────────────────────────┘
//! ```

use clap::Parser;

use sentry_tunnel::config::{load_config, TunnelArgs};
use sentry_tunnel::http::HttpServer;
use sentry_tunnel::lifecycle::{bind_listener, log_config_summary, Shutdown};
use sentry_tunnel::observability::{logging::init_logging, metrics::init_metrics};

#[tokio::main]
async fn main() {
    let args = TunnelArgs::parse();
    init_logging(args.log_format);

    tracing::info!("sentry-tunnel v{} starting", env!("CARGO_PKG_VERSION"));

    let config = match load_config(args) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            std::process::exit(2);
        }
    };

    log_config_summary(&config);

    if let Some(addr) = config.observability.metrics_address {
        if let Err(e) = init_metrics(addr) {
            tracing::error!(metrics_address = %addr, error = %e, "Failed to start metrics exporter");
        }
    }

    let listener = match bind_listener(&config).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, "Failed to start listener");
            std::process::exit(1);
        }
    };

    let server = match HttpServer::new(config) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(error = %e, "Failed to initialize server");
            std::process::exit(1);
        }
    };

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    if let Err(e) = server.run(listener, shutdown.subscribe()).await {
        tracing::error!(error = %e, "Server terminated");
        std::process::exit(1);
    }

    tracing::info!("Shutdown complete");
}
