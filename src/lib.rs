//! Sentry envelope tunnel library.
//!
//! Accepts Sentry envelopes on a first-party endpoint, checks the DSN in the
//! envelope header against an allow-list, and relays the untouched envelope
//! to `{scheme}://{host}/api/{project}/envelope/`, streaming the upstream
//! response back.

// Core
pub mod tunnel;
pub mod upstream;

// Serving
pub mod config;
pub mod http;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::TunnelConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use tunnel::{Dsn, TunnelError, TunnelPolicy};
