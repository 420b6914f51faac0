//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! environment / CLI flags
//!     → loader.rs (clap parse, normalize empties, parse hosts/addresses)
//!     → validation.rs (semantic checks)
//!     → TunnelConfig (validated, immutable)
//!     → shared via Arc to the request path
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup; changes require a restart
//! - All fields have defaults to allow an empty environment
//! - Validation separates syntactic (clap) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError, TunnelArgs};
pub use schema::{
    LimitsConfig, ListenerConfig, LogFormat, ObservabilityConfig, PolicyConfig, SentryHost,
    TunnelConfig, UpstreamConfig,
};
