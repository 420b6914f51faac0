//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Tunnel handler produces:
//!     → logging.rs (structured log events, text or JSON)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every log line of a request
//! - Metrics are cheap and disabled unless an exporter address is configured

pub mod logging;
pub mod metrics;
