//! Upstream (Sentry) connectivity.
//!
//! # Design Decisions
//! - Single process-wide client, safe for concurrent use
//! - Timeouts enforced by the client; a timeout is a transport error
//! - Caller disconnect drops the in-flight future, cancelling the request

pub mod client;

pub use client::UpstreamClient;
