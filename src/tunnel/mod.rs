//! Envelope tunneling.
//!
//! # Data Flow
//! ```text
//! raw envelope bytes
//!     → envelope.rs (first-line JSON header)
//!     → dsn.rs (scheme, host, project id)
//!     → policy.rs (allowed host / projects)
//!     → handler.rs (forward via upstream client, stream response)
//! ```
//!
//! # Design Decisions
//! - Validation order is fixed and each step short-circuits the rest
//! - The envelope is forwarded byte-for-byte, header line included
//! - Client errors name the offending value; server errors never leak detail

pub mod dsn;
pub mod envelope;
pub mod error;
pub mod handler;
pub mod policy;

pub use dsn::Dsn;
pub use envelope::EnvelopeHeader;
pub use error::TunnelError;
pub use policy::TunnelPolicy;
