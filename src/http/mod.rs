//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, graceful shutdown)
//!     → request.rs (assign / propagate request ID)
//!     → tunnel::handler (validate, forward, stream back)
//!     → Send to client
//! ```

pub mod request;
pub mod server;

pub use request::{RequestIdLayers, X_REQUEST_ID};
pub use server::{AppState, HttpServer, ServerError};
