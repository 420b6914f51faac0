//! Request ID handling.
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - A caller-supplied `x-request-id` is kept; otherwise a UUID v4 is generated
//! - The same ID is echoed on the response

use axum::http::HeaderName;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

/// Header carrying the request ID.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// The pair of layers that assign and echo request IDs.
///
/// `set` must wrap everything else so the ID exists before tracing starts;
/// `propagate` sits inside it and copies the ID onto the response.
#[derive(Clone)]
pub struct RequestIdLayers {
    pub set: SetRequestIdLayer<MakeRequestUuid>,
    pub propagate: PropagateRequestIdLayer,
}

impl RequestIdLayers {
    pub fn new() -> Self {
        Self {
            set: SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid),
            propagate: PropagateRequestIdLayer::new(X_REQUEST_ID),
        }
    }
}

impl Default for RequestIdLayers {
    fn default() -> Self {
        Self::new()
    }
}
