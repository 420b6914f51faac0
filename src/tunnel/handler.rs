//! The tunnel endpoint.
//!
//! # Data Flow
//! ```text
//! POST <path>  (header line \n payload...)
//!     → method / body presence checks
//!     → buffer body (bounded)
//!     → EnvelopeHeader from first line → Dsn → TunnelPolicy
//!     → POST {scheme}://{host}/api/{project}/envelope/  (full body)
//!     → upstream status + streamed body back to the caller
//! ```

use std::time::Instant;

use axum::{
    body::{Body, Bytes, HttpBody},
    extract::{Request, State},
    http::{header, HeaderMap, Method},
    response::{IntoResponse, Response},
};
use futures_util::TryStreamExt;
use http_body_util::LengthLimitError;

use crate::http::server::AppState;
use crate::http::X_REQUEST_ID;
use crate::observability::metrics;
use crate::tunnel::dsn::Dsn;
use crate::tunnel::envelope::EnvelopeHeader;
use crate::tunnel::error::TunnelError;

/// Axum handler mounted on the tunnel path for every method.
pub async fn tunnel_handler(State(state): State<AppState>, request: Request) -> Response {
    let start_time = Instant::now();
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    match forward_envelope(&state, request, &request_id).await {
        Ok(response) => {
            metrics::record_request("forwarded", start_time);
            response
        }
        Err(err) => {
            if err.is_server_error() {
                match std::error::Error::source(&err) {
                    Some(cause) => tracing::error!(
                        request_id = %request_id,
                        outcome = err.outcome(),
                        error = %cause,
                        "{}", err
                    ),
                    None => tracing::error!(request_id = %request_id, outcome = err.outcome(), "{}", err),
                }
            } else {
                tracing::warn!(
                    request_id = %request_id,
                    outcome = err.outcome(),
                    reason = %err,
                    "Envelope rejected"
                );
            }
            metrics::record_request(err.outcome(), start_time);
            err.into_response()
        }
    }
}

/// Validate the envelope and relay it. Each check short-circuits the rest.
async fn forward_envelope(
    state: &AppState,
    request: Request,
    request_id: &str,
) -> Result<Response, TunnelError> {
    if request.method() != Method::POST {
        return Err(TunnelError::MethodNotAllowed);
    }

    if !has_body(&request) {
        return Err(TunnelError::MissingBody);
    }

    let body = read_body(request.into_body(), state.max_body_bytes).await?;

    let header = EnvelopeHeader::from_envelope(&body)?;
    let dsn = Dsn::parse(&header.dsn)?;
    state.policy.check(&dsn)?;

    let upstream_url = dsn.envelope_url();
    tracing::debug!(
        request_id = %request_id,
        dsn = %dsn,
        upstream = %upstream_url,
        bytes = body.len(),
        "Forwarding envelope"
    );

    let upstream_start = Instant::now();
    let upstream = state.upstream.send_envelope(&upstream_url, body).await?;
    let status = upstream.status();
    metrics::record_upstream(status.as_u16(), upstream_start);

    tracing::debug!(
        request_id = %request_id,
        status = %status,
        "Upstream responded"
    );

    let content_type = upstream.headers().get(header::CONTENT_TYPE).cloned();
    let stream_request_id = request_id.to_string();
    let stream = upstream.bytes_stream().inspect_err(move |e| {
        tracing::error!(
            request_id = %stream_request_id,
            error = %e,
            "Error copying response body"
        );
    });

    let mut response = Response::new(Body::from_stream(stream));
    *response.status_mut() = status;
    if let Some(content_type) = content_type {
        response.headers_mut().insert(header::CONTENT_TYPE, content_type);
    }
    Ok(response)
}

/// Whether the request carries a body at all, as opposed to an empty one.
fn has_body(request: &Request) -> bool {
    declares_body(request.headers()) || request.body().size_hint().exact() != Some(0)
}

fn declares_body(headers: &HeaderMap) -> bool {
    headers.contains_key(header::CONTENT_LENGTH) || headers.contains_key(header::TRANSFER_ENCODING)
}

async fn read_body(body: Body, limit: usize) -> Result<Bytes, TunnelError> {
    axum::body::to_bytes(body, limit).await.map_err(|e| {
        let inner = e.into_inner();
        if inner.is::<LengthLimitError>() {
            TunnelError::BodyTooLarge
        } else {
            TunnelError::BodyRead(inner)
        }
    })
}

/// Liveness probe.
pub async fn health_handler() -> impl IntoResponse {
    "OK"
}
