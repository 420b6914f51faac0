//! Errors raised on the tunnel request path.
//!
//! The `Display` text of each variant is exactly what the caller sees.
//! Underlying causes are kept as `#[source]` and only ever logged.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Everything that can stop an envelope from reaching the upstream.
#[derive(Debug, Error)]
pub enum TunnelError {
    /// Inbound method was not `POST`.
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Request carried no body at all.
    #[error("Request body is missing")]
    MissingBody,

    /// Body exceeded the configured size cap.
    #[error("Request body too large")]
    BodyTooLarge,

    /// Reading the inbound body failed midway.
    #[error("Failed to read request body")]
    BodyRead(#[source] BoxError),

    /// First line of the envelope was not a JSON object.
    #[error("Invalid JSON header: {0}")]
    InvalidHeader(#[from] serde_json::Error),

    /// DSN did not parse, or had an empty host or project id.
    #[error("Invalid DSN format")]
    InvalidDsn,

    /// DSN host is not the configured Sentry host.
    #[error("Invalid Sentry hostname: {0}")]
    HostNotAllowed(String),

    /// DSN project id is not in the configured allow-list.
    #[error("Invalid Sentry project ID: {0}")]
    ProjectNotAllowed(String),

    /// The outbound request could not be built.
    #[error("Failed to create upstream request")]
    UpstreamRequest(#[source] reqwest::Error),

    /// The outbound request failed in transit (connect, TLS, timeout, ...).
    #[error("Error tunneling to Sentry")]
    Upstream(#[source] reqwest::Error),
}

impl TunnelError {
    /// HTTP status returned to the caller.
    pub fn status(&self) -> StatusCode {
        match self {
            TunnelError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            TunnelError::MissingBody
            | TunnelError::InvalidHeader(_)
            | TunnelError::InvalidDsn
            | TunnelError::HostNotAllowed(_)
            | TunnelError::ProjectNotAllowed(_) => StatusCode::BAD_REQUEST,
            TunnelError::BodyTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            TunnelError::BodyRead(_)
            | TunnelError::UpstreamRequest(_)
            | TunnelError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short label used for metrics and log fields.
    pub fn outcome(&self) -> &'static str {
        match self {
            TunnelError::MethodNotAllowed => "method_not_allowed",
            TunnelError::MissingBody => "missing_body",
            TunnelError::BodyTooLarge => "body_too_large",
            TunnelError::BodyRead(_) => "body_read_failed",
            TunnelError::InvalidHeader(_) => "invalid_header",
            TunnelError::InvalidDsn => "invalid_dsn",
            TunnelError::HostNotAllowed(_) => "host_not_allowed",
            TunnelError::ProjectNotAllowed(_) => "project_not_allowed",
            TunnelError::UpstreamRequest(_) => "upstream_request_failed",
            TunnelError::Upstream(_) => "upstream_failed",
        }
    }

    /// True for failures on our side or the upstream's, as opposed to a bad request.
    pub fn is_server_error(&self) -> bool {
        self.status().is_server_error()
    }
}

impl IntoResponse for TunnelError {
    fn into_response(self) -> Response {
        let mut response = (self.status(), self.to_string()).into_response();
        let headers = response.headers_mut();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );
        headers.insert(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        );
        if matches!(self, TunnelError::MethodNotAllowed) {
            headers.insert(header::ALLOW, HeaderValue::from_static("POST"));
        }
        response
    }
}
