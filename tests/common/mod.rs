//! Shared utilities for tunnel integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tower::ServiceExt;

use sentry_tunnel::config::TunnelConfig;
use sentry_tunnel::http::HttpServer;

/// What the mock upstream saw.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub body: Bytes,
}

/// A running mock Sentry ingestion endpoint.
pub struct MockUpstream {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockUpstream {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// DSN pointing at this mock for the given project.
    pub fn dsn(&self, project_id: &str) -> String {
        format!("http://public@{}/{}", self.addr, project_id)
    }
}

/// Start a mock upstream that records every request and answers with a
/// fixed status, content type and body.
pub async fn start_mock_upstream(
    status: u16,
    content_type: &'static str,
    response: &'static str,
) -> MockUpstream {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let recorded = requests.clone();

    let app = Router::new().fallback(move |request: Request<Body>| {
        let recorded = recorded.clone();
        async move {
            let (parts, body) = request.into_parts();
            let body = axum::body::to_bytes(body, usize::MAX).await.unwrap();
            recorded.lock().unwrap().push(RecordedRequest {
                method: parts.method,
                path: parts.uri.path().to_string(),
                body,
            });
            (
                StatusCode::from_u16(status).unwrap(),
                [(header::CONTENT_TYPE, content_type)],
                response,
            )
        }
    });

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockUpstream { addr, requests }
}

/// Start a raw backend that answers every connection with `raw` verbatim
/// and then closes. Useful for malformed or truncated responses.
pub async fn start_raw_backend(raw: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        // Drain the request so closing does not reset the connection.
                        tokio::time::sleep(Duration::from_millis(20)).await;
                        let mut buf = vec![0u8; 64 * 1024];
                        let _ = socket.read(&mut buf).await;
                        let _ = socket.write_all(raw.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// An address nothing is listening on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Build a tunnel router with the given allow-lists.
pub fn tunnel_router(sentry_host: Option<&str>, project_ids: &[&str]) -> Router {
    let mut config = TunnelConfig::default();
    config.policy.sentry_host = sentry_host.map(|host| host.parse().unwrap());
    config.policy.project_ids = project_ids.iter().map(|id| id.to_string()).collect();
    config.upstream.timeout_secs = 5;
    config.upstream.connect_timeout_secs = 2;
    tunnel_router_with(config)
}

/// Build a tunnel router from a full configuration. System proxies are
/// always disabled so loopback mocks are reached directly.
pub fn tunnel_router_with(mut config: TunnelConfig) -> Router {
    config.upstream.use_system_proxy = false;
    HttpServer::new(config).unwrap().router()
}

/// `POST /tunnel` with an explicit `Content-Length`.
pub fn post_envelope(body: impl Into<Bytes>) -> Request<Body> {
    let body = body.into();
    Request::builder()
        .method(Method::POST)
        .uri("/tunnel")
        .header(header::CONTENT_LENGTH, body.len())
        .body(Body::from(body))
        .unwrap()
}

/// Envelope with the given DSN in its header and a one-line payload.
pub fn envelope(dsn: &str, payload: &str) -> String {
    format!("{{\"dsn\":\"{}\"}}\n{}", dsn, payload)
}

/// Drive one request through the router and collect the response.
pub async fn send(router: Router, request: Request<Body>) -> (StatusCode, HeaderMap, String) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, headers, String::from_utf8_lossy(&body).into_owned())
}
