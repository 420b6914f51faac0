//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the tunnel.
//! Every section has defaults so an empty environment yields a runnable
//! (if permissive) configuration.

use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use url::Host;

/// Root configuration for the tunnel.
#[derive(Debug, Clone, Default)]
pub struct TunnelConfig {
    /// Listener configuration (bind address, routes).
    pub listener: ListenerConfig,

    /// Destination allow-list.
    pub policy: PolicyConfig,

    /// Outbound client settings.
    pub upstream: UpstreamConfig,

    /// Inbound request limits.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone)]
pub struct ListenerConfig {
    /// Interface to bind (e.g., "0.0.0.0").
    pub bind_host: String,

    /// TCP port.
    pub port: u16,

    /// Route the tunnel handler is mounted on.
    pub path: String,

    /// Route of the liveness probe.
    pub health_path: String,
}

impl ListenerConfig {
    /// `host:port` string suitable for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        if self.bind_host.contains(':') {
            format!("[{}]:{}", self.bind_host, self.port)
        } else {
            format!("{}:{}", self.bind_host, self.port)
        }
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_host: "0.0.0.0".to_string(),
            port: 8090,
            path: "/tunnel".to_string(),
            health_path: "/healthz".to_string(),
        }
    }
}

/// Which upstream destinations envelopes may be forwarded to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyConfig {
    /// Required Sentry host. `None` allows any host.
    pub sentry_host: Option<SentryHost>,

    /// Allowed project ids. Empty allows any project.
    pub project_ids: Vec<String>,
}

impl PolicyConfig {
    /// Split a comma-separated project list, trimming entries and dropping blanks.
    pub fn parse_project_ids(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(String::from)
            .collect()
    }
}

/// The `SENTRY_HOST` value, normalized with the rules URL hosts follow:
/// domains are lowercased and IDNA-encoded, IP literals are parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentryHost {
    host: Host<String>,
    port: Option<u16>,
}

impl SentryHost {
    pub fn host(&self) -> &Host<String> {
        &self.host
    }

    /// Port given in the value, if any. A default port is kept as written.
    pub fn port(&self) -> Option<u16> {
        self.port
    }
}

impl FromStr for SentryHost {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let (host, port) =
            split_host_port(raw).ok_or_else(|| format!("'{}' is not a valid host[:port]", raw))?;
        let host = Host::parse(host).map_err(|e| format!("'{}': {}", raw, e))?;
        Ok(Self { host, port })
    }
}

impl fmt::Display for SentryHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.port {
            Some(port) => write!(f, "{}:{}", self.host, port),
            None => write!(f, "{}", self.host),
        }
    }
}

/// Split `host[:port]`, keeping IPv6 literals bracketed.
fn split_host_port(raw: &str) -> Option<(&str, Option<u16>)> {
    let split_at = if raw.starts_with('[') {
        raw.find(']')? + 1
    } else {
        raw.find(':').unwrap_or(raw.len())
    };
    let (host, rest) = raw.split_at(split_at);
    let port = match rest {
        "" => None,
        _ => Some(rest.strip_prefix(':')?.parse().ok()?),
    };
    Some((host, port))
}

/// Outbound client configuration.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Total time allowed for an upstream exchange, in seconds.
    pub timeout_secs: u64,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Honor `HTTP_PROXY`/`HTTPS_PROXY` for outbound requests.
    pub use_system_proxy: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            connect_timeout_secs: 5,
            use_system_proxy: true,
        }
    }
}

/// Inbound request limits.
#[derive(Debug, Clone)]
pub struct LimitsConfig {
    /// Largest envelope accepted, in bytes.
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 20 * 1024 * 1024,
        }
    }
}

/// Observability settings.
#[derive(Debug, Clone, Default)]
pub struct ObservabilityConfig {
    /// Log output format.
    pub log_format: LogFormat,

    /// Prometheus exporter bind address. `None` disables metrics export.
    pub metrics_address: Option<SocketAddr>,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}', expected 'text' or 'json'", other)),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Text => f.write_str("text"),
            LogFormat::Json => f.write_str("json"),
        }
    }
}
