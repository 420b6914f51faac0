//! Configuration loading from the environment and command line.

use std::net::SocketAddr;

use clap::Parser;
use thiserror::Error;

use crate::config::schema::{
    LimitsConfig, ListenerConfig, LogFormat, ObservabilityConfig, PolicyConfig, SentryHost,
    TunnelConfig, UpstreamConfig,
};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Command-line flags, each backed by an environment variable.
#[derive(Debug, Clone, Parser)]
#[command(name = "sentry-tunnel")]
#[command(about = "Relay Sentry envelopes to an allow-listed upstream", long_about = None)]
#[command(version)]
#[command(args_override_self = true)]
pub struct TunnelArgs {
    /// Route the tunnel listens on.
    #[arg(long, env = "TUNNEL_PATH", default_value = "/tunnel")]
    pub path: String,

    /// TCP port to bind.
    #[arg(long, env = "PORT", default_value_t = 8090)]
    pub port: u16,

    /// Interface to bind.
    #[arg(long, env = "BIND_HOST", default_value = "0.0.0.0")]
    pub bind_host: String,

    /// Required Sentry host; unset allows any host.
    #[arg(long, env = "SENTRY_HOST")]
    pub sentry_host: Option<String>,

    /// Comma-separated allowed project ids; unset allows any project.
    #[arg(long, env = "SENTRY_PROJECT_IDS")]
    pub sentry_project_ids: Option<String>,

    /// Route of the liveness probe.
    #[arg(long, env = "HEALTH_PATH", default_value = "/healthz")]
    pub health_path: String,

    /// Largest accepted envelope in bytes.
    #[arg(long, env = "MAX_BODY_BYTES", default_value_t = 20 * 1024 * 1024)]
    pub max_body_bytes: usize,

    /// Total upstream timeout in seconds.
    #[arg(long, env = "UPSTREAM_TIMEOUT_SECS", default_value_t = 30)]
    pub upstream_timeout_secs: u64,

    /// Upstream connect timeout in seconds.
    #[arg(long, env = "UPSTREAM_CONNECT_TIMEOUT_SECS", default_value_t = 5)]
    pub upstream_connect_timeout_secs: u64,

    /// Route upstream requests through HTTP_PROXY/HTTPS_PROXY when set.
    #[arg(long, env = "UPSTREAM_USE_SYSTEM_PROXY", default_value_t = true, action = clap::ArgAction::Set)]
    pub upstream_use_system_proxy: bool,

    /// Log output format (text or json).
    #[arg(long, env = "LOG_FORMAT", default_value = "text")]
    pub log_format: LogFormat,

    /// Prometheus exporter address (e.g. 0.0.0.0:9090); unset disables it.
    #[arg(long, env = "METRICS_ADDRESS")]
    pub metrics_address: Option<String>,
}

/// Convert flags into a typed configuration. Values that fail to parse are
/// reported in `errors` and left unset.
fn build_config(args: TunnelArgs, errors: &mut Vec<ValidationError>) -> TunnelConfig {
    TunnelConfig {
        listener: ListenerConfig {
            bind_host: args.bind_host,
            port: args.port,
            path: args.path,
            health_path: args.health_path,
        },
        policy: PolicyConfig {
            sentry_host: non_empty(args.sentry_host).and_then(|raw| parse_sentry_host(raw, errors)),
            project_ids: args
                .sentry_project_ids
                .as_deref()
                .map(PolicyConfig::parse_project_ids)
                .unwrap_or_default(),
        },
        upstream: UpstreamConfig {
            timeout_secs: args.upstream_timeout_secs,
            connect_timeout_secs: args.upstream_connect_timeout_secs,
            use_system_proxy: args.upstream_use_system_proxy,
        },
        limits: LimitsConfig {
            max_body_bytes: args.max_body_bytes,
        },
        observability: ObservabilityConfig {
            log_format: args.log_format,
            metrics_address: non_empty(args.metrics_address).and_then(|raw| {
                match raw.parse::<SocketAddr>() {
                    Ok(addr) => Some(addr),
                    Err(_) => {
                        errors.push(ValidationError::MetricsAddress(raw));
                        None
                    }
                }
            }),
        },
    }
}

fn parse_sentry_host(raw: String, errors: &mut Vec<ValidationError>) -> Option<SentryHost> {
    if raw.contains("://") || raw.contains('/') {
        errors.push(ValidationError::HostIsUrl(raw));
        return None;
    }
    match raw.parse() {
        Ok(host) => Some(host),
        Err(reason) => {
            errors.push(ValidationError::SentryHost(reason));
            None
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Build and validate configuration from parsed flags.
pub fn load_config(args: TunnelArgs) -> Result<TunnelConfig, ConfigError> {
    let mut errors = Vec::new();
    let config = build_config(args, &mut errors);
    if let Err(found) = validate_config(&config) {
        errors.extend(found);
    }

    if errors.is_empty() {
        Ok(config)
    } else {
        Err(ConfigError::Validation(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Every flag is passed explicitly so ambient environment variables
    // cannot leak into the assertions.
    fn args(extra: &[&str]) -> TunnelArgs {
        let mut argv = vec![
            "sentry-tunnel",
            "--path",
            "/tunnel",
            "--port",
            "8090",
            "--bind-host",
            "0.0.0.0",
            "--sentry-host",
            "",
            "--sentry-project-ids",
            "",
            "--health-path",
            "/healthz",
            "--max-body-bytes",
            "1024",
            "--upstream-timeout-secs",
            "30",
            "--upstream-connect-timeout-secs",
            "5",
            "--upstream-use-system-proxy",
            "true",
            "--log-format",
            "text",
            "--metrics-address",
            "",
        ];
        argv.extend_from_slice(extra);
        TunnelArgs::try_parse_from(argv).unwrap()
    }

    #[test]
    fn empty_policy_values_allow_everything() {
        let config = load_config(args(&[])).unwrap();
        assert_eq!(config.policy, PolicyConfig::default());
        assert!(config.observability.metrics_address.is_none());
        assert_eq!(config.limits.max_body_bytes, 1024);
    }

    #[test]
    fn policy_flags_are_applied() {
        let config = load_config(args(&[
            "--sentry-host",
            "o1.ingest.sentry.io",
            "--sentry-project-ids",
            "3,6,8",
        ]))
        .unwrap();
        assert_eq!(
            config.policy.sentry_host.map(|h| h.to_string()).as_deref(),
            Some("o1.ingest.sentry.io")
        );
        assert_eq!(config.policy.project_ids, vec!["3", "6", "8"]);
    }

    #[test]
    fn sentry_host_is_normalized_at_load() {
        let config = load_config(args(&["--sentry-host", "Sentry.Example.com:443"])).unwrap();
        let host = config.policy.sentry_host.unwrap();
        assert_eq!(host.to_string(), "sentry.example.com:443");
        assert_eq!(host.port(), Some(443));
    }

    #[test]
    fn malformed_hosts_and_addresses_are_reported() {
        let err = load_config(args(&[
            "--sentry-host",
            "https://example.com",
            "--metrics-address",
            "localhost",
        ]))
        .unwrap_err();
        let ConfigError::Validation(errors) = err;
        assert_eq!(
            errors,
            vec![
                ValidationError::HostIsUrl("https://example.com".into()),
                ValidationError::MetricsAddress("localhost".into()),
            ]
        );

        let err = load_config(args(&["--sentry-host", "example.com:http"])).unwrap_err();
        let ConfigError::Validation(errors) = err;
        assert!(matches!(errors[..], [ValidationError::SentryHost(_)]));
    }

    #[test]
    fn metrics_address_is_parsed_once() {
        let config = load_config(args(&["--metrics-address", "127.0.0.1:9090"])).unwrap();
        assert_eq!(
            config.observability.metrics_address,
            Some("127.0.0.1:9090".parse().unwrap())
        );
    }

    #[test]
    fn invalid_values_are_reported_together() {
        let err = load_config(args(&["--path", "tunnel", "--upstream-timeout-secs", "0"]))
            .unwrap_err();
        let ConfigError::Validation(errors) = err;
        assert_eq!(errors.len(), 2);
    }
}
