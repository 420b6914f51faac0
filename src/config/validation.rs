//! Configuration validation.
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: TunnelConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system
//! - Values that must parse into a type (hosts, addresses) are checked by the
//!   loader and reported with the same error type

use thiserror::Error;

use crate::config::schema::TunnelConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must start with '/' (got '{value}')")]
    RelativePath { field: &'static str, value: String },

    #[error("{field} must not contain route wildcards or captures (got '{value}')")]
    PatternInPath { field: &'static str, value: String },

    #[error("health path '{0}' collides with the tunnel path")]
    PathCollision(String),

    #[error("SENTRY_HOST must be a bare host[:port], not a URL (got '{0}')")]
    HostIsUrl(String),

    #[error("SENTRY_HOST is not a valid host: {0}")]
    SentryHost(String),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("metrics address '{0}' is not a socket address")]
    MetricsAddress(String),
}

/// Check semantic constraints serde/clap cannot express.
pub fn validate_config(config: &TunnelConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_route("TUNNEL_PATH", &config.listener.path, &mut errors);
    check_route("HEALTH_PATH", &config.listener.health_path, &mut errors);
    if config.listener.path == config.listener.health_path {
        errors.push(ValidationError::PathCollision(config.listener.health_path.clone()));
    }

    if config.upstream.timeout_secs == 0 {
        errors.push(ValidationError::Zero("UPSTREAM_TIMEOUT_SECS"));
    }
    if config.upstream.connect_timeout_secs == 0 {
        errors.push(ValidationError::Zero("UPSTREAM_CONNECT_TIMEOUT_SECS"));
    }
    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::Zero("MAX_BODY_BYTES"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_route(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    if !value.starts_with('/') {
        errors.push(ValidationError::RelativePath {
            field,
            value: value.to_string(),
        });
    }
    if value.contains(|c: char| matches!(c, '{' | '}' | '*' | ':')) {
        errors.push(ValidationError::PatternInPath {
            field,
            value: value.to_string(),
        });
    }
}
