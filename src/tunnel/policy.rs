//! Destination allow-list.
//!
//! # Design Decisions
//! - Built once at startup, shared read-only via `Arc`
//! - Empty host / empty project set means "allow any"
//! - Host is checked before project id
//! - Hosts compare normalized: case-folded, IDNA, default ports resolved

use std::collections::HashSet;

use crate::config::{PolicyConfig, SentryHost};
use crate::tunnel::dsn::Dsn;
use crate::tunnel::error::TunnelError;

/// Which destinations the tunnel may forward to.
#[derive(Debug, Clone, Default)]
pub struct TunnelPolicy {
    required_host: Option<SentryHost>,
    allowed_project_ids: HashSet<String>,
}

impl TunnelPolicy {
    pub fn new<I, S>(required_host: Option<SentryHost>, allowed_project_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            required_host,
            allowed_project_ids: allowed_project_ids
                .into_iter()
                .map(Into::into)
                .filter(|id: &String| !id.is_empty())
                .collect(),
        }
    }

    pub fn from_config(config: &PolicyConfig) -> Self {
        Self::new(config.sentry_host.clone(), config.project_ids.iter().cloned())
    }

    /// Check a parsed DSN against the policy.
    pub fn check(&self, dsn: &Dsn) -> Result<(), TunnelError> {
        if let Some(required) = &self.required_host {
            if !host_matches(required, dsn) {
                return Err(TunnelError::HostNotAllowed(dsn.hostname()));
            }
        }

        if !self.allowed_project_ids.is_empty()
            && !self.allowed_project_ids.contains(dsn.project_id())
        {
            return Err(TunnelError::ProjectNotAllowed(dsn.project_id().to_string()));
        }

        Ok(())
    }
}

/// A configured port pins the port actually dialed; without one the DSN
/// must use its scheme's default.
fn host_matches(required: &SentryHost, dsn: &Dsn) -> bool {
    if required.host() != dsn.host() {
        return false;
    }
    match required.port() {
        Some(port) => dsn.port_or_known_default() == Some(port),
        None => dsn.port().is_none(),
    }
}
