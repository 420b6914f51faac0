//! Destination locator (DSN) parsing.
//!
//! A DSN looks like `https://<public key>@<host>[:port]/<project id>`. Only
//! the scheme, authority and project id matter for tunneling; the key is
//! carried inside the envelope itself.

use std::fmt;

use url::{Host, Url};

use crate::tunnel::error::TunnelError;

/// A validated DSN: scheme, host and project id are all present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dsn {
    scheme: String,
    host: Host<String>,
    port: Option<u16>,
    known_port: Option<u16>,
    project_id: String,
}

impl Dsn {
    /// Parse and validate a DSN string.
    ///
    /// Fails with [`TunnelError::InvalidDsn`] if the URL does not parse, has
    /// no host, or its path is empty once slashes are trimmed.
    pub fn parse(raw: &str) -> Result<Self, TunnelError> {
        let url = Url::parse(raw).map_err(|_| TunnelError::InvalidDsn)?;

        let host = match url.host() {
            None | Some(Host::Domain("")) => return Err(TunnelError::InvalidDsn),
            Some(host) => host.to_owned(),
        };

        let project_id = url.path().trim_matches('/');
        if project_id.is_empty() {
            return Err(TunnelError::InvalidDsn);
        }

        Ok(Self {
            scheme: url.scheme().to_string(),
            host,
            port: url.port(),
            known_port: url.port_or_known_default(),
            project_id: project_id.to_string(),
        })
    }

    /// Normalized host: lowercased, IDNA-encoded, or a parsed IP address.
    pub fn host(&self) -> &Host<String> {
        &self.host
    }

    /// Host name without port, as shown to callers.
    pub fn hostname(&self) -> String {
        self.host.to_string()
    }

    /// Explicit port. `None` when absent or equal to the scheme's default.
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Port the upstream call actually connects to.
    pub fn port_or_known_default(&self) -> Option<u16> {
        self.known_port
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// `host[:port]` with the default port omitted.
    pub fn authority(&self) -> String {
        match self.port {
            Some(port) => format!("{}:{}", self.host, port),
            None => self.host.to_string(),
        }
    }

    /// Sentry's envelope ingestion endpoint for this project.
    pub fn envelope_url(&self) -> String {
        format!(
            "{}://{}/api/{}/envelope/",
            self.scheme,
            self.authority(),
            self.project_id
        )
    }
}

impl fmt::Display for Dsn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}/{}", self.scheme, self.authority(), self.project_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_standard_dsn() {
        let dsn = Dsn::parse("https://abc123@o42.ingest.sentry.io/4505").unwrap();
        assert_eq!(dsn.hostname(), "o42.ingest.sentry.io");
        assert_eq!(dsn.port(), None);
        assert_eq!(dsn.port_or_known_default(), Some(443));
        assert_eq!(dsn.project_id(), "4505");
        assert_eq!(
            dsn.envelope_url(),
            "https://o42.ingest.sentry.io/api/4505/envelope/"
        );
    }

    #[test]
    fn keeps_explicit_port() {
        let dsn = Dsn::parse("http://127.0.0.1:9000/17").unwrap();
        assert_eq!(dsn.hostname(), "127.0.0.1");
        assert_eq!(dsn.authority(), "127.0.0.1:9000");
        assert_eq!(dsn.envelope_url(), "http://127.0.0.1:9000/api/17/envelope/");
    }

    #[test]
    fn normalizes_case_and_default_port() {
        let dsn = Dsn::parse("https://Sentry.Example.com:443/17").unwrap();
        assert_eq!(dsn.hostname(), "sentry.example.com");
        assert_eq!(dsn.port(), None);
        assert_eq!(dsn.authority(), "sentry.example.com");
    }

    #[test]
    fn trims_surrounding_slashes() {
        let dsn = Dsn::parse("https://example.com//17/").unwrap();
        assert_eq!(dsn.project_id(), "17");
    }

    #[test]
    fn empty_path_is_invalid() {
        assert!(matches!(Dsn::parse("https://example.com"), Err(TunnelError::InvalidDsn)));
        assert!(matches!(Dsn::parse("https://example.com/"), Err(TunnelError::InvalidDsn)));
    }

    #[test]
    fn empty_string_is_invalid() {
        assert!(matches!(Dsn::parse(""), Err(TunnelError::InvalidDsn)));
    }

    #[test]
    fn hostless_url_is_invalid() {
        assert!(matches!(Dsn::parse("mailto:someone@example.com"), Err(TunnelError::InvalidDsn)));
        assert!(matches!(Dsn::parse("not a url"), Err(TunnelError::InvalidDsn)));
    }

    #[test]
    fn display_drops_public_key() {
        let dsn = Dsn::parse("https://secret@example.com/3").unwrap();
        assert_eq!(dsn.to_string(), "https://example.com/3");
    }
}
