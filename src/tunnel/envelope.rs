//! Envelope routing header.
//!
//! A Sentry envelope is newline-delimited; its first line is a JSON object
//! carrying, among other things, the DSN the client was configured with.

use serde::Deserialize;

/// The parts of the envelope header the tunnel cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EnvelopeHeader {
    /// Destination DSN. Missing is the same as empty.
    #[serde(default)]
    pub dsn: String,
}

impl EnvelopeHeader {
    /// Parse the header from the first line of a raw envelope.
    ///
    /// Anything after the first `\n` is ignored. A literal `null` header
    /// deserializes to the default (empty DSN).
    pub fn from_envelope(body: &[u8]) -> Result<Self, serde_json::Error> {
        let header: Option<Self> = serde_json::from_slice(first_line(body))?;
        Ok(header.unwrap_or_default())
    }
}

/// Bytes up to, not including, the first newline.
pub fn first_line(body: &[u8]) -> &[u8] {
    match body.iter().position(|b| *b == b'\n') {
        Some(end) => &body[..end],
        None => body,
    }
}
