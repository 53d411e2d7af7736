//! The network seam used by provider probes.
//!
//! Probes describe a single request as a [`ProbeRequest`] and receive the raw
//! [`ProbeResponse`]. Anything that cannot produce a response at all is a
//! [`TransportError`], which never carries a partial result.

mod http;
#[cfg(test)]
pub(crate) mod stub;

use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::Method;
use thiserror::Error;

pub use http::HttpTransport;

/// Failure to obtain any response from the remote host.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to read response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("no usable response from {url}: {message}")]
    NoResponse { url: String, message: String },
}

/// A single outgoing probe.
#[derive(Debug, Clone)]
pub struct ProbeRequest {
    pub url: String,
    pub method: Method,
    /// JSON payload sent as the request body (ignored for GET).
    pub body: Option<serde_json::Value>,
    /// If false, the TLS certificate of the host is not verified.
    pub verify_certificate: bool,
}

impl ProbeRequest {
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: Method::GET,
            body: None,
            verify_certificate: true,
        }
    }

    #[must_use]
    pub fn post_json(url: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            url: url.into(),
            method: Method::POST,
            body: Some(body),
            verify_certificate: true,
        }
    }

    #[must_use]
    pub fn with_verify_certificate(mut self, verify_certificate: bool) -> Self {
        self.verify_certificate = verify_certificate;
        self
    }
}

/// Response headers keyed by lower-cased name, keeping every value in the
/// order the server sent them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMultiMap(BTreeMap<String, Vec<String>>);

impl HeaderMultiMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, name: &str, value: impl Into<String>) {
        self.0
            .entry(name.to_ascii_lowercase())
            .or_default()
            .push(value.into());
    }

    /// All values for `name` (case-insensitive), empty if absent.
    #[must_use]
    pub fn get_all(&self, name: &str) -> &[String] {
        self.0
            .get(&name.to_ascii_lowercase())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// First value for `name` (case-insensitive).
    #[must_use]
    pub fn first(&self, name: &str) -> Option<&str> {
        self.get_all(name).first().map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        !self.get_all(name).is_empty()
    }
}

/// Raw result of a completed request, whatever its status code.
#[derive(Debug, Clone, Default)]
pub struct ProbeResponse {
    pub status: u16,
    pub headers: HeaderMultiMap,
    pub body: String,
}

/// Issues probe requests.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform `request` and return whatever the server answered.
    ///
    /// # Errors
    ///
    /// Returns an error only if no response could be obtained.
    async fn request(&self, request: &ProbeRequest) -> Result<ProbeResponse, TransportError>;
}
