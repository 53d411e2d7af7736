use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONNECTION, CONTENT_TYPE};
use reqwest::{redirect, Client, Method};
use tracing::debug;

use super::{HeaderMultiMap, ProbeRequest, ProbeResponse, Transport, TransportError};
use crate::config::Config;
use crate::constants::PROBE_USER_AGENT;

/// Real network transport backed by `reqwest`.
///
/// Redirects are never followed: several probes decide liveness from the
/// redirect itself (status 303, `location` header).
///
/// Certificates are checked only when both the transport default and the
/// request ask for it.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    insecure_client: Client,
    verify_certificate: bool,
}

impl HttpTransport {
    /// Build a transport.
    ///
    /// # Arguments
    ///
    /// * `timeout` - Deadline for each request, including the body.
    /// * `verify_certificate` - Default for every request. If false, no
    ///   request verifies certificates, whatever its own flag says.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn new(timeout: Duration, verify_certificate: bool) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_client(timeout, true)?,
            insecure_client: build_client(timeout, false)?,
            verify_certificate,
        })
    }

    /// Build a transport from the application configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        Self::new(config.request_timeout, config.verify_certificate)
    }

    fn verifies(&self, request: &ProbeRequest) -> bool {
        self.verify_certificate && request.verify_certificate
    }

    fn client_for(&self, request: &ProbeRequest) -> &Client {
        if self.verifies(request) {
            &self.client
        } else {
            &self.insecure_client
        }
    }
}

fn build_client(timeout: Duration, verify_certificate: bool) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .user_agent(PROBE_USER_AGENT)
        .redirect(redirect::Policy::none())
        .danger_accept_invalid_certs(!verify_certificate)
        .build()
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(&self, request: &ProbeRequest) -> Result<ProbeResponse, TransportError> {
        debug!(
            url = %request.url,
            method = %request.method,
            verify_certificate = self.verifies(request),
            "Sending probe request"
        );

        let mut builder = self
            .client_for(request)
            .request(request.method.clone(), &request.url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "*/*")
            .header(CONNECTION, "keep-alive");

        if request.method != Method::GET {
            if let Some(body) = &request.body {
                builder = builder.body(body.to_string());
            }
        }

        let response = builder.send().await.map_err(|e| TransportError::Request {
            url: request.url.clone(),
            source: e,
        })?;

        let status = response.status().as_u16();
        let mut headers = HeaderMultiMap::new();
        for (name, value) in response.headers() {
            headers.append(
                name.as_str(),
                String::from_utf8_lossy(value.as_bytes()).trim(),
            );
        }

        let body = response.text().await.map_err(|e| TransportError::Body {
            url: request.url.clone(),
            source: e,
        })?;

        debug!(
            url = %request.url,
            status,
            body_len = body.len(),
            "Received probe response"
        );

        Ok(ProbeResponse {
            status,
            headers,
            body,
        })
    }
}
