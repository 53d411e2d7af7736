//! Canned transport for unit tests.

use std::sync::Mutex;

use async_trait::async_trait;

use super::{HeaderMultiMap, ProbeRequest, ProbeResponse, Transport, TransportError};

/// Answers every request with the same response (or failure) and records
/// what was asked.
pub struct StubTransport {
    response: Option<ProbeResponse>,
    requests: Mutex<Vec<ProbeRequest>>,
}

impl StubTransport {
    pub fn responding(status: u16, body: &str) -> Self {
        Self::with_headers(status, &[], body)
    }

    pub fn with_headers(status: u16, headers: &[(&str, &str)], body: &str) -> Self {
        let mut map = HeaderMultiMap::new();
        for (name, value) in headers {
            map.append(name, *value);
        }
        Self {
            response: Some(ProbeResponse {
                status,
                headers: map,
                body: body.to_string(),
            }),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            response: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ProbeRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn request(&self, request: &ProbeRequest) -> Result<ProbeResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        self.response
            .clone()
            .ok_or_else(|| TransportError::NoResponse {
                url: request.url.clone(),
                message: "stub transport refused the request".to_string(),
            })
    }
}
