//! reqwest-backed [`HttpTransport`].

use std::time::Duration;

use nexus_core::http::HttpTransport;
use nexus_types::error::TransportError;
use nexus_types::http::{HttpRequest, HttpResponse};

/// Sends [`HttpRequest`]s with a shared `reqwest::Client`.
///
/// Any response, whatever its status, is handed back as an
/// [`HttpResponse`]; only failures to get a response at all become
/// [`TransportError`]s.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport whose every attempt is bounded by `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self.client.post(&request.url);

        for header in &request.headers {
            builder = builder.header(header.name.as_str(), header.value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError(format!("HTTP request failed: {}", e.without_url())))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError(format!("failed to read response body: {}", e.without_url())))?;

        Ok(HttpResponse { status, body })
    }
}
