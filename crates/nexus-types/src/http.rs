//! Transport-neutral HTTP request/response descriptors and retry policy.
//!
//! The request executor in nexus-core works on these shapes so that it never
//! depends on a concrete HTTP client.

use std::fmt;
use std::time::Duration;

/// A request header. Sensitive values are redacted from `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct HttpHeader {
    pub name: String,
    pub value: String,
    pub sensitive: bool,
}

impl HttpHeader {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            sensitive: false,
        }
    }

    pub fn secret(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            sensitive: true,
        }
    }
}

impl fmt::Debug for HttpHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = if self.sensitive { "[REDACTED]" } else { self.value.as_str() };
        write!(f, "{}: {}", self.name, value)
    }
}

/// A fully formed outbound JSON POST.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<HttpHeader>,
    pub body: Option<serde_json::Value>,
}

impl HttpRequest {
    /// A JSON POST request with a `content-type` header already set.
    pub fn post_json(url: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            url: url.into(),
            headers: vec![HttpHeader::new("content-type", "application/json")],
            body: Some(body),
        }
    }

    pub fn with_header(mut self, header: HttpHeader) -> Self {
        self.headers.push(header);
        self
    }
}

/// Status and raw body of a completed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// Rate limiting and server errors are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        self.status == 429 || self.status >= 500
    }
}

/// Bounded exponential backoff settings.
///
/// The delay starts at `initial_delay` and doubles after every retryable
/// outcome. `max_delay` clamps individual waits without changing the
/// doubling sequence below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            initial_delay: Duration::from_millis(1000),
            max_delay: Duration::from_secs(30),
        }
    }
}
