//! HttpTransport trait definition.
//!
//! A single request/response exchange with no retry logic. The reqwest
//! adapter lives in nexus-infra; tests use scripted in-memory transports.

use nexus_types::error::TransportError;
use nexus_types::http::{HttpRequest, HttpResponse};

/// Issues one HTTP request.
///
/// Any response that arrives (whatever its status) is `Ok`; only failures
/// to obtain a response at all are `Err`.
pub trait HttpTransport: Send + Sync {
    fn send(
        &self,
        request: &HttpRequest,
    ) -> impl std::future::Future<Output = Result<HttpResponse, TransportError>> + Send;
}
