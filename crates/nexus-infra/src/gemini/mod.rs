//! Gemini generative-language providers.
//!
//! Both providers share one request shape: a JSON POST to
//! `{base_url}/models/{model}:generateContent` authenticated with the
//! `x-goog-api-key` header, sent through the resilient executor.

pub mod chat;
pub mod speech;
pub mod types;

pub use chat::GeminiChatProvider;
pub use speech::GeminiSpeechProvider;

use nexus_types::http::{HttpHeader, HttpRequest};
use secrecy::{ExposeSecret, SecretString};

use types::GenerateContentResponse;

/// Header carrying the API key. Keys are never placed in the URL.
pub const API_KEY_HEADER: &str = "x-goog-api-key";

fn generate_content_url(base_url: &str, model: &str) -> String {
    format!("{}/models/{}:generateContent", base_url.trim_end_matches('/'), model)
}

fn authorized_post(url: String, body: serde_json::Value, api_key: &SecretString) -> HttpRequest {
    HttpRequest::post_json(url, body)
        .with_header(HttpHeader::secret(API_KEY_HEADER, api_key.expose_secret()))
}

fn parse_response(body: serde_json::Value) -> Result<GenerateContentResponse, serde_json::Error> {
    serde_json::from_value(body)
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use nexus_core::http::HttpTransport;
    use nexus_types::error::TransportError;
    use nexus_types::http::{HttpRequest, HttpResponse};

    /// Replays canned responses and keeps every request it saw.
    pub(crate) struct CannedTransport {
        responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
        pub(crate) seen: Mutex<Vec<HttpRequest>>,
    }

    impl CannedTransport {
        pub(crate) fn new(responses: Vec<Result<HttpResponse, TransportError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                seen: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn json(status: u16, body: serde_json::Value) -> Self {
            Self::new(vec![Ok(HttpResponse {
                status,
                body: body.to_string(),
            })])
        }

        pub(crate) fn last(&self) -> HttpRequest {
            self.seen.lock().unwrap().last().cloned().unwrap()
        }
    }

    impl HttpTransport for CannedTransport {
        async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            self.seen.lock().unwrap().push(request.clone());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError("no canned response".to_string())))
        }
    }
}
