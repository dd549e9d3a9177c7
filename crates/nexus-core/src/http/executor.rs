//! Resilient request executor with bounded exponential backoff.
//!
//! Wraps one outbound request. Transport failures, HTTP 429 and 5xx are
//! retried with a doubling delay; any other response is parsed and handed
//! back so the caller can inspect it for an embedded error payload.

use nexus_types::error::ExecutorError;
use nexus_types::http::{HttpRequest, HttpResponse, RetryPolicy};
use tracing::{debug, warn};

use super::transport::HttpTransport;

/// Executes requests through an [`HttpTransport`] under a [`RetryPolicy`].
pub struct ResilientExecutor<T: HttpTransport> {
    transport: T,
    policy: RetryPolicy,
}

impl<T: HttpTransport> ResilientExecutor<T> {
    pub fn new(transport: T, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send `request`, retrying transient failures, and return the parsed
    /// JSON body.
    ///
    /// - 2xx: body parsed and returned.
    /// - 429 / 5xx / transport error: wait, double the delay, try again.
    /// - other 4xx: body parsed and returned without retrying.
    ///
    /// No wait follows the final attempt. When the last attempt fails at
    /// the transport level that error is returned; when it fails with a
    /// retryable status the result is [`ExecutorError::MaxRetriesExceeded`].
    pub async fn execute(&self, request: &HttpRequest) -> Result<serde_json::Value, ExecutorError> {
        let max_attempts = self.policy.max_retries;
        let mut delay = self.policy.initial_delay;

        for attempt in 1..=max_attempts {
            let is_last = attempt == max_attempts;

            match self.transport.send(request).await {
                Ok(response) if !response.is_retryable() => {
                    debug!(
                        url = %request.url,
                        status = response.status,
                        attempt,
                        "Request completed"
                    );
                    return parse_body(&response);
                }
                Ok(response) => {
                    if is_last {
                        warn!(
                            url = %request.url,
                            status = response.status,
                            attempt,
                            "Retryable status on final attempt, giving up"
                        );
                        break;
                    }
                    warn!(
                        url = %request.url,
                        status = response.status,
                        attempt,
                        max_attempts,
                        delay_ms = delay.min(self.policy.max_delay).as_millis() as u64,
                        "Retryable status, backing off"
                    );
                }
                Err(err) => {
                    if is_last {
                        warn!(url = %request.url, attempt, error = %err, "Transport failed on final attempt");
                        return Err(err.into());
                    }
                    warn!(
                        url = %request.url,
                        attempt,
                        max_attempts,
                        error = %err,
                        delay_ms = delay.min(self.policy.max_delay).as_millis() as u64,
                        "Transport error, backing off"
                    );
                }
            }

            tokio::time::sleep(delay.min(self.policy.max_delay)).await;
            delay = delay.saturating_mul(2);
        }

        Err(ExecutorError::MaxRetriesExceeded {
            attempts: max_attempts,
        })
    }
}

fn parse_body(response: &HttpResponse) -> Result<serde_json::Value, ExecutorError> {
    serde_json::from_str(&response.body).map_err(|e| ExecutorError::InvalidBody {
        status: response.status,
        message: e.to_string(),
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    use nexus_types::error::TransportError;
    use tokio::time::Instant;

    /// Transport that replays a fixed script and records when each call
    /// happened.
    pub(crate) struct ScriptedTransport {
        script: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
        calls: Mutex<Vec<Instant>>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl ScriptedTransport {
        pub(crate) fn new(script: Vec<Result<HttpResponse, TransportError>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                calls: Mutex::new(Vec::new()),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        /// Gaps between consecutive calls, in milliseconds.
        pub(crate) fn gaps_ms(&self) -> Vec<u128> {
            let calls = self.calls.lock().unwrap();
            calls
                .windows(2)
                .map(|w| (w[1] - w[0]).as_millis())
                .collect()
        }

        pub(crate) fn last_request(&self) -> Option<HttpRequest> {
            self.requests.lock().unwrap().last().cloned()
        }
    }

    impl HttpTransport for ScriptedTransport {
        async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            self.calls.lock().unwrap().push(Instant::now());
            self.requests.lock().unwrap().push(request.clone());
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError("script exhausted".to_string())))
        }
    }

    pub(crate) fn status(status: u16, body: &str) -> Result<HttpResponse, TransportError> {
        Ok(HttpResponse {
            status,
            body: body.to_string(),
        })
    }

    fn network_down() -> Result<HttpResponse, TransportError> {
        Err(TransportError("connection refused".to_string()))
    }

    fn request() -> HttpRequest {
        HttpRequest::post_json("https://api.example.test/v1/generate", serde_json::json!({}))
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_first_attempt() {
        let executor = ResilientExecutor::new(
            ScriptedTransport::new(vec![status(200, r#"{"ok":true}"#)]),
            RetryPolicy::default(),
        );
        let body = executor.execute(&request()).await.unwrap();
        assert_eq!(body["ok"], true);
        assert_eq!(executor.transport().call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_sequence_on_uniform_server_errors() {
        let script = (0..5).map(|_| status(503, "{}")).collect();
        let executor = ResilientExecutor::new(ScriptedTransport::new(script), RetryPolicy::default());

        let start = Instant::now();
        let err = executor.execute(&request()).await.unwrap_err();

        assert_eq!(err, ExecutorError::MaxRetriesExceeded { attempts: 5 });
        assert_eq!(executor.transport().call_count(), 5);
        assert_eq!(executor.transport().gaps_ms(), vec![1000, 2000, 4000, 8000]);
        // No wait after the final attempt.
        assert_eq!(start.elapsed(), Duration::from_millis(15_000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_then_success() {
        let executor = ResilientExecutor::new(
            ScriptedTransport::new(vec![
                status(429, "{}"),
                status(500, "{}"),
                status(200, r#"{"answer":42}"#),
            ]),
            RetryPolicy::default(),
        );
        let body = executor.execute(&request()).await.unwrap();
        assert_eq!(body["answer"], 42);
        assert_eq!(executor.transport().gaps_ms(), vec![1000, 2000]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_client_error_returned_without_retry() {
        let executor = ResilientExecutor::new(
            ScriptedTransport::new(vec![status(
                400,
                r#"{"error":{"code":400,"message":"API key not valid."}}"#,
            )]),
            RetryPolicy::default(),
        );

        let start = Instant::now();
        let body = executor.execute(&request()).await.unwrap();

        assert_eq!(body["error"]["message"], "API key not valid.");
        assert_eq!(executor.transport().call_count(), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_error_propagates_when_exhausted() {
        let script = (0..3).map(|_| network_down()).collect();
        let policy = RetryPolicy {
            max_retries: 3,
            ..RetryPolicy::default()
        };
        let executor = ResilientExecutor::new(ScriptedTransport::new(script), policy);

        let err = executor.execute(&request()).await.unwrap_err();
        assert_eq!(
            err,
            ExecutorError::Transport(TransportError("connection refused".to_string()))
        );
        assert_eq!(executor.transport().gaps_ms(), vec![1000, 2000]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_error_then_success() {
        let executor = ResilientExecutor::new(
            ScriptedTransport::new(vec![network_down(), status(200, "[]")]),
            RetryPolicy::default(),
        );
        let body = executor.execute(&request()).await.unwrap();
        assert!(body.as_array().unwrap().is_empty());
        assert_eq!(executor.transport().call_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_ceiling_clamps_waits() {
        let script = (0..4).map(|_| status(502, "{}")).collect();
        let policy = RetryPolicy {
            max_retries: 4,
            initial_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(2500),
        };
        let executor = ResilientExecutor::new(ScriptedTransport::new(script), policy);
        executor.execute(&request()).await.unwrap_err();
        assert_eq!(executor.transport().gaps_ms(), vec![1000, 2000, 2500]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_success_body() {
        let executor = ResilientExecutor::new(
            ScriptedTransport::new(vec![status(200, "<html>oops</html>")]),
            RetryPolicy::default(),
        );
        let err = executor.execute(&request()).await.unwrap_err();
        assert!(matches!(err, ExecutorError::InvalidBody { status: 200, .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_retries_never_sends() {
        let policy = RetryPolicy {
            max_retries: 0,
            ..RetryPolicy::default()
        };
        let executor = ResilientExecutor::new(ScriptedTransport::new(vec![]), policy);
        let err = executor.execute(&request()).await.unwrap_err();
        assert_eq!(err, ExecutorError::MaxRetriesExceeded { attempts: 0 });
        assert_eq!(executor.transport().call_count(), 0);
    }
}
